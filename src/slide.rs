/// One displayable unit of the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slide {
    // 3D model; always slide 0 when present
    Model {
        src: String,
        alternate: Option<String>,
    },
    Image {
        src: String,
    },
}

impl Slide {
    pub fn is_model(&self) -> bool {
        matches!(self, Slide::Model { .. })
    }

    /// Accessible description: "{title} 3D model" or "{title} image {n}" with
    /// `n` the 1-based position in the sequence.
    pub fn label(&self, title: &str, index: usize) -> String {
        match self {
            Slide::Model { .. } => format!("{} 3D model", title),
            Slide::Image { .. } => format!("{} image {}", title, index + 1),
        }
    }
}

fn non_empty(reference: Option<&str>) -> Option<&str> {
    reference.filter(|s| !s.trim().is_empty())
}

/// Builds the ordered sequence: the optional 3D slide first, then every
/// non-empty image reference in input order.
pub fn build_slides<S: AsRef<str>>(
    primary_3d: Option<&str>,
    alternate_3d: Option<&str>,
    images: &[S],
) -> Vec<Slide> {
    let mut slides = Vec::with_capacity(images.len() + 1);

    if let Some(src) = non_empty(primary_3d) {
        slides.push(Slide::Model {
            src: src.to_string(),
            alternate: non_empty(alternate_3d).map(str::to_string),
        });
    }

    slides.extend(
        images
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.trim().is_empty())
            .map(|src| Slide::Image { src: src.to_string() }),
    );

    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_slide_comes_first() {
        let slides = build_slides(Some("m.glb"), None, &["a.jpg", "b.jpg"]);
        assert_eq!(
            slides,
            vec![
                Slide::Model { src: "m.glb".into(), alternate: None },
                Slide::Image { src: "a.jpg".into() },
                Slide::Image { src: "b.jpg".into() },
            ]
        );
    }

    #[test]
    fn empty_references_are_dropped() {
        let slides = build_slides(Some(""), Some("m.usdz"), &["", "a.jpg", "  ", "b.jpg"]);
        assert_eq!(slides.len(), 2);
        assert!(slides.iter().all(|s| !s.is_model()));
    }

    #[test]
    fn alternate_ignored_without_primary() {
        let slides = build_slides::<&str>(None, Some("m.usdz"), &[]);
        assert!(slides.is_empty());
    }

    #[test]
    fn alternate_kept_with_primary() {
        let slides = build_slides::<&str>(Some("m.glb"), Some("m.usdz"), &[]);
        assert_eq!(
            slides[0],
            Slide::Model { src: "m.glb".into(), alternate: Some("m.usdz".into()) }
        );
    }

    #[test]
    fn length_matches_inputs() {
        let cases: &[(Option<&str>, &[&str])] = &[
            (None, &[]),
            (Some("m.glb"), &[]),
            (None, &["a", "", "b"]),
            (Some("m.glb"), &["", "", "c"]),
        ];
        for (primary, images) in cases {
            let expected = usize::from(primary.is_some())
                + images.iter().filter(|s| !s.is_empty()).count();
            assert_eq!(build_slides(*primary, None, images).len(), expected);
        }
    }

    #[test]
    fn labels() {
        let model = Slide::Model { src: "m.glb".into(), alternate: None };
        let image = Slide::Image { src: "a.jpg".into() };
        assert_eq!(model.label("Vase", 0), "Vase 3D model");
        assert_eq!(image.label("Vase", 1), "Vase image 2");
        assert_eq!(image.label("", 0), " image 1");
    }
}
