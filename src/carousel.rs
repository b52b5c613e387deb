//! Media carousel: one 3D model slide (optional) followed by image slides,
//! shown one at a time with previous/next/jump navigation driven by pointer,
//! keyboard and swipe input.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ViewerError;
use crate::input::{Key, KeyboardHub, KeyboardSubscription, Swipe, SwipeTracker};
use crate::slide::{build_slides, Slide};
use crate::state::Cursor;
use crate::viewer::{ImageRenderer, ModelRequest, ThreeDRenderer, ViewerOptions};

/// Inputs supplied by the host page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselProps {
    /// Identity of the item the media belongs to. Two items with identical
    /// media are still different items.
    pub item_key: String,
    pub title: String,
    pub primary_3d: Option<String>,
    pub alternate_3d: Option<String>,
    pub images: Vec<String>,
    pub class_name: Option<String>,
}

impl CarouselProps {
    // Same item, same media: the slide sequence can be kept
    fn same_sequence(&self, other: &CarouselProps) -> bool {
        self.item_key == other.item_key
            && self.primary_3d == other.primary_3d
            && self.alternate_3d == other.alternate_3d
            && self.images == other.images
    }
}

// Shared with the keyboard listener
#[derive(Debug, Default)]
struct Navigation {
    cursor: Cursor,
    len: usize,
}

impl Navigation {
    fn previous(&mut self) {
        self.cursor.previous(self.len);
        log::debug!("carousel: previous -> {}/{}", self.cursor.index(), self.len);
    }

    fn next(&mut self) {
        self.cursor.next(self.len);
        log::debug!("carousel: next -> {}/{}", self.cursor.index(), self.len);
    }

    fn handle_key(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub index: usize,
    pub active: bool,
    pub label: String,
}

/// Previous/next buttons plus one position indicator per slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSlide<'a> {
    pub slide: &'a Slide,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselView<'a> {
    Placeholder,
    Stage {
        active: ActiveSlide<'a>,
        // only when there is more than one slide
        controls: Option<Controls>,
    },
}

pub struct MediaCarousel {
    props: CarouselProps,
    slides: Rc<[Slide]>,
    nav: Rc<RefCell<Navigation>>,
    swipe: SwipeTracker,
    keyboard: Option<KeyboardSubscription>,
    viewer: ViewerOptions,
    last_viewer_error: RefCell<Option<ViewerError>>,
}

impl MediaCarousel {
    pub fn new(props: CarouselProps, viewer: ViewerOptions) -> Self {
        let slides: Rc<[Slide]> = build_slides(
            props.primary_3d.as_deref(),
            props.alternate_3d.as_deref(),
            &props.images,
        )
        .into();
        let nav = Navigation { cursor: Cursor::default(), len: slides.len() };

        Self {
            props,
            slides,
            nav: Rc::new(RefCell::new(nav)),
            swipe: SwipeTracker::default(),
            keyboard: None,
            viewer,
            last_viewer_error: RefCell::new(None),
        }
    }

    /// Replaces the inputs. The slide sequence is rebuilt, and the cursor
    /// reset, when the item or its media changed. Re-props of the same item
    /// with the same media keep both.
    pub fn set_props(&mut self, props: CarouselProps) {
        if !self.props.same_sequence(&props) {
            self.slides = build_slides(
                props.primary_3d.as_deref(),
                props.alternate_3d.as_deref(),
                &props.images,
            )
            .into();
            let mut nav = self.nav.borrow_mut();
            nav.cursor.reset();
            nav.len = self.slides.len();
            self.swipe = SwipeTracker::default();
            self.last_viewer_error.replace(None);
            log::debug!("carousel: {} slides for {:?}", self.slides.len(), props.title);
        }
        self.props = props;
    }

    /// Starts listening for arrow keys on `hub`. The listener is released by
    /// [`MediaCarousel::unmount`] or when the carousel is dropped.
    pub fn mount(&mut self, hub: &KeyboardHub) {
        if self.keyboard.is_some() {
            return;
        }
        let nav = Rc::clone(&self.nav);
        self.keyboard = Some(hub.subscribe(move |key| nav.borrow_mut().handle_key(key)));
    }

    pub fn unmount(&mut self) {
        self.keyboard = None;
    }

    pub fn slides(&self) -> &Rc<[Slide]> {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn cursor(&self) -> usize {
        self.nav.borrow().cursor.index()
    }

    pub fn go_to_previous(&mut self) {
        self.nav.borrow_mut().previous();
    }

    pub fn go_to_next(&mut self) {
        self.nav.borrow_mut().next();
    }

    pub fn go_to_index(&mut self, index: usize) {
        let mut nav = self.nav.borrow_mut();
        let len = nav.len;
        nav.cursor.jump(index, len);
        log::debug!("carousel: jump -> {}/{}", nav.cursor.index(), len);
    }

    pub fn touch_start(&mut self, x: f32) {
        self.swipe.touch_start(x);
    }

    pub fn touch_end(&mut self, x: f32) {
        match self.swipe.touch_end(x) {
            Some(Swipe::Previous) => self.go_to_previous(),
            Some(Swipe::Next) => self.go_to_next(),
            None => {}
        }
    }

    /// The slide on stage, without building the controls.
    pub fn active_slide(&self) -> Option<ActiveSlide<'_>> {
        let index = self.cursor();
        let slide = self.slides.get(index)?;
        Some(ActiveSlide { slide, label: slide.label(&self.props.title, index) })
    }

    pub fn view(&self) -> CarouselView<'_> {
        let Some(active) = self.active_slide() else {
            return CarouselView::Placeholder;
        };
        let len = self.slides.len();
        let index = self.cursor();

        let controls = (len > 1).then(|| Controls {
            indicators: (0..len)
                .map(|i| Indicator {
                    index: i,
                    active: i == index,
                    label: format!("Go to slide {}", i + 1),
                })
                .collect(),
        });

        CarouselView::Stage { active, controls }
    }

    /// Hands the active slide to the matching renderer capability. Viewer
    /// errors stop here: they are logged and leave the carousel untouched.
    pub fn render<R>(&self, renderer: &mut R)
    where
        R: ThreeDRenderer + ImageRenderer + ?Sized,
    {
        let Some(active) = self.active_slide() else {
            return;
        };

        match active.slide {
            Slide::Model { src, alternate } => {
                let request = ModelRequest {
                    src,
                    alternate: alternate.as_deref(),
                    label: &active.label,
                    class_name: self.props.class_name.as_deref(),
                    options: &self.viewer,
                };
                if let Err(err) = renderer.render_model(&request) {
                    self.on_viewer_error(err);
                }
            }
            Slide::Image { src } => renderer.render_image(src, &active.label),
        }
    }

    fn on_viewer_error(&self, err: ViewerError) {
        let mut last = self.last_viewer_error.borrow_mut();
        // viewers report every frame; log each distinct failure once
        if last.as_ref() != Some(&err) {
            log::error!("3D viewer: {}", err);
            *last = Some(err);
        }
    }
}
