use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CrossOrigin {
    #[default]
    Anonymous,
    UseCredentials,
    Unset,
}

impl CrossOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            CrossOrigin::Anonymous => "anonymous",
            CrossOrigin::UseCredentials => "use-credentials",
            CrossOrigin::Unset => "",
        }
    }
}

/// Behaviour of the interactive 3D viewer.
///
/// Defaults: AR enabled with all three AR modes, camera controls enabled,
/// auto-rotate enabled, anonymous cross-origin requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub ar: bool,
    pub ar_modes: String,
    pub camera_controls: bool,
    pub auto_rotate: bool,
    pub crossorigin: CrossOrigin,
    pub exposure: Option<f32>,
    pub shadow_intensity: Option<f32>,
    pub poster: Option<String>,
}

pub const DEFAULT_AR_MODES: &str = "webxr scene-viewer quick-look";

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            ar: true,
            ar_modes: DEFAULT_AR_MODES.to_string(),
            camera_controls: true,
            auto_rotate: true,
            crossorigin: CrossOrigin::default(),
            exposure: None,
            shadow_intensity: None,
            poster: None,
        }
    }
}

/// Everything the 3D viewer is handed for the active model slide.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub src: &'a str,
    pub alternate: Option<&'a str>,
    pub label: &'a str,
    pub class_name: Option<&'a str>,
    pub options: &'a ViewerOptions,
}

impl ModelRequest<'_> {
    /// Element description of the viewer. Boolean options become attributes
    /// that are present (with an empty value) when enabled and absent
    /// otherwise; unset optional values are omitted.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let options = self.options;
        let mut attrs = vec![("src", self.src.to_string()), ("alt", self.label.to_string())];

        if let Some(class) = self.class_name {
            attrs.push(("class", class.to_string()));
        }
        attrs.push(("crossorigin", options.crossorigin.as_str().to_string()));
        if let Some(poster) = &options.poster {
            attrs.push(("poster", poster.clone()));
        }
        if let Some(exposure) = options.exposure {
            attrs.push(("exposure", exposure.to_string()));
        }
        if let Some(intensity) = options.shadow_intensity {
            attrs.push(("shadow-intensity", intensity.to_string()));
        }
        if options.ar {
            attrs.push(("ar", String::new()));
        }
        attrs.push(("ar-modes", options.ar_modes.clone()));
        if options.camera_controls {
            attrs.push(("camera-controls", String::new()));
        }
        if options.auto_rotate {
            attrs.push(("auto-rotate", String::new()));
        }
        if let Some(alternate) = self.alternate {
            attrs.push(("ios-src", alternate.to_string()));
        }
        attrs
    }
}

/// Interactive 3D model viewer capability. Loading, rotation and zoom are
/// the implementor's business; failures come back as [`ViewerError`].
pub trait ThreeDRenderer {
    fn render_model(&mut self, request: &ModelRequest<'_>) -> Result<(), ViewerError>;
}

/// Static raster image capability.
pub trait ImageRenderer {
    fn render_image(&mut self, src: &str, label: &str);
}
