use std::path::PathBuf;
use clap::Parser;
use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::viewer::{CrossOrigin, ViewerOptions, DEFAULT_AR_MODES};

/// Browse a product catalog export with an image / 3D model carousel.
#[derive(Debug, Parser)]
#[command(name = "storefront", version)]
pub struct Config {
    /// JSON catalog export; relative asset paths resolve against its directory
    pub catalog: PathBuf,

    /// Open directly on this product's page
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    pub width: i32,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    pub height: i32,

    /// Public site address used in order links
    #[arg(long, default_value = "")]
    pub site_url: String,

    /// Disable AR in the 3D viewer
    #[arg(long)]
    pub no_ar: bool,

    #[arg(long, default_value = DEFAULT_AR_MODES)]
    pub ar_modes: String,

    /// Disable orbit and zoom in the 3D viewer
    #[arg(long)]
    pub no_camera_controls: bool,

    #[arg(long)]
    pub no_auto_rotate: bool,

    /// CORS mode for model requests
    #[arg(long, value_enum, default_value_t = CrossOrigin::Anonymous)]
    pub crossorigin: CrossOrigin,

    /// Model brightness, 0.0 to 1.0
    #[arg(long)]
    pub exposure: Option<f32>,
}

impl Config {
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            ar: !self.no_ar,
            ar_modes: self.ar_modes.clone(),
            camera_controls: !self.no_camera_controls,
            auto_rotate: !self.no_auto_rotate,
            crossorigin: self.crossorigin,
            exposure: self.exposure,
            ..ViewerOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["storefront", "catalog.json"]).unwrap();
        assert_eq!(config.catalog, PathBuf::from("catalog.json"));
        assert_eq!(config.width, WINDOW_WIDTH);
        assert_eq!(config.viewer_options(), ViewerOptions::default());
    }

    #[test]
    fn viewer_overrides() {
        let config = Config::try_parse_from([
            "storefront",
            "catalog.json",
            "--slug",
            "vase",
            "--no-auto-rotate",
            "--no-ar",
            "--crossorigin",
            "use-credentials",
        ])
        .unwrap();
        let options = config.viewer_options();
        assert_eq!(config.slug.as_deref(), Some("vase"));
        assert!(!options.ar && !options.auto_rotate && options.camera_controls);
        assert_eq!(options.crossorigin, CrossOrigin::UseCredentials);
    }

    #[test]
    fn catalog_is_required() {
        assert!(Config::try_parse_from(["storefront"]).is_err());
    }
}
