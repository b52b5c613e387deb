use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the catalog export.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("product not found: {0}")]
    NotFound(String),
}

/// Failures while turning an image reference into a texture.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("remote asset {0} cannot be loaded from the local catalog")]
    Remote(String),

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to upload texture for {path:?}: {reason}")]
    Upload { path: PathBuf, reason: String },
}

/// Errors surfaced by the 3D viewer. They are logged by the carousel and
/// never change its state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("failed to load model {src}: {reason}")]
    Load { src: String, reason: String },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),
}
