use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};
use crate::error::AssetError;

/// Turns an asset reference into a local path. Relative references are
/// resolved against the catalog directory; remote URLs are rejected.
pub fn resolve_asset(base_dir: &Path, reference: &str) -> Result<PathBuf, AssetError> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Err(AssetError::Remote(reference.to_string()));
    }
    let reference = reference.strip_prefix("file://").unwrap_or(reference);
    Ok(base_dir.join(reference))
}

fn extension_of(path: &Path) -> String {
    path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase()
}

// EXIF orientation, JPEG only. 1 when missing or unreadable.
fn read_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    let extension = extension_of(image_path);
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }

    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Value::Short(values) = &field.value {
                    if let Some(orientation) = values.first() {
                        return *orientation;
                    }
                }
            }
            1
        }
        Err(e) => {
            log::warn!("could not read EXIF data for {:?}: {}", image_path, e);
            1
        }
    }
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D, AssetError> {
    let file_bytes = fs::read(image_path).map_err(|source| AssetError::Read {
        path: image_path.to_path_buf(),
        source,
    })?;

    let orientation = read_orientation(image_path, &file_bytes);

    // Extension hint for loading from memory
    let extension = extension_of(image_path);
    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| AssetError::Decode { path: image_path.to_path_buf(), reason: e.to_string() })?;

    // 3 = 180 deg, 6 = 90 deg clockwise, 8 = 90 deg counter-clockwise.
    // Flipped orientations are left as is.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => {
            image.rotate_cw();
        }
        8 => {
            image.rotate_ccw();
        }
        _ => {}
    }
    if orientation != 1 {
        log::debug!("applied EXIF orientation {} to {:?}", orientation, image_path);
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| AssetError::Upload { path: image_path.to_path_buf(), reason: e.to_string() })?;

    // Free the CPU-side copy
    drop(image);

    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_references_resolve_against_catalog_dir() {
        let path = resolve_asset(Path::new("/srv/catalog"), "img/vase.jpg").unwrap();
        assert_eq!(path, PathBuf::from("/srv/catalog/img/vase.jpg"));
    }

    #[test]
    fn absolute_and_file_references() {
        let base = Path::new("/srv/catalog");
        assert_eq!(resolve_asset(base, "/tmp/a.png").unwrap(), PathBuf::from("/tmp/a.png"));
        assert_eq!(resolve_asset(base, "file:///tmp/a.png").unwrap(), PathBuf::from("/tmp/a.png"));
    }

    #[test]
    fn remote_references_are_rejected() {
        let err = resolve_asset(Path::new("."), "https://cdn.example/a.jpg").unwrap_err();
        assert!(matches!(err, AssetError::Remote(_)));
    }

    #[test]
    fn non_jpeg_has_no_orientation() {
        assert_eq!(read_orientation(Path::new("a.png"), b"not an image"), 1);
    }
}
