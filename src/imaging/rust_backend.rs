//! Pure Rust image backend built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify (PNG, JPEG, GIF, WebP) | `image::image_dimensions` (header only, no decode) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| match e {
            image::ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::Unreadable {
                path: path.display().to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(Dimensions { width, height })
    }
}
