//! Image backend trait and shared types.
//!
//! The annotator only ever needs one thing from an image file: its pixel
//! dimensions. [`ImageBackend::identify`] is that seam. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend), which
//! reads dimensions from the file header without decoding pixel data.

use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read dimensions of {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Formats as `WxH`, the body of a dimension hash.
impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image backends.
///
/// `Sync` so one backend can be shared across rayon workers compiling
/// documents in parallel.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock backend that answers from a fixed table and records every lookup.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: HashMap<PathBuf, Dimensions>,
        pub identified: Mutex<Vec<PathBuf>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_image(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
            self.dimensions
                .insert(path.into(), Dimensions { width, height });
            self
        }

        pub fn get_identified(&self) -> Vec<PathBuf> {
            self.identified.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.identified.lock().unwrap().push(path.to_path_buf());
            self.dimensions
                .get(path)
                .copied()
                .ok_or_else(|| BackendError::Unreadable {
                    path: path.display().to_string(),
                    reason: "no mock dimensions".to_string(),
                })
        }
    }

    #[test]
    fn dimensions_display_as_wxh() {
        let dims = Dimensions {
            width: 300,
            height: 150,
        };
        assert_eq!(dims.to_string(), "300x150");
    }

    #[test]
    fn mock_records_lookups() {
        let backend = MockBackend::new().with_image("/a.png", 10, 20);
        let dims = backend.identify(Path::new("/a.png")).unwrap();
        assert_eq!(dims.width, 10);
        assert!(backend.identify(Path::new("/missing.png")).is_err());
        assert_eq!(
            backend.get_identified(),
            vec![PathBuf::from("/a.png"), PathBuf::from("/missing.png")]
        );
    }
}
