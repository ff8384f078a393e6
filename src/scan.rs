//! Documentation tree scanning.
//!
//! Walks the docs root and produces a [`Manifest`] of everything the collector
//! and the page generator need to know:
//!
//! ```text
//! docs/                          # Docs root
//! ├── intro.mdx                  # Document
//! ├── img/                       # Image directory (bulk-copied)
//! │   ├── logo.png
//! │   └── banner.jpg
//! └── guides/
//!     ├── setup.mdx              # ![](./img/step-1.png), ![](../img/logo.png)
//!     └── img/
//!         └── step-1.png
//! ```
//!
//! ## Inline References
//!
//! Only the collector's narrow pattern is extracted here: markdown images
//! whose path starts with `./<img>/` or `../<img>/`, where `<img>` is the
//! configured image directory name. Everything else is left to the annotator,
//! which sees the fully parsed document.
//!
//! Hidden files and directories (leading `.`) are skipped, as are symlinks.

use crate::config::DocsConfig;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
    #[error("Docs directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Invalid reference pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Scan output: documents and image directories under one docs root.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub root: PathBuf,
    pub documents: Vec<Document>,
    pub image_dirs: Vec<ImageDir>,
}

/// An authored document and the collector-visible image references in it.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub path: PathBuf,
    /// Path relative to the docs root, `/`-separated.
    pub relative_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// A directory named like the configured image directory.
#[derive(Debug, Clone, Serialize)]
pub struct ImageDir {
    pub path: PathBuf,
    pub relative_path: String,
    /// File names with a recognized raster extension, sorted.
    pub images: Vec<String>,
}

/// Matches `![alt](./img/...)` and `![alt](../img/...)` for one image dir name.
pub struct ReferencePattern {
    regex: Regex,
}

impl ReferencePattern {
    pub fn new(image_dir_name: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r#"!\[[^\]]*\]\((\.\.?/{}/[^")]+?)\s*(?:"[^"]*")?\)"#,
            regex::escape(image_dir_name)
        );
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// All matching references, in document order, duplicates kept.
    pub fn extract(&self, content: &str) -> Vec<String> {
        self.regex
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect()
    }
}

pub fn scan(root: &Path, config: &DocsConfig) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    let pattern = ReferencePattern::new(&config.collect.image_dir_name)?;

    let mut documents = Vec::new();
    let mut image_dirs = Vec::new();

    for entry in walk(root) {
        let entry = entry.map_err(|e| ScanError::Walk(root.to_path_buf(), e))?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            if entry.depth() > 0 && entry.file_name() == config.collect.image_dir_name.as_str() {
                image_dirs.push(ImageDir {
                    path: path.to_path_buf(),
                    relative_path: relative_display(root, path),
                    images: list_images(path, config)?,
                });
            }
        } else if entry.file_type().is_file() && config.documents.is_document(path) {
            // Not every document is valid UTF-8; references are ASCII either way.
            let bytes = fs::read(path).map_err(|e| ScanError::Read(path.to_path_buf(), e))?;
            documents.push(Document {
                path: path.to_path_buf(),
                relative_path: relative_display(root, path),
                references: pattern.extract(&String::from_utf8_lossy(&bytes)),
            });
        }
    }

    Ok(Manifest {
        root: root.to_path_buf(),
        documents,
        image_dirs,
    })
}

fn walk(root: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn list_images(dir: &Path, config: &DocsConfig) -> Result<Vec<String>, ScanError> {
    let mut images: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && config.collect.is_image_file(p))
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    images.sort();
    Ok(images)
}

fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
