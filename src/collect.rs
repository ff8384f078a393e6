//! Asset collection: copy every image a document may need into one flat
//! public directory.
//!
//! This is a pre-pass safety net. The annotator is authoritative about which
//! name a page will ask for; the collector makes sure a file is already
//! sitting at that name when the page is served.
//!
//! ## Two Passes
//!
//! 1. **Inline references.** For each reference the scanner extracted, the
//!    source is resolved from the document's directory and copied to
//!    `<assets>/<encoded name>`. Existing files are overwritten. Missing
//!    sources produce a [`CollectEvent::Missing`] warning and collection
//!    continues.
//! 2. **Image directories.** Every raster file in every image directory is
//!    copied to `<assets>/<bulk prefix><file name>`. A file already at the
//!    destination is skipped, never overwritten, so the pass is idempotent.
//!
//! ```text
//! docs/a/b.mdx      ![](../img/x.png)   →  public/mdx-images/img-x.png
//! docs/img/x.png    (image directory)   →  public/mdx-images/img-x.png (skipped, exists)
//! docs/guides/img/step-1.png            →  public/mdx-images/img-step-1.png
//! ```

use crate::encoding::{encode_asset_name, resolve_reference};
use crate::scan::Manifest;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Failed to create {0}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("Failed to copy {0} to {1}: {2}")]
    Copy(PathBuf, PathBuf, #[source] std::io::Error),
}

/// Progress events emitted during collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectEvent {
    Copied { source: PathBuf, dest: PathBuf },
    Skipped { source: PathBuf, dest: PathBuf },
    Missing { source: PathBuf, document: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedAsset {
    pub source: PathBuf,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    pub source: PathBuf,
    pub document: PathBuf,
}

/// Outcome of one collection run.
#[derive(Debug, Default)]
pub struct CollectReport {
    pub output_dir: PathBuf,
    pub documents: usize,
    pub image_dirs: Vec<String>,
    pub copied: Vec<CopiedAsset>,
    pub skipped: Vec<CopiedAsset>,
    pub missing: Vec<MissingReference>,
}

impl CollectReport {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }
}

/// Copy all referenced and bulk images from a scanned docs tree.
///
/// `bulk_prefix` is prepended to file names from image directories.
pub fn collect(
    manifest: &Manifest,
    output_dir: &Path,
    bulk_prefix: &str,
    events: Option<Sender<CollectEvent>>,
) -> Result<CollectReport, CollectError> {
    fs::create_dir_all(output_dir)
        .map_err(|e| CollectError::CreateDir(output_dir.to_path_buf(), e))?;

    let mut report = CollectReport {
        output_dir: output_dir.to_path_buf(),
        documents: manifest.documents.len(),
        image_dirs: manifest
            .image_dirs
            .iter()
            .map(|d| d.relative_path.clone())
            .collect(),
        ..Default::default()
    };
    let emit = |event: CollectEvent| {
        if let Some(tx) = &events {
            let _ = tx.send(event);
        }
    };

    for document in &manifest.documents {
        for reference in &document.references {
            let source = resolve_reference(&document.path, reference);
            let dest = output_dir.join(encode_asset_name(&manifest.root, &source));

            if !source.is_file() {
                emit(CollectEvent::Missing {
                    source: source.clone(),
                    document: document.path.clone(),
                });
                report.missing.push(MissingReference {
                    source,
                    document: document.path.clone(),
                });
                continue;
            }

            copy_file(&source, &dest)?;
            emit(CollectEvent::Copied {
                source: source.clone(),
                dest: dest.clone(),
            });
            report.copied.push(CopiedAsset { source, dest });
        }
    }

    for dir in &manifest.image_dirs {
        for file in &dir.images {
            let source = dir.path.join(file);
            let dest = output_dir.join(format!("{bulk_prefix}{file}"));

            if dest.exists() {
                emit(CollectEvent::Skipped {
                    source: source.clone(),
                    dest: dest.clone(),
                });
                report.skipped.push(CopiedAsset { source, dest });
                continue;
            }

            copy_file(&source, &dest)?;
            emit(CollectEvent::Copied {
                source: source.clone(),
                dest: dest.clone(),
            });
            report.copied.push(CopiedAsset { source, dest });
        }
    }

    Ok(report)
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), CollectError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CollectError::CreateDir(parent.to_path_buf(), e))?;
    }
    fs::copy(source, dest)
        .map_err(|e| CollectError::Copy(source.to_path_buf(), dest.to_path_buf(), e))?;
    Ok(())
}
