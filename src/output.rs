//! CLI output formatting for all commands.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Warnings go to stderr.
//!
//! # Output Format
//!
//! ## Scan / Check
//!
//! ```text
//! Documents
//! 001 a/b.mdx
//!     Image: ../img/x.png
//! 002 intro.md
//!
//! Image directories
//! 001 img (2 images)
//!     logo.png
//!     x.png
//! ```
//!
//! ## Collect
//!
//! ```text
//! Copied: docs/img/x.png → public/mdx-images/img-x.png
//! Skipped (exists): docs/img/x.png
//! Warning: image not found: docs/img/gone.png (referenced in docs/a/b.mdx)
//!
//! Collected 4 images → public/mdx-images (1 skipped, 1 missing)
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Setup → guides/setup.html (2 images)
//! 002 Intro → intro.html (1 image)
//!
//! Generated 2 pages → dist
//! ```

use crate::collect::{CollectEvent, CollectReport};
use crate::generate::GeneratedPage;
use crate::scan::Manifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Show `path` relative to `base` when it is inside it.
fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Scan output
// ============================================================================

pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    for (i, doc) in manifest.documents.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), doc.relative_path));
        for reference in &doc.references {
            lines.push(format!("    Image: {reference}"));
        }
    }

    lines.push(String::new());
    lines.push("Image directories".to_string());
    for (i, dir) in manifest.image_dirs.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            dir.relative_path,
            plural(dir.images.len(), "image", "images")
        ));
        for image in &dir.images {
            lines.push(format!("    {image}"));
        }
    }
    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Collect output
// ============================================================================

/// Format a single collect progress event. Paths are shown relative to `base`.
pub fn format_collect_event(event: &CollectEvent, base: &Path) -> String {
    match event {
        CollectEvent::Copied { source, dest } => format!(
            "Copied: {} \u{2192} {}",
            display_path(source, base),
            display_path(dest, base)
        ),
        CollectEvent::Skipped { source, .. } => {
            format!("Skipped (exists): {}", display_path(source, base))
        }
        CollectEvent::Missing { source, document } => format!(
            "Warning: image not found: {} (referenced in {})",
            display_path(source, base),
            display_path(document, base)
        ),
    }
}

/// Print a collect event; missing images go to stderr.
pub fn print_collect_event(event: &CollectEvent, base: &Path) {
    let line = format_collect_event(event, base);
    match event {
        CollectEvent::Missing { .. } => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

pub fn format_collect_summary(report: &CollectReport, base: &Path) -> Vec<String> {
    let mut details = Vec::new();
    if !report.skipped.is_empty() {
        details.push(format!("{} skipped", report.skipped.len()));
    }
    if !report.missing.is_empty() {
        details.push(format!("{} missing", report.missing.len()));
    }
    let details = if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    };

    vec![
        String::new(),
        format!(
            "Scanned {} in {}",
            plural(report.documents, "document", "documents"),
            plural(report.image_dirs.len(), "image directory", "image directories")
        ),
        format!(
            "Collected {} \u{2192} {}{}",
            plural(report.copied_count(), "image", "images"),
            display_path(&report.output_dir, base),
            details
        ),
    ]
}

pub fn print_collect_summary(report: &CollectReport, base: &Path) {
    for line in format_collect_summary(report, base) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

pub fn format_generate_output(pages: &[GeneratedPage], site_dir: &Path, base: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        let images = if page.images > 0 {
            format!(" ({})", plural(page.images, "image", "images"))
        } else {
            String::new()
        };
        lines.push(format!(
            "{} {} \u{2192} {}{}",
            format_index(i + 1),
            page.title,
            page.output,
            images
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {} \u{2192} {}",
        plural(pages.len(), "page", "pages"),
        display_path(site_dir, base)
    ));
    lines
}

pub fn print_generate_output(pages: &[GeneratedPage], site_dir: &Path, base: &Path) {
    for line in format_generate_output(pages, site_dir, base) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::{CopiedAsset, MissingReference};
    use crate::scan::{Document, ImageDir};
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn scan_output_lists_documents_and_dirs() {
        let manifest = Manifest {
            root: PathBuf::from("/p/docs"),
            documents: vec![
                Document {
                    path: PathBuf::from("/p/docs/a/b.mdx"),
                    relative_path: "a/b.mdx".to_string(),
                    references: vec!["../img/x.png".to_string()],
                },
                Document {
                    path: PathBuf::from("/p/docs/intro.md"),
                    relative_path: "intro.md".to_string(),
                    references: vec![],
                },
            ],
            image_dirs: vec![ImageDir {
                path: PathBuf::from("/p/docs/img"),
                relative_path: "img".to_string(),
                images: vec!["x.png".to_string()],
            }],
        };
        assert_eq!(
            format_scan_output(&manifest),
            vec![
                "Documents",
                "001 a/b.mdx",
                "    Image: ../img/x.png",
                "002 intro.md",
                "",
                "Image directories",
                "001 img (1 image)",
                "    x.png",
            ]
        );
    }

    #[test]
    fn collect_event_paths_relative_to_base() {
        let base = Path::new("/p");
        let copied = CollectEvent::Copied {
            source: PathBuf::from("/p/docs/img/x.png"),
            dest: PathBuf::from("/p/public/mdx-images/img-x.png"),
        };
        assert_eq!(
            format_collect_event(&copied, base),
            "Copied: docs/img/x.png \u{2192} public/mdx-images/img-x.png"
        );

        let missing = CollectEvent::Missing {
            source: PathBuf::from("/p/docs/img/gone.png"),
            document: PathBuf::from("/p/docs/a/b.mdx"),
        };
        assert_eq!(
            format_collect_event(&missing, base),
            "Warning: image not found: docs/img/gone.png (referenced in docs/a/b.mdx)"
        );
    }

    #[test]
    fn collect_summary_mentions_skipped_and_missing() {
        let asset = CopiedAsset {
            source: PathBuf::from("/p/docs/img/x.png"),
            dest: PathBuf::from("/p/public/mdx-images/img-x.png"),
        };
        let report = CollectReport {
            output_dir: PathBuf::from("/p/public/mdx-images"),
            documents: 3,
            image_dirs: vec!["img".to_string()],
            copied: vec![asset.clone(), asset.clone()],
            skipped: vec![asset],
            missing: vec![MissingReference {
                source: PathBuf::from("/p/docs/gone.png"),
                document: PathBuf::from("/p/docs/a.mdx"),
            }],
        };
        let lines = format_collect_summary(&report, Path::new("/p"));
        assert_eq!(lines[1], "Scanned 3 documents in 1 image directory");
        assert_eq!(
            lines[2],
            "Collected 2 images \u{2192} public/mdx-images (1 skipped, 1 missing)"
        );
    }

    #[test]
    fn collect_summary_without_details() {
        let report = CollectReport {
            output_dir: PathBuf::from("/p/public/mdx-images"),
            ..Default::default()
        };
        let lines = format_collect_summary(&report, Path::new("/p"));
        assert_eq!(lines[2], "Collected 0 images \u{2192} public/mdx-images");
    }

    #[test]
    fn generate_output_lists_pages() {
        let pages = vec![
            GeneratedPage {
                title: "Setup".to_string(),
                source: "guides/setup.mdx".to_string(),
                output: "guides/setup.html".to_string(),
                images: 2,
            },
            GeneratedPage {
                title: "Plain".to_string(),
                source: "plain.md".to_string(),
                output: "plain.html".to_string(),
                images: 0,
            },
        ];
        assert_eq!(
            format_generate_output(&pages, Path::new("/p/dist"), Path::new("/p")),
            vec![
                "001 Setup \u{2192} guides/setup.html (2 images)",
                "002 Plain \u{2192} plain.html",
                "",
                "Generated 2 pages \u{2192} dist",
            ]
        );
    }
}
