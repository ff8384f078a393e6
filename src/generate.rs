//! HTML page generation.
//!
//! The document-compilation host. Each document goes through the same three
//! steps the pieces were built for:
//!
//! ```text
//! docs/a/b.mdx ── parse ──► events ── annotate ──► events ── render ──► dist/a/b.html
//!                 (pulldown-cmark)      (sizes)               (maud)
//! ```
//!
//! Image nodes are replaced with [`render_image`] markup. Their alt text is
//! gathered from the events between the image's start and end tags. Every
//! other event goes through `pulldown-cmark`'s own HTML writer.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── a/b.html                   # One page per document, same relative path
//! ├── guides/setup.html
//! ├── logo.png                   # public/ copied verbatim
//! └── mdx-images/
//!     └── img-x.png
//! ```
//!
//! ## Parallelism
//!
//! Documents are compiled with rayon. A document whose image cannot be sized
//! fails the whole run with [`GenerateError::Annotate`], naming the document.

use crate::annotate::{AnnotateError, AnnotateOptions, annotate_markdown};
use crate::config::{ProjectPaths, site_inside_public};
use crate::imaging::ImageBackend;
use crate::render::{ImageAttrs, render_image};
use crate::scan::{Document, Manifest};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd, html as md_html};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("Site directory {site} must not be the public directory {public} or inside it")]
    SiteInsidePublic { site: PathBuf, public: PathBuf },
    #[error("{first} and {second} would both be written to {output}")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },
    #[error("Failed to compile {document}: {source}")]
    Annotate {
        document: PathBuf,
        #[source]
        source: AnnotateError,
    },
}

/// One generated page.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub title: String,
    /// Source path relative to the docs root.
    pub source: String,
    /// Output path relative to the site root.
    pub output: String,
    pub images: usize,
}

const CSS: &str = include_str!("../static/style.css");

/// Compile every document in `manifest` into `paths.site_dir`.
///
/// Copies `paths.public_dir` into the site root afterwards so collected
/// images are served next to the pages. Nothing is written when the site
/// directory overlaps the public directory or two documents share an output.
pub fn generate(
    manifest: &Manifest,
    paths: &ProjectPaths,
    asset_prefix: &str,
    backend: &impl ImageBackend,
) -> Result<Vec<GeneratedPage>, GenerateError> {
    if site_inside_public(&paths.public_dir, &paths.site_dir) {
        return Err(GenerateError::SiteInsidePublic {
            site: paths.site_dir.clone(),
            public: paths.public_dir.clone(),
        });
    }
    check_unique_outputs(&manifest.documents)?;
    fs::create_dir_all(&paths.site_dir)?;

    let pages = manifest
        .documents
        .par_iter()
        .map(|document| {
            let options = AnnotateOptions::for_document(
                &document.path,
                &paths.docs_dir,
                &paths.public_dir,
                asset_prefix,
            );
            generate_page(document, &options, &paths.site_dir, backend)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if paths.public_dir.is_dir() {
        copy_dir_recursive(&paths.public_dir, &paths.site_dir)?;
    }

    Ok(pages)
}

fn generate_page(
    document: &Document,
    options: &AnnotateOptions,
    site_dir: &Path,
    backend: &impl ImageBackend,
) -> Result<GeneratedPage, GenerateError> {
    let source = fs::read_to_string(&document.path)
        .map_err(|e| GenerateError::Read(document.path.clone(), e))?;
    let events =
        annotate_markdown(&source, options, backend).map_err(|source| GenerateError::Annotate {
            document: document.path.clone(),
            source,
        })?;

    let title = document_title(&events).unwrap_or_else(|| fallback_title(&document.path));
    let (body, images) = render_body(events);
    let page = base_document(&title, html! { (PreEscaped(body)) });

    let output = page_output_path(&document.relative_path);
    let output_path = site_dir.join(&output);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, page.into_string())?;

    Ok(GeneratedPage {
        title,
        source: document.relative_path.clone(),
        output,
        images,
    })
}

/// Reject two documents that map to one page, e.g. `intro.md` and `intro.mdx`.
fn check_unique_outputs(documents: &[Document]) -> Result<(), GenerateError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for document in documents {
        let output = page_output_path(&document.relative_path);
        if let Some(first) = seen.get(&output) {
            return Err(GenerateError::DuplicateOutput {
                second: document.relative_path.clone(),
                first: first.to_string(),
                output,
            });
        }
        seen.insert(output, &document.relative_path);
    }
    Ok(())
}

/// `guides/setup.mdx` → `guides/setup.html`
pub fn page_output_path(relative_path: &str) -> String {
    match relative_path.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() && !stem.ends_with('/') => format!("{stem}.html"),
        _ => format!("{relative_path}.html"),
    }
}

/// Text of the first level-1 heading, if any.
fn document_title(events: &[Event]) -> Option<String> {
    let mut in_title = false;
    let mut title = String::new();
    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_title = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let trimmed = title.trim();
                return (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            Event::Text(text) | Event::Code(text) if in_title => title.push_str(text),
            _ => {}
        }
    }
    None
}

fn fallback_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('-', " "))
        .unwrap_or_default()
}

/// Render events to HTML, replacing every image with [`render_image`] markup.
///
/// Returns the HTML and the number of images rendered.
fn render_body(events: Vec<Event<'_>>) -> (String, usize) {
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    let mut image: Option<(CowStr, CowStr, String)> = None;
    let mut depth = 0usize;
    let mut count = 0;

    for event in events {
        if image.is_some() {
            match event {
                Event::Start(Tag::Image { .. }) => depth += 1,
                Event::End(TagEnd::Image) if depth > 0 => depth -= 1,
                Event::End(TagEnd::Image) => {
                    if let Some((dest, title, alt)) = image.take() {
                        let attrs = ImageAttrs {
                            alt: Some(alt),
                            title: (!title.is_empty()).then(|| title.into_string()),
                            class: None,
                            loading: Some("lazy".to_string()),
                        };
                        let markup = render_image(Some(&*dest), &attrs);
                        out.push(Event::InlineHtml(markup.into_string().into()));
                        count += 1;
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, _, alt)) = image.as_mut() {
                        alt.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, _, alt)) = image.as_mut() {
                        alt.push(' ');
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => image = Some((dest_url, title, String::new())),
            other => out.push(other),
        }
    }

    let mut html = String::new();
    md_html::push_html(&mut html, out.into_iter());
    (html, count)
}

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                main.doc-page {
                    article.doc-content {
                        (content)
                    }
                }
            }
        }
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
