//! Image reference rewriting and size annotation.
//!
//! Runs once per document during compilation. Every image node is mapped
//! through [`annotate_reference`]:
//!
//! | Reference | Result |
//! |---|---|
//! | `https://example.com/x.png` | unchanged, never measured |
//! | `/logo.png` | `/logo.png#200x100` (measured under the public root) |
//! | `../img/x.png` | `/mdx-images/img-x.png#300x150` (measured next to the document) |
//!
//! The local case uses the same encoding as the collector, so the rewritten
//! path names the file the collector already placed.
//!
//! ## Failure
//!
//! A target that is missing or unreadable fails the whole document. There is
//! no fallback: shipping a page whose image cannot be sized is a build error.
//!
//! ## Purity
//!
//! [`annotate_events`] is a single mapping pass over a `pulldown-cmark` event
//! list. The only inputs are the events, an [`AnnotateOptions`] value and an
//! [`ImageBackend`]; nothing is shared between documents, so callers may
//! annotate many documents in parallel.

use crate::encoding::{
    ImageRef, encode_asset_name, normalize, public_asset_path, resolve_reference,
    with_dimension_hash,
};
use crate::imaging::{BackendError, Dimensions, ImageBackend};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Cannot size image '{reference}' ({path}): {source}")]
    Measure {
        reference: String,
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Per-document configuration.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// The document being compiled; local references resolve from its directory.
    pub document_path: PathBuf,
    /// Root that encoded names are relative to (the docs root).
    pub source_folder: PathBuf,
    /// Served root that public-rooted references resolve against.
    pub public_folder: PathBuf,
    /// URL prefix of the flat image directory, e.g. `/mdx-images`.
    pub asset_prefix: String,
}

impl AnnotateOptions {
    /// Options for one document, sharing the project-wide roots.
    pub fn for_document(
        document_path: &Path,
        source_folder: &Path,
        public_folder: &Path,
        asset_prefix: &str,
    ) -> Self {
        Self {
            document_path: document_path.to_path_buf(),
            source_folder: source_folder.to_path_buf(),
            public_folder: public_folder.to_path_buf(),
            asset_prefix: asset_prefix.to_string(),
        }
    }
}

/// Markdown extensions enabled for every document.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Rewrite a single reference.
///
/// Returns `Ok(None)` when the reference is left exactly as written.
pub fn annotate_reference(
    reference: &str,
    options: &AnnotateOptions,
    backend: &impl ImageBackend,
) -> Result<Option<String>, AnnotateError> {
    match ImageRef::classify(reference) {
        ImageRef::Remote(_) => Ok(None),
        ImageRef::PublicRooted(path) => {
            let target = normalize(&options.public_folder.join(path.trim_start_matches('/')));
            let dims = measure(reference, &target, backend)?;
            Ok(Some(with_dimension_hash(path, dims)))
        }
        ImageRef::Local(path) => {
            let target = resolve_reference(&options.document_path, path);
            let dims = measure(reference, &target, backend)?;
            let encoded = encode_asset_name(&options.source_folder, &target);
            let public = public_asset_path(&options.asset_prefix, &encoded);
            Ok(Some(with_dimension_hash(&public, dims)))
        }
    }
}

fn measure(
    reference: &str,
    target: &Path,
    backend: &impl ImageBackend,
) -> Result<Dimensions, AnnotateError> {
    backend
        .identify(target)
        .map_err(|source| AnnotateError::Measure {
            reference: reference.to_string(),
            path: target.to_path_buf(),
            source,
        })
}

/// Rewrite the destination of every image node in an event stream.
///
/// All other events pass through untouched and in order.
pub fn annotate_events<'a>(
    events: impl IntoIterator<Item = Event<'a>>,
    options: &AnnotateOptions,
    backend: &impl ImageBackend,
) -> Result<Vec<Event<'a>>, AnnotateError> {
    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match annotate_reference(&dest_url, options, backend)? {
                    Some(rewritten) => CowStr::from(rewritten),
                    None => dest_url,
                };
                Ok(Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }))
            }
            other => Ok(other),
        })
        .collect()
}

/// Parse a markdown document and annotate its image nodes.
pub fn annotate_markdown<'a>(
    source: &'a str,
    options: &AnnotateOptions,
    backend: &impl ImageBackend,
) -> Result<Vec<Event<'a>>, AnnotateError> {
    annotate_events(
        Parser::new_ext(source, markdown_options()),
        options,
        backend,
    )
}

/// Destinations of all image nodes, in document order.
pub fn image_destinations<'a>(events: &'a [Event<'a>]) -> Vec<&'a str> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Image { dest_url, .. }) => Some(dest_url.as_ref()),
            _ => None,
        })
        .collect()
}
