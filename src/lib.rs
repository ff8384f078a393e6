//! # docimg
//!
//! Build-time image handling for documentation sites. Authors write plain
//! relative image paths next to their documents; the build turns every one of
//! them into a stable public URL carrying the image's pixel size, so pages can
//! reserve layout space before the image loads.
//!
//! # Architecture: Three Independent Pieces
//!
//! ```text
//! 1. Collect    docs/**        →  public/mdx-images/   (copy under encoded names)
//! 2. Annotate   document       →  rewritten references (encoded name + #WxH)
//! 3. Render     reference      →  <a><img width height></a>
//! ```
//!
//! The collector and the annotator never talk to each other. They agree
//! because both derive file names from [`encoding::encode_reference`]: the
//! image path relative to the docs root with separators replaced by dashes.
//! The renderer only reads what the annotator wrote into the reference.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`encoding`] | Reference classification, lexical path resolution, encoded names, dimension hashes |
//! | [`scan`] | Walks the docs root: documents, their inline references, image directories |
//! | [`collect`] | Copies referenced and bulk images into the flat public directory |
//! | [`annotate`] | Rewrites image nodes in a parsed document and appends `#WxH` |
//! | [`render`] | Turns an annotated reference into HTML with Maud |
//! | [`generate`] | Compiles every document into an HTML page using the three pieces above |
//! | [`imaging`] | `ImageBackend` trait and the pure-Rust dimension reader |
//! | [`config`] | `docimg.toml` loading, defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Dimensions Travel In The URL
//!
//! `/mdx-images/img-x.png#300x150` carries everything the renderer needs. No
//! sidecar manifest, no lookup table, no cache to invalidate: every build
//! recomputes everything from the files on disk.
//!
//! ## Explicit Roots Everywhere
//!
//! No component knows about `docs/` or `public/`. Roots are passed in, which
//! keeps every piece testable against a temp directory or a mock backend.
//!
//! ## Hard Failure On Unsized Images
//!
//! The collector warns about missing files and carries on; it is a safety net.
//! The annotator fails the document; a page with an unsized image is a broken
//! build, not a warning.

pub mod annotate;
pub mod collect;
pub mod config;
pub mod encoding;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod render;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
