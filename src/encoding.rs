//! Image reference classification and the deterministic asset-name encoding.
//!
//! Every local image lands in one flat public directory. Its file name is the
//! image's path relative to the docs root with every separator replaced by a
//! dash:
//!
//! ```text
//! docs/guides/setup.mdx  →  ![](../img/diagram.png)
//! resolved               →  docs/img/diagram.png
//! relative to docs/      →  img/diagram.png
//! encoded                →  img-diagram.png
//! ```
//!
//! The collector and the annotator both call [`encode_reference`], so a file
//! copied by one is found under the exact name the other writes into the page.
//!
//! ## Known Limitation
//!
//! There is no collision guard. `img/a-b.png` and `img-a/b.png` both encode to
//! `img-a-b.png`. Authors keep dashes out of directory names to avoid this.
//!
//! ## Path Resolution
//!
//! Resolution is purely lexical: `.` and `..` are folded without touching the
//! filesystem, and symlinks are not followed. Encoding is a pure function of
//! its inputs, except that a relative side is anchored at the current
//! directory when the other side is absolute.

use crate::imaging::Dimensions;
use std::path::{Component, Path, PathBuf};

/// How an image reference is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// Absolute URL (`http://`, `https://`). Never rewritten or measured.
    Remote(&'a str),
    /// Starts with `/`: already relative to the served root.
    PublicRooted(&'a str),
    /// Relative to the document that contains it.
    Local(&'a str),
}

impl<'a> ImageRef<'a> {
    pub fn classify(reference: &'a str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            ImageRef::Remote(reference)
        } else if reference.starts_with('/') {
            ImageRef::PublicRooted(reference)
        } else {
            ImageRef::Local(reference)
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Remote(_))
    }
}

/// Fold `.` and `..` components lexically.
///
/// `..` at the root is dropped; `..` at the start of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a local reference against the directory of the document holding it.
pub fn resolve_reference(document: &Path, reference: &str) -> PathBuf {
    let dir = document.parent().unwrap_or_else(|| Path::new(""));
    normalize(&dir.join(reference))
}

/// Components of `target` relative to `root`, with `..` for each level that
/// `target` sits outside of `root`.
///
/// When only one side is absolute, both are made absolute against the
/// current directory first; a root directory never becomes a name component.
pub fn relative_components(root: &Path, target: &Path) -> Vec<String> {
    let (root, target) = if root.is_absolute() == target.is_absolute() {
        (normalize(root), normalize(target))
    } else {
        (normalize(&absolutize(root)), normalize(&absolutize(target)))
    };
    let root_parts: Vec<Component> = root.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let common = root_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts = vec!["..".to_string(); root_parts.len() - common];
    parts.extend(
        target_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Flatten `target` into a single file name relative to `root`.
///
/// Both `/` and `\` become `-`, so the result never contains a separator
/// regardless of which platform authored the reference.
pub fn encode_asset_name(root: &Path, target: &Path) -> String {
    relative_components(root, target)
        .join("-")
        .replace(['/', '\\'], "-")
}

/// Resolve `reference` from `document` and encode it relative to `root`.
pub fn encode_reference(document: &Path, reference: &str, root: &Path) -> String {
    encode_asset_name(root, &resolve_reference(document, reference))
}

/// Join a public URL prefix (`/mdx-images`) and an encoded name.
pub fn public_asset_path(prefix: &str, encoded_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), encoded_name)
}

/// Append a `#WxH` dimension hash.
pub fn with_dimension_hash(reference: &str, dims: Dimensions) -> String {
    format!("{reference}#{dims}")
}
