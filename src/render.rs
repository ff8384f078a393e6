//! Image rendering for annotated references.
//!
//! Consumes what the annotator produced and nothing else: no filesystem, no
//! image decoding. Dimensions travel inside the reference as a `#WxH` hash.
//!
//! ```text
//! ""                                 →  (nothing)
//! https://example.com/x.png          →  <img src="https://example.com/x.png">
//! /mdx-images/foo.png#300x150        →  <a href="/mdx-images/foo.png" target="_blank" rel="noreferrer">
//!                                         <img src="/mdx-images/foo.png#300x150" width="300" height="150"
//!                                              style="width: 100%; height: auto;" alt="">
//!                                       </a>
//! ```
//!
//! A malformed hash is not an error. Whatever cannot be parsed is simply left
//! off the element and the browser lays the image out without a reserved box.

use crate::encoding::ImageRef;
use maud::{Markup, html};
use url::Url;

/// Base used to split a served path into path and fragment.
const DUMMY_BASE: &str = "https://example.com/";

/// Presentation attributes passed through to the `<img>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttrs {
    pub alt: Option<String>,
    pub title: Option<String>,
    pub class: Option<String>,
    pub loading: Option<String>,
}

impl ImageAttrs {
    pub fn with_alt(alt: impl Into<String>) -> Self {
        Self {
            alt: Some(alt.into()),
            ..Default::default()
        }
    }
}

/// A served reference split into link target and declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    /// URL path, percent-encoded, without query or fragment.
    pub path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Split `reference` into its URL path and `#WxH` dimensions.
///
/// Each side of the `x` is read leniently: leading digits count, anything
/// after them is ignored, and no digits at all means no value.
pub fn parse_reference(reference: &str) -> ParsedReference {
    let (path, fragment) = match Url::parse(DUMMY_BASE).and_then(|base| base.join(reference)) {
        Ok(url) => (url.path().to_string(), url.fragment().unwrap_or("").to_string()),
        Err(_) => match reference.split_once('#') {
            Some((path, fragment)) => (path.to_string(), fragment.to_string()),
            None => (reference.to_string(), String::new()),
        },
    };

    let mut sides = fragment.split('x');
    let width = sides.next().and_then(leading_number);
    let height = sides.next().and_then(leading_number);

    ParsedReference {
        path,
        width,
        height,
    }
}

fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Render an image reference.
///
/// `None` or an empty reference renders nothing.
pub fn render_image(reference: Option<&str>, attrs: &ImageAttrs) -> Markup {
    let src = match reference {
        Some(src) if !src.is_empty() => src,
        _ => return html! {},
    };

    if ImageRef::classify(src).is_remote() {
        return html! {
            img src=(src)
                alt=[attrs.alt.as_deref()]
                title=[attrs.title.as_deref()]
                class=[attrs.class.as_deref()]
                loading=[attrs.loading.as_deref()];
        };
    }

    let parsed = parse_reference(src);
    html! {
        a href=(parsed.path) target="_blank" rel="noreferrer" {
            img src=(src)
                width=[parsed.width]
                height=[parsed.height]
                style="width: 100%; height: auto;"
                alt=(attrs.alt.as_deref().unwrap_or(""))
                title=[attrs.title.as_deref()]
                class=[attrs.class.as_deref()]
                loading=[attrs.loading.as_deref()];
        }
    }
}
