//! Image inspection in pure Rust, no system libraries.
//!
//! Only dimensions are ever read. Split into:
//! - **Backend**: [`ImageBackend`] trait + [`Dimensions`]
//! - **Rust backend**: [`RustBackend`], header-only reads via the `image` crate

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use rust_backend::RustBackend;
