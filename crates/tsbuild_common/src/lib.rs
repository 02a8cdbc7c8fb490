//! Shared foundational types used across the tsbuild crates.
//!
//! This crate provides the content hash used as a change signature and the
//! path quoting helpers shared by the options resolver, the change cache,
//! and the compilation driver.

#![warn(missing_docs)]

pub mod hash;
pub mod path;

pub use hash::ContentHash;
pub use path::{end_with_slash, escape_path_if_required, is_javascript_file, unquote_path};
