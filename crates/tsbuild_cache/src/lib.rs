//! Change tracking for fast (incremental) compilation.
//!
//! This crate remembers, per compilation target, the content hash of every
//! source file at its last successful compile, and answers which files have
//! changed since then.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod hasher;
pub mod manifest;

pub use cache::{ChangeCache, ChangeTracker};
pub use error::CacheError;
pub use hasher::SourceHasher;
pub use manifest::{CacheManifest, TargetCache};
