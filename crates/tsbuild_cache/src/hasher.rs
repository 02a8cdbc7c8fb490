//! Source file hashing.

use std::path::{Path, PathBuf};

use tsbuild_common::{unquote_path, ContentHash};

use crate::error::CacheError;

/// Utility for computing the change signature of source files.
pub struct SourceHasher;

impl SourceHasher {
    /// Computes the content hash of a single file.
    ///
    /// Reads the file and returns its XXH3-128 content hash.
    pub fn hash_file(path: &Path) -> Result<ContentHash, CacheError> {
        let content = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Converts a (possibly quoted) file entry from a compilation task into
    /// the path used as the manifest key.
    pub fn key_for(file: &str) -> PathBuf {
        PathBuf::from(unquote_path(file))
    }
}
