//! Cache manifest recording the last successfully compiled state of each target.
//!
//! The manifest is stored as `manifest.json` in the cache directory. For every
//! target name it maps each source file to the content hash the file had when
//! it was last part of a successful compile.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tsbuild_common::ContentHash;

use crate::error::CacheError;

/// Name of the manifest file within the cache directory.
const MANIFEST_FILE: &str = "manifest.json";

/// Top-level cache manifest, keyed by target name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    /// tsbuild version that produced this cache. Invalidate on version change.
    pub tsbuild_version: String,

    /// Per-target file signatures.
    pub targets: BTreeMap<String, TargetCache>,
}

/// Signatures of the files last compiled successfully for one target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetCache {
    /// Content hash of each file, keyed by the path as given in the target.
    pub files: BTreeMap<PathBuf, ContentHash>,
}

impl CacheManifest {
    /// Creates a new, empty manifest for the given tsbuild version.
    pub fn new(tsbuild_version: &str) -> Self {
        Self {
            tsbuild_version: tsbuild_version.to_string(),
            targets: BTreeMap::new(),
        }
    }

    /// Loads the manifest from the cache directory, returning `None` if
    /// the file doesn't exist or can't be parsed.
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let path = cache_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the manifest to the cache directory.
    ///
    /// Creates the cache directory if it doesn't exist.
    pub fn save(&self, cache_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(cache_dir).map_err(|e| CacheError::Io {
            path: cache_dir.to_path_buf(),
            source: e,
        })?;
        let path = cache_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }

    /// Returns `true` if this manifest was produced by a compatible version.
    pub fn is_compatible(&self, current_version: &str) -> bool {
        self.tsbuild_version == current_version
    }

    /// Returns the stored signature of `file` for `target`, if any.
    pub fn signature(&self, target: &str, file: &Path) -> Option<ContentHash> {
        self.targets.get(target)?.files.get(file).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_manifest_is_empty() {
        let m = CacheManifest::new("0.1.0");
        assert_eq!(m.tsbuild_version, "0.1.0");
        assert!(m.targets.is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = CacheManifest::new("0.1.0");
        let hash = ContentHash::from_bytes(b"export {}");
        m.targets
            .entry("dev".to_string())
            .or_default()
            .files
            .insert(PathBuf::from("src/app.ts"), hash);
        m.save(dir.path()).unwrap();

        let loaded = CacheManifest::load(dir.path()).unwrap();
        assert_eq!(loaded.tsbuild_version, "0.1.0");
        assert_eq!(loaded.signature("dev", Path::new("src/app.ts")), Some(hash));
        assert_eq!(loaded.signature("release", Path::new("src/app.ts")), None);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CacheManifest::load(dir.path()).is_none());
    }

    #[test]
    fn load_corrupt_json_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.json"), "{ not json").unwrap();
        assert!(CacheManifest::load(dir.path()).is_none());
    }

    #[test]
    fn compatibility_is_exact_version_match() {
        let m = CacheManifest::new("0.1.0");
        assert!(m.is_compatible("0.1.0"));
        assert!(!m.is_compatible("0.2.0"));
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeply").join("nested").join(".tscache");
        CacheManifest::new("0.1.0").save(&nested).unwrap();
        assert!(nested.join("manifest.json").exists());
    }
}
