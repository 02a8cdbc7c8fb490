//! High-level change cache used by fast compilation.
//!
//! [`ChangeCache`] ties the manifest and the source hasher together behind the
//! [`ChangeTracker`] interface the compilation driver consumes. Callers must
//! serialize compiles per target; the cache is not guarded against concurrent
//! mutation of one target's entry.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CacheError;
use crate::hasher::SourceHasher;
use crate::manifest::CacheManifest;

/// Decides which files of a target are stale and remembers successful compiles.
pub trait ChangeTracker {
    /// Returns the subsequence of `files` that changed since the last recorded
    /// success for `target`. A file with no stored signature is always changed.
    ///
    /// Relative entries are read from `working_dir`.
    fn changed_files(&self, files: &[String], working_dir: &Path, target: &str) -> Vec<String>;

    /// Records `files`, relative to `working_dir`, as successfully compiled
    /// for `target`.
    fn record_success(
        &mut self,
        files: &[String],
        working_dir: &Path,
        target: &str,
    ) -> Result<(), CacheError>;
}

/// Change tracker persisted as `manifest.json` in a cache directory.
pub struct ChangeCache {
    /// Root directory for cache files.
    cache_dir: PathBuf,

    /// Per-target signatures.
    manifest: CacheManifest,
}

impl ChangeCache {
    /// Loads an existing cache or creates a fresh one.
    ///
    /// Any problem with the existing manifest, including a version mismatch,
    /// results in starting fresh.
    pub fn load_or_create(cache_dir: &Path, tsbuild_version: &str) -> Self {
        let manifest = CacheManifest::load(cache_dir)
            .filter(|m| m.is_compatible(tsbuild_version))
            .unwrap_or_else(|| CacheManifest::new(tsbuild_version));

        Self {
            cache_dir: cache_dir.to_path_buf(),
            manifest,
        }
    }

    /// Persists the current manifest to disk.
    pub fn save(&self) -> Result<(), CacheError> {
        self.manifest.save(&self.cache_dir)
    }

    /// Returns a reference to the current manifest.
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }
}

impl ChangeTracker for ChangeCache {
    fn changed_files(&self, files: &[String], working_dir: &Path, target: &str) -> Vec<String> {
        files
            .iter()
            .filter(|file| {
                let key = SourceHasher::key_for(file);
                match (
                    self.manifest.signature(target, &key),
                    SourceHasher::hash_file(&working_dir.join(&key)),
                ) {
                    (Some(stored), Ok(current)) => stored != current,
                    _ => true,
                }
            })
            .cloned()
            .collect()
    }

    fn record_success(
        &mut self,
        files: &[String],
        working_dir: &Path,
        target: &str,
    ) -> Result<(), CacheError> {
        let entry = self.manifest.targets.entry(target.to_string()).or_default();
        for file in files {
            let key = SourceHasher::key_for(file);
            match SourceHasher::hash_file(&working_dir.join(&key)) {
                Ok(hash) => {
                    entry.files.insert(key, hash);
                }
                Err(e) => debug!(target_name = target, "not recording {file}: {e}"),
            }
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[test]
    fn fresh_cache_reports_everything_changed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChangeCache::load_or_create(&dir.path().join(".tscache"), "0.1.0");
        let a = write(dir.path(), "a.ts", "export const a = 1;");
        let b = write(dir.path(), "b.ts", "export const b = 1;");

        let changed = cache.changed_files(&[a.clone(), b.clone()], dir.path(), "dev");
        assert_eq!(changed, vec![a, b]);
    }

    #[test]
    fn recorded_files_are_unchanged_until_edited() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ChangeCache::load_or_create(&dir.path().join(".tscache"), "0.1.0");
        let a = write(dir.path(), "a.ts", "export const a = 1;");
        let b = write(dir.path(), "b.ts", "export const b = 1;");
        let files = vec![a.clone(), b.clone()];

        cache.record_success(&files, dir.path(), "dev").unwrap();
        assert!(cache.changed_files(&files, dir.path(), "dev").is_empty());

        write(dir.path(), "b.ts", "export const b = 2;");
        assert_eq!(cache.changed_files(&files, dir.path(), "dev"), vec![b]);
    }

    #[test]
    fn targets_are_tracked_independently() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ChangeCache::load_or_create(&dir.path().join(".tscache"), "0.1.0");
        let a = write(dir.path(), "a.ts", "export const a = 1;");
        let files = vec![a];

        cache.record_success(&files, dir.path(), "dev").unwrap();
        assert!(cache.changed_files(&files, dir.path(), "dev").is_empty());
        assert_eq!(cache.changed_files(&files, dir.path(), "release"), files);
    }

    #[test]
    fn relative_entries_are_read_from_the_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        write(&dir.path().join("src"), "a.ts", "export const a = 1;");
        let files = vec!["src/a.ts".to_string()];

        let mut cache = ChangeCache::load_or_create(&dir.path().join(".tscache"), "0.1.0");
        cache.record_success(&files, dir.path(), "dev").unwrap();
        assert!(cache.changed_files(&files, dir.path(), "dev").is_empty());
        // keys stay relative
        assert!(cache.manifest().targets["dev"]
            .files
            .contains_key(Path::new("src/a.ts")));

        write(&dir.path().join("src"), "a.ts", "export const a = 2;");
        assert_eq!(cache.changed_files(&files, dir.path(), "dev"), files);
    }

    #[test]
    fn quoted_and_bare_paths_share_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("my src");
        std::fs::create_dir_all(&src).unwrap();
        let bare = write(&src, "app.ts", "export {};");
        let quoted = format!("\"{bare}\"");

        let mut cache = ChangeCache::load_or_create(&dir.path().join(".tscache"), "0.1.0");
        cache.record_success(&[quoted], dir.path(), "dev").unwrap();
        assert!(cache.changed_files(&[bare], dir.path(), "dev").is_empty());
    }

    #[test]
    fn missing_file_counts_as_changed_and_is_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ChangeCache::load_or_create(&dir.path().join(".tscache"), "0.1.0");
        let ghost = dir.path().join("ghost.ts").display().to_string();

        cache.record_success(&[ghost.clone()], dir.path(), "dev").unwrap();
        assert_eq!(cache.changed_files(&[ghost.clone()], dir.path(), "dev"), vec![ghost]);
        assert!(cache.manifest().targets["dev"].files.is_empty());
    }

    #[test]
    fn signatures_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join(".tscache");
        let a = write(dir.path(), "a.ts", "export const a = 1;");

        {
            let mut cache = ChangeCache::load_or_create(&cache_dir, "0.1.0");
            cache.record_success(&[a.clone()], dir.path(), "dev").unwrap();
        }

        let cache = ChangeCache::load_or_create(&cache_dir, "0.1.0");
        assert!(cache.changed_files(&[a.clone()], dir.path(), "dev").is_empty());

        let upgraded = ChangeCache::load_or_create(&cache_dir, "0.2.0");
        assert_eq!(upgraded.changed_files(&[a.clone()], dir.path(), "dev"), vec![a]);
    }
}
