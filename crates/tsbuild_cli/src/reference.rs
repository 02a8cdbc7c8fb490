//! Reference file generation.
//!
//! A target's `reference` property names a directory. Before compiling, a
//! `reference.ts` is written there with one triple-slash reference per source
//! file, so editors see the whole project.

use std::path::{Component, Path, PathBuf};

use tsbuild_common::end_with_slash;

/// Name of the generated reference file.
pub const REFERENCE_FILE: &str = "reference.ts";

/// Writes `<reference>/reference.ts` listing `files`.
///
/// `reference` and `files` are relative to `root`. Returns the path written.
pub fn write_reference_file(
    root: &Path,
    reference: &str,
    files: &[String],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let reference_dir = PathBuf::from(end_with_slash(reference));
    let contents = reference_lines(&reference_dir, files).join("\n");

    let dir = root.join(&reference_dir);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(REFERENCE_FILE);
    // unchanged content is not rewritten, so watch mode does not see it as an edit
    if std::fs::read_to_string(&path).ok().as_deref() != Some(contents.as_str()) {
        std::fs::write(&path, contents)?;
    }
    Ok(path)
}

/// Builds the reference lines for `files`, skipping reference files.
fn reference_lines(reference_dir: &Path, files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter(|file| !file.contains(REFERENCE_FILE))
        .map(|file| {
            let relative = relative_path(reference_dir, Path::new(file));
            let relative = relative.to_string_lossy().replace('\\', "/");
            format!("/// <reference path=\"{relative}\" />")
        })
        .collect()
}

/// Lexical relative path from directory `from` to `to`.
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn relative_paths() {
        assert_eq!(
            relative_path(Path::new("src/"), Path::new("src/app.ts")),
            PathBuf::from("app.ts")
        );
        assert_eq!(
            relative_path(Path::new("./src/refs"), Path::new("lib/util.ts")),
            PathBuf::from("../../lib/util.ts")
        );
    }

    #[test]
    fn writes_reference_file() {
        let tmp = TempDir::new().unwrap();
        let files = vec![
            "src/app.ts".to_string(),
            "src/reference.ts".to_string(),
            "lib/util.ts".to_string(),
        ];

        let path = write_reference_file(tmp.path(), "src", &files).unwrap();
        assert_eq!(path, tmp.path().join("src").join(REFERENCE_FILE));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "/// <reference path=\"app.ts\" />\n/// <reference path=\"../lib/util.ts\" />"
        );
    }

    #[test]
    fn unchanged_reference_file_is_not_rewritten() {
        let tmp = TempDir::new().unwrap();
        let files = vec!["src/app.ts".to_string()];
        let path = write_reference_file(tmp.path(), "src", &files).unwrap();
        let before = std::fs::metadata(&path).unwrap().modified().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        write_reference_file(tmp.path(), "src", &files).unwrap();
        let after = std::fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }
}
