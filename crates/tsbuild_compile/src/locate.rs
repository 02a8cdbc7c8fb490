//! Discovery of the project's TypeScript compiler.

use std::path::{Path, PathBuf};

/// Location of the compiler script below a package root.
const TSC_SCRIPT: [&str; 4] = ["node_modules", "typescript", "bin", "tsc"];

/// Walks up from `start` looking for `node_modules/typescript/bin/tsc`.
pub fn locate_compiler(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let candidate = TSC_SCRIPT.iter().fold(dir.to_path_buf(), |path, part| path.join(part));
        candidate.is_file().then_some(candidate)
    })
}

/// Reads the TypeScript version from the `package.json` next to the
/// compiler's `bin` directory.
pub fn compiler_version(tsc: &Path) -> Option<String> {
    let package_json = tsc.parent()?.parent()?.join("package.json");
    let content = std::fs::read_to_string(package_json).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&content).ok()?;
    manifest.get("version")?.as_str().map(str::to_string)
}
