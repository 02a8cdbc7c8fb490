//! Shared pipeline helpers for CLI commands.
//!
//! Contains the utilities used by `build`, `watch`, and `resolve`: project
//! root resolution, tracing setup, source pattern expansion, and driver
//! construction.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tsbuild_cache::ChangeCache;
use tsbuild_common::unquote_path;
use tsbuild_compile::{compiler_version, locate_compiler, CompilerCommand, Driver, ProcessRunner};
use tsbuild_config::{load_config, ProjectConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Directory under the project root holding the change cache.
pub const CACHE_DIR: &str = ".tscache";

/// Version recorded in the cache manifest.
pub const TSBUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The driver used by the CLI.
pub type ProjectDriver = Driver<ProcessRunner, ChangeCache>;

/// Walks up from `start` looking for the nearest directory containing `tsbuild.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `tsbuild.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Finds the project root, makes it the current directory, and loads its
/// configuration.
///
/// Source paths in `tsbuild.toml` are relative to the project root, and so
/// are the change cache's keys.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let root = std::path::absolute(&root)?;
    std::env::set_current_dir(&root)?;
    let config = load_config(&root)?;
    Ok((root, config))
}

/// Picks the targets to process: the requested ones, or all of them.
pub fn select_targets(
    config: &ProjectConfig,
    requested: &[String],
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if requested.is_empty() {
        if config.targets.is_empty() {
            return Err(format!("no targets defined in {CONFIG_FILE}").into());
        }
        return Ok(config.targets.keys().cloned().collect());
    }
    for name in requested {
        if !config.targets.contains_key(name) {
            return Err(tsbuild_config::ConfigError::UnknownTarget(name.clone()).into());
        }
    }
    Ok(requested.to_vec())
}

/// Builds the single-threaded runtime commands run on.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level follows the global flags.
/// Compiler command lines and fast-compile decisions are logged at info level
/// by `tsbuild_compile`, so that crate stays visible by default.
pub fn init_tracing(global: &GlobalArgs) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn,tsbuild_compile=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a second installation (e.g. from tests) is not an error
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}

/// Creates the driver for a project: the project's TypeScript compiler run
/// through `node`, and the change cache under [`CACHE_DIR`].
pub fn create_driver(
    root: &Path,
    global: &GlobalArgs,
) -> Result<ProjectDriver, Box<dyn std::error::Error>> {
    let tsc = locate_compiler(root).ok_or_else(|| {
        format!(
            "could not find node_modules/typescript/bin/tsc in {} or any parent directory",
            root.display()
        )
    })?;
    if !global.quiet {
        match compiler_version(&tsc) {
            Some(version) => eprintln!("Using tsc v{version}"),
            None => eprintln!("Using tsc at {}", tsc.display()),
        }
    }

    let cache = ChangeCache::load_or_create(&root.join(CACHE_DIR), TSBUILD_VERSION);
    Ok(Driver::new(
        ProcessRunner,
        cache,
        CompilerCommand::node(tsc),
        root.to_path_buf(),
    ))
}

/// Expands source patterns relative to `root`.
///
/// Supported forms are literal paths, `dir/*.ext`, and `dir/**/*.ext`. Each
/// pattern's matches are sorted; the result keeps the first occurrence of
/// every path. Returned paths are relative to `root` when the pattern was.
pub fn expand_sources(
    root: &Path,
    patterns: &[String],
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut seen = BTreeSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = unquote_path(pattern);
        let matches = if pattern.contains('*') {
            expand_pattern(root, pattern)?
        } else {
            vec![pattern.to_string()]
        };
        for file in matches {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

fn expand_pattern(root: &Path, pattern: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let normalized = pattern.replace('\\', "/");
    let (dir, file_pattern) = match normalized.rsplit_once('/') {
        Some((dir, file_pattern)) => (dir, file_pattern),
        None => ("", normalized.as_str()),
    };
    let (dir, recursive) = match dir.strip_suffix("**") {
        Some(parent) => (parent.trim_end_matches('/'), true),
        None => (dir, false),
    };
    let extension = file_pattern
        .strip_prefix("*.")
        .filter(|ext| !ext.is_empty() && !ext.contains('*'));
    let Some(extension) = extension.filter(|_| !dir.contains('*')) else {
        return Err(format!(
            "unsupported source pattern '{pattern}': expected a path, dir/*.ext, or dir/**/*.ext"
        )
        .into());
    };

    let base = root.join(dir);
    let mut found = Vec::new();
    if base.is_dir() {
        collect_files(&base, extension, recursive, &mut found)?;
    }
    found.sort();

    Ok(found
        .into_iter()
        .map(|path| {
            let shown = path.strip_prefix(root).unwrap_or(&path);
            shown.to_string_lossy().replace('\\', "/")
        })
        .collect())
}

/// Collects files with `extension` below `dir`.
pub fn collect_files(
    dir: &Path,
    extension: &str,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, extension, recursive, files)?;
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    Ok(())
}
