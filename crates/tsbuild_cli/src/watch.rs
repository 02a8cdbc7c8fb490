//! The `tsbuild watch` command: build a target, then rebuild it whenever a
//! TypeScript file under its `watch` directory changes.
//!
//! Changes are found by polling modification times. Rebuilds are awaited
//! before polling resumes, so a target never compiles twice at once.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tsbuild_cache::ChangeTracker;
use tsbuild_common::end_with_slash;
use tsbuild_compile::{CompilerRunner, Driver};
use tsbuild_config::{resolve_target, ProjectConfig};

use crate::build::build_resolved;
use crate::pipeline::{collect_files, create_driver, load_project, runtime, select_targets};
use crate::{GlobalArgs, WatchArgs};

/// Modification times of the watched files.
pub type Snapshot = BTreeMap<PathBuf, SystemTime>;

/// What happened to a watched file between two polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The file appeared.
    Added,
    /// The file's modification time changed.
    Changed,
    /// The file disappeared.
    Deleted,
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileEvent::Added => "added",
            FileEvent::Changed => "changed",
            FileEvent::Deleted => "deleted",
        })
    }
}

/// Runs the `watch` command. Returns when interrupted with Ctrl-C.
pub fn run(args: &WatchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    select_targets(&config, std::slice::from_ref(&args.target))?;
    let driver = create_driver(&root, global)?.watching(true);
    let interval = Duration::from_millis(args.interval);
    runtime()?.block_on(watch_target(driver, &config, &args.target, interval, global.quiet))
}

async fn watch_target<R, T>(
    mut driver: Driver<R, T>,
    config: &ProjectConfig,
    target_name: &str,
    interval: Duration,
    quiet: bool,
) -> Result<i32, Box<dyn std::error::Error>>
where
    R: CompilerRunner,
    T: ChangeTracker,
{
    let options = resolve_target(config, target_name)?;
    let watch = options
        .watch
        .as_deref()
        .ok_or_else(|| format!("target \"{target_name}\" has no watch directory"))?;
    let watch_dir = driver.working_dir().join(end_with_slash(watch));

    if !build_resolved(&mut driver, &options, quiet).await? {
        eprintln!("error: [{target_name}] initial build failed");
    }

    eprintln!("Watching all files: {}**/*.ts", end_with_slash(watch));
    let mut previous = snapshot(&watch_dir)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(0),
            _ = tokio::time::sleep(interval) => {}
        }

        let current = snapshot(&watch_dir)?;
        let events = diff(&previous, &current);
        previous = current;
        if events.is_empty() {
            continue;
        }

        for (path, event) in &events {
            eprintln!("    >>{} was {event}", path.display());
        }
        eprintln!("Compiling.");
        if let Err(e) = build_resolved(&mut driver, &options, quiet).await {
            eprintln!("error: [{target_name}] {e}");
        }
    }
}

/// Records the modification time of every `.ts` file below `dir`.
pub fn snapshot(dir: &Path) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    if dir.is_dir() {
        collect_files(dir, "ts", true, &mut files)?;
    }
    let mut snapshot = Snapshot::new();
    for file in files {
        // a file deleted mid-scan simply drops out
        if let Ok(modified) = std::fs::metadata(&file).and_then(|m| m.modified()) {
            snapshot.insert(file, modified);
        }
    }
    Ok(snapshot)
}

/// Lists the differences between two snapshots, ordered by path.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<(PathBuf, FileEvent)> {
    let mut events = BTreeMap::new();
    for (path, modified) in current {
        match previous.get(path) {
            None => {
                events.insert(path.clone(), FileEvent::Added);
            }
            Some(before) if before != modified => {
                events.insert(path.clone(), FileEvent::Changed);
            }
            Some(_) => {}
        }
    }
    for path in previous.keys() {
        if !current.contains_key(path) {
            events.insert(path.clone(), FileEvent::Deleted);
        }
    }
    events.into_iter().collect()
}
