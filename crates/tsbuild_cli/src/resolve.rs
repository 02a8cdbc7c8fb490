//! The `tsbuild resolve` command: print resolved options as JSON.

use std::collections::BTreeMap;

use tsbuild_config::{resolve_target, ProjectConfig, ResolvedOptions};

use crate::pipeline::{load_project, select_targets};
use crate::{GlobalArgs, ResolveArgs};

/// Runs the `resolve` command.
///
/// Prints one JSON object keyed by target name. Returns exit code 1 if any
/// target has configuration errors.
pub fn run(args: &ResolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_root, config) = load_project(global)?;
    let targets = select_targets(&config, &args.targets)?;
    let resolved = resolve_all(&config, &targets)?;

    println!("{}", serde_json::to_string_pretty(&resolved)?);

    let failed = resolved.values().any(ResolvedOptions::has_errors);
    Ok(if failed { 1 } else { 0 })
}

fn resolve_all(
    config: &ProjectConfig,
    targets: &[String],
) -> Result<BTreeMap<String, ResolvedOptions>, Box<dyn std::error::Error>> {
    let mut resolved = BTreeMap::new();
    for name in targets {
        resolved.insert(name.clone(), resolve_target(config, name)?);
    }
    Ok(resolved)
}
