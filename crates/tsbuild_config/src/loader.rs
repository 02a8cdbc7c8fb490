//! Configuration file loading.
//!
//! `tsbuild.toml` has a task-level `[ts]` section and one `[targets.<name>]`
//! section per target. Each may carry a nested `options` table. Target
//! sections additionally carry their file groups, either inline (`src`,
//! `dest`, `out`, `outDir`, `baseDir`) or as a `files` array.

use std::collections::BTreeMap;
use std::path::Path;

use toml::{Table, Value};

use crate::error::ConfigError;
use crate::types::{FileGroup, ProjectConfig, RawConfig, TargetSection};

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "tsbuild.toml";

const TASK_SECTION: &str = "ts";
const TARGETS_SECTION: &str = "targets";
const OPTIONS_KEY: &str = "options";
const FILES_KEY: &str = "files";
const FILE_GROUP_KEYS: [&str; 5] = ["src", "dest", "out", "outDir", "baseDir"];

/// Loads a `tsbuild.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses a `tsbuild.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let mut doc: Table =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let task = match doc.remove(TASK_SECTION) {
        Some(Value::Table(table)) => split_options(table, TASK_SECTION)?,
        Some(_) => {
            return Err(ConfigError::ValidationError(format!(
                "[{TASK_SECTION}] must be a table"
            )))
        }
        None => RawConfig::default(),
    };

    let mut targets = BTreeMap::new();
    match doc.remove(TARGETS_SECTION) {
        Some(Value::Table(sections)) => {
            for (name, section) in sections {
                let Value::Table(section) = section else {
                    return Err(ConfigError::ValidationError(format!(
                        "[{TARGETS_SECTION}.{name}] must be a table"
                    )));
                };
                let parsed = parse_target(&name, section)?;
                targets.insert(name, parsed);
            }
        }
        Some(_) => {
            return Err(ConfigError::ValidationError(format!(
                "[{TARGETS_SECTION}] must be a table"
            )))
        }
        None => {}
    }

    Ok(ProjectConfig { task, targets })
}

/// Parses a single configuration level (top-level keys plus an optional
/// `[options]` table) from a TOML string.
pub fn parse_raw_config(content: &str) -> Result<RawConfig, ConfigError> {
    let table: Table =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    split_options(table, "config")
}

fn parse_target(name: &str, mut section: Table) -> Result<TargetSection, ConfigError> {
    let mut files = Vec::new();

    let mut inline = Table::new();
    for key in FILE_GROUP_KEYS {
        if let Some(value) = section.remove(key) {
            inline.insert(key.to_string(), value);
        }
    }
    if !inline.is_empty() {
        files.push(parse_file_group(name, Value::Table(inline))?);
    }

    match section.remove(FILES_KEY) {
        Some(Value::Array(groups)) => {
            for group in groups {
                files.push(parse_file_group(name, group)?);
            }
        }
        Some(_) => {
            return Err(ConfigError::ValidationError(format!(
                "{TARGETS_SECTION}.{name}.{FILES_KEY} must be an array of tables"
            )))
        }
        None => {}
    }

    if files.is_empty() || files.iter().any(|group| group.src.is_empty()) {
        return Err(ConfigError::MissingField(format!(
            "{TARGETS_SECTION}.{name}.src"
        )));
    }

    let config = split_options(section, &format!("{TARGETS_SECTION}.{name}"))?;
    Ok(TargetSection { config, files })
}

fn parse_file_group(name: &str, value: Value) -> Result<FileGroup, ConfigError> {
    value.try_into().map_err(|e: toml::de::Error| {
        ConfigError::ValidationError(format!(
            "invalid file group in {TARGETS_SECTION}.{name}: {}",
            e.message()
        ))
    })
}

fn split_options(mut table: Table, section: &str) -> Result<RawConfig, ConfigError> {
    let options = match table.remove(OPTIONS_KEY) {
        Some(Value::Table(options)) => options,
        Some(_) => {
            return Err(ConfigError::ValidationError(format!(
                "{section}.{OPTIONS_KEY} must be a table"
            )))
        }
        None => Table::new(),
    };
    Ok(RawConfig {
        properties: table,
        options,
    })
}
