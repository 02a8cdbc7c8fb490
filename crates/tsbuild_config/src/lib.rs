//! Loading and resolution of `tsbuild.toml` build configuration.
//!
//! This crate reads the project configuration file and merges task-level and
//! target-level settings into one validated [`ResolvedOptions`] record per
//! target, complete with casing fixes, conflict rules, defaults, and the
//! compilation tasks derived from each target's file groups.

#![warn(missing_docs)]

pub mod casing;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod property;
pub mod resolve;
pub mod types;

pub use casing::{
    check_locations, fix_casing, scan, target_label, CasingFix, ScanResult, TASK_LABEL,
};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, parse_raw_config, CONFIG_FILE};
pub use property::{DirectProperty, OptionProperty};
pub use resolve::{resolve_options, resolve_target};
pub use types::*;
