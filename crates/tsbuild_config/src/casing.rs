//! Detection of miscased and misplaced configuration properties.
//!
//! A key that differs from a recognized property only by case is renamed to
//! its canonical spelling and reported. An options property written at the
//! top level is reported but left alone, so its value is ignored by the merge.
//! The caller's configuration is never modified: fixes are applied to a copy.

use crate::property::{DirectProperty, OptionProperty};
use crate::types::RawConfig;

/// Label used in diagnostics for the task-level configuration.
pub const TASK_LABEL: &str = "ts task";

/// Returns the label used in diagnostics for a target configuration.
pub fn target_label(target_name: &str) -> String {
    format!("target \"{target_name}\"")
}

/// A configuration with casing fixed, and the warnings describing each fix.
#[derive(Debug, Clone, PartialEq)]
pub struct CasingFix {
    /// The corrected copy.
    pub config: RawConfig,
    /// One warning per renamed key.
    pub warnings: Vec<String>,
}

/// Renames keys that match a recognized property case-insensitively.
///
/// Top-level keys are matched against direct properties and keys inside
/// `options` against options properties. A key that is an exact name in
/// either allow-list is never renamed.
pub fn fix_casing(config: &RawConfig, label: &str) -> CasingFix {
    let mut fixed = config.clone();
    let mut warnings = Vec::new();

    for key in config.properties.keys() {
        if is_exact_name(key) {
            continue;
        }
        if let Some(prop) = DirectProperty::from_name_ignore_case(key) {
            warnings.push(format!(
                "Property \"{key}\" in {label} is incorrectly cased; it should be \"{prop}\".  \
                 Fixing it for you and proceeding."
            ));
            if let Some(value) = fixed.properties.remove(key) {
                fixed.properties.insert(prop.name().to_string(), value);
            }
        }
    }

    for key in config.options.keys() {
        if is_exact_name(key) {
            continue;
        }
        if let Some(prop) = OptionProperty::from_name_ignore_case(key) {
            warnings.push(format!(
                "Property \"{key}\" in {label} options is incorrectly cased; it should be \
                 \"{prop}\".  Fixing it for you and proceeding."
            ));
            if let Some(value) = fixed.options.remove(key) {
                fixed.options.insert(prop.name().to_string(), value);
            }
        }
    }

    CasingFix {
        config: fixed,
        warnings,
    }
}

/// Reports options properties written at the top level instead of under `options`.
pub fn check_locations(config: &RawConfig, label: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    for key in config.properties.keys() {
        if DirectProperty::from_name(key).is_some() {
            continue;
        }
        if OptionProperty::from_name(key).is_some() {
            warnings.push(format!(
                "Property \"{key}\" in {label} is possibly in the wrong place and will be \
                 ignored.  It is expected on the options object."
            ));
        } else if DirectProperty::from_name_ignore_case(key).is_none() {
            if let Some(prop) = OptionProperty::from_name_ignore_case(key) {
                warnings.push(format!(
                    "Property \"{key}\" in {label} is possibly in the wrong place and will be \
                     ignored.  It is expected on the options object.  It is also the wrong \
                     case and should be {prop}."
                ));
            }
        }
    }
    warnings
}

/// Corrected task and target configurations plus all scan warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Corrected task-level configuration.
    pub task: RawConfig,
    /// Corrected target-level configuration.
    pub target: RawConfig,
    /// Casing warnings followed by placement warnings.
    pub warnings: Vec<String>,
}

/// Runs the casing fix on both levels, then the placement check on both
/// corrected levels.
pub fn scan(task: &RawConfig, target: &RawConfig, target_name: &str) -> ScanResult {
    let target_label = target_label(target_name);
    let task_fix = fix_casing(task, TASK_LABEL);
    let target_fix = fix_casing(target, &target_label);

    let mut warnings = task_fix.warnings;
    warnings.extend(target_fix.warnings);
    warnings.extend(check_locations(&task_fix.config, TASK_LABEL));
    warnings.extend(check_locations(&target_fix.config, &target_label));

    ScanResult {
        task: task_fix.config,
        target: target_fix.config,
        warnings,
    }
}

fn is_exact_name(key: &str) -> bool {
    DirectProperty::from_name(key).is_some() || OptionProperty::from_name(key).is_some()
}
