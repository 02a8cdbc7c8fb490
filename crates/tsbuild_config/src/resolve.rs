//! Options resolution: merging task and target configuration into one
//! validated [`ResolvedOptions`] record per target.
//!
//! Resolution runs as a fixed sequence of steps, each of which may overwrite
//! the outcome of an earlier one:
//!
//! 1. casing and placement scan (see [`crate::casing`]),
//! 2. merge of direct properties, then options properties, task before target,
//! 3. compilation task construction from the file groups,
//! 4. implied options and conflict rules,
//! 5. defaults for everything still unset.
//!
//! Resolution never fails. Every problem is recorded as a warning or an error
//! on the returned record.

use toml::Value;
use tracing::debug;
use tsbuild_common::{escape_path_if_required, is_javascript_file};

use crate::casing::{self, target_label, TASK_LABEL};
use crate::defaults;
use crate::error::ConfigError;
use crate::property::{DirectProperty, OptionProperty};
use crate::types::{
    CompilationTask, Destination, FastMode, FileGroup, ProjectConfig, RawConfig, ResolvedOptions,
};

/// Resolves a named target of a loaded project configuration.
pub fn resolve_target(
    config: &ProjectConfig,
    target_name: &str,
) -> Result<ResolvedOptions, ConfigError> {
    let section = config
        .targets
        .get(target_name)
        .ok_or_else(|| ConfigError::UnknownTarget(target_name.to_string()))?;
    Ok(resolve_options(
        &config.task,
        &section.config,
        target_name,
        &section.files,
    ))
}

/// Merges task-level and target-level configuration into resolved options.
///
/// The inputs are not modified; casing fixes are applied to internal copies.
/// Use [`casing::scan`] to obtain the corrected copies themselves.
pub fn resolve_options(
    task: &RawConfig,
    target: &RawConfig,
    target_name: &str,
    files: &[FileGroup],
) -> ResolvedOptions {
    let scanned = casing::scan(task, target, target_name);
    let target_label = target_label(target_name);

    let mut diagnostics = Diagnostics {
        warnings: scanned.warnings,
        errors: Vec::new(),
    };

    let mut merged = MergedOptions::default();
    merged.apply_direct(&scanned.task, TASK_LABEL, &mut diagnostics);
    merged.apply_direct(&scanned.target, &target_label, &mut diagnostics);
    merged.apply_options(&scanned.task, TASK_LABEL, &mut diagnostics);
    merged.apply_options(&scanned.target, &target_label, &mut diagnostics);

    let tasks = build_compilation_tasks(files, target_name, &mut diagnostics);
    merged.resolve_conflicts(&mut diagnostics);

    debug!(
        target_name,
        tasks = tasks.len(),
        warnings = diagnostics.warnings.len(),
        errors = diagnostics.errors.len(),
        "resolved options"
    );

    merged.into_resolved(target_name, tasks, diagnostics)
}

struct Diagnostics {
    warnings: Vec<String>,
    errors: Vec<String>,
}

/// Typed reader for raw property values. A value of the wrong type is
/// recorded as an error and read as unset.
struct ValueReader<'a> {
    label: &'a str,
    bag: &'static str,
    errors: &'a mut Vec<String>,
}

impl ValueReader<'_> {
    fn bool(&mut self, name: &str, value: &Value) -> Option<bool> {
        match value {
            Value::Boolean(b) => Some(*b),
            other => self.mismatch(name, "a boolean", other),
        }
    }

    fn string(&mut self, name: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => self.mismatch(name, "a string", other),
        }
    }

    fn string_list(&mut self, name: &str, value: &Value) -> Option<Vec<String>> {
        match value {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                match strings {
                    Some(strings) => Some(strings),
                    None => self.mismatch(name, "a string or a list of strings", value),
                }
            }
            other => self.mismatch(name, "a string or a list of strings", other),
        }
    }

    fn fast(&mut self, name: &str, value: &Value) -> Option<FastMode> {
        const EXPECTED: &str = "a boolean or one of \"never\", \"watch\", \"always\"";
        match value {
            Value::Boolean(true) => Some(FastMode::Always),
            Value::Boolean(false) => Some(FastMode::Never),
            Value::String(s) => match FastMode::parse(s) {
                Some(mode) => Some(mode),
                None => self.mismatch(name, EXPECTED, value),
            },
            other => self.mismatch(name, EXPECTED, other),
        }
    }

    fn mismatch<T>(&mut self, name: &str, expected: &str, found: &Value) -> Option<T> {
        let found = match found {
            Value::String(s) => format!("\"{s}\""),
            other => other.type_str().to_string(),
        };
        self.errors.push(format!(
            "Property \"{name}\" in {}{} should be {expected}, not {found}.",
            self.label, self.bag
        ));
        None
    }
}

/// Overwrites `slot` only when a value was read.
fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Merged configuration before defaults. `None` means the user never set it.
#[derive(Debug, Default)]
struct MergedOptions {
    html: Option<Vec<String>>,
    html_out_dir: Option<String>,
    html_out_dir_flatten: Option<bool>,
    reference: Option<String>,
    test_execute: Option<String>,
    tsconfig: Option<Value>,
    template_cache: Option<Value>,
    vs: Option<Value>,
    watch: Option<String>,

    additional_flags: Option<String>,
    comments: Option<bool>,
    compile: Option<bool>,
    compiler: Option<String>,
    declaration: Option<bool>,
    emit_decorator_metadata: Option<bool>,
    experimental_decorators: Option<bool>,
    fail_on_type_errors: Option<bool>,
    fast: Option<FastMode>,
    html_module_template: Option<String>,
    html_var_template: Option<String>,
    inline_source_map: Option<bool>,
    inline_sources: Option<bool>,
    isolated_modules: Option<bool>,
    map_root: Option<String>,
    module: Option<String>,
    new_line: Option<String>,
    no_emit: Option<bool>,
    no_emit_helpers: Option<bool>,
    no_implicit_any: Option<bool>,
    no_resolve: Option<bool>,
    preserve_const_enums: Option<bool>,
    remove_comments: Option<bool>,
    source_root: Option<String>,
    source_map: Option<bool>,
    suppress_implicit_any_index_errors: Option<bool>,
    target: Option<String>,
    verbose: Option<bool>,
}

impl MergedOptions {
    fn apply_direct(&mut self, config: &RawConfig, label: &str, diagnostics: &mut Diagnostics) {
        let mut reader = ValueReader {
            label,
            bag: "",
            errors: &mut diagnostics.errors,
        };
        for prop in DirectProperty::ALL {
            if let Some(value) = config.properties.get(prop.name()) {
                self.set_direct(prop, value, &mut reader);
            }
        }
    }

    fn apply_options(&mut self, config: &RawConfig, label: &str, diagnostics: &mut Diagnostics) {
        let mut reader = ValueReader {
            label,
            bag: " options",
            errors: &mut diagnostics.errors,
        };
        for prop in OptionProperty::ALL {
            if let Some(value) = config.options.get(prop.name()) {
                self.set_option(prop, value, &mut reader);
            }
        }
    }

    fn set_direct(&mut self, prop: DirectProperty, value: &Value, r: &mut ValueReader<'_>) {
        let name = prop.name();
        match prop {
            DirectProperty::Html => set(&mut self.html, r.string_list(name, value)),
            DirectProperty::HtmlOutDir => set(&mut self.html_out_dir, r.string(name, value)),
            DirectProperty::HtmlOutDirFlatten => {
                set(&mut self.html_out_dir_flatten, r.bool(name, value))
            }
            DirectProperty::Reference => set(&mut self.reference, r.string(name, value)),
            DirectProperty::TestExecute => set(&mut self.test_execute, r.string(name, value)),
            DirectProperty::Tsconfig => self.tsconfig = Some(value.clone()),
            DirectProperty::TemplateCache => self.template_cache = Some(value.clone()),
            DirectProperty::Vs => self.vs = Some(value.clone()),
            DirectProperty::Watch => set(&mut self.watch, r.string(name, value)),
        }
    }

    fn set_option(&mut self, prop: OptionProperty, value: &Value, r: &mut ValueReader<'_>) {
        let name = prop.name();
        match prop {
            OptionProperty::AdditionalFlags => set(&mut self.additional_flags, r.string(name, value)),
            OptionProperty::Comments => set(&mut self.comments, r.bool(name, value)),
            OptionProperty::Compile => set(&mut self.compile, r.bool(name, value)),
            OptionProperty::Compiler => set(&mut self.compiler, r.string(name, value)),
            OptionProperty::Declaration => set(&mut self.declaration, r.bool(name, value)),
            OptionProperty::EmitDecoratorMetadata => {
                set(&mut self.emit_decorator_metadata, r.bool(name, value))
            }
            OptionProperty::ExperimentalDecorators => {
                set(&mut self.experimental_decorators, r.bool(name, value))
            }
            OptionProperty::FailOnTypeErrors => {
                set(&mut self.fail_on_type_errors, r.bool(name, value))
            }
            OptionProperty::Fast => set(&mut self.fast, r.fast(name, value)),
            OptionProperty::HtmlModuleTemplate => {
                set(&mut self.html_module_template, r.string(name, value))
            }
            OptionProperty::HtmlVarTemplate => {
                set(&mut self.html_var_template, r.string(name, value))
            }
            OptionProperty::InlineSourceMap => set(&mut self.inline_source_map, r.bool(name, value)),
            OptionProperty::InlineSources => set(&mut self.inline_sources, r.bool(name, value)),
            OptionProperty::IsolatedModules => set(&mut self.isolated_modules, r.bool(name, value)),
            OptionProperty::MapRoot => set(&mut self.map_root, r.string(name, value)),
            OptionProperty::Module => set(&mut self.module, r.string(name, value)),
            OptionProperty::NewLine => set(&mut self.new_line, r.string(name, value)),
            OptionProperty::NoEmit => set(&mut self.no_emit, r.bool(name, value)),
            OptionProperty::NoEmitHelpers => set(&mut self.no_emit_helpers, r.bool(name, value)),
            OptionProperty::NoImplicitAny => set(&mut self.no_implicit_any, r.bool(name, value)),
            OptionProperty::NoResolve => set(&mut self.no_resolve, r.bool(name, value)),
            OptionProperty::PreserveConstEnums => {
                set(&mut self.preserve_const_enums, r.bool(name, value))
            }
            OptionProperty::RemoveComments => set(&mut self.remove_comments, r.bool(name, value)),
            OptionProperty::SourceRoot => set(&mut self.source_root, r.string(name, value)),
            OptionProperty::SourceMap => set(&mut self.source_map, r.bool(name, value)),
            OptionProperty::SuppressImplicitAnyIndexErrors => {
                set(&mut self.suppress_implicit_any_index_errors, r.bool(name, value))
            }
            OptionProperty::Target => set(&mut self.target, r.string(name, value)),
            OptionProperty::Verbose => set(&mut self.verbose, r.bool(name, value)),
        }
    }

    /// Applies implied options and conflict rules, in order.
    fn resolve_conflicts(&mut self, diagnostics: &mut Diagnostics) {
        if self.emit_decorator_metadata == Some(true) {
            self.experimental_decorators = Some(true);
        }

        if self.inline_source_map == Some(true) && self.source_map == Some(true) {
            diagnostics.warnings.push(
                "TypeScript cannot use inlineSourceMap and sourceMap together.  Ignoring sourceMap."
                    .to_string(),
            );
            self.source_map = Some(false);
        }

        if self.inline_sources == Some(true) && self.source_map == Some(true) {
            diagnostics.errors.push(
                "It is not permitted to use inlineSources and sourceMap together.  Use one or the \
                 other."
                    .to_string(),
            );
        }

        // inline sources only work with an inline map
        if self.inline_sources == Some(true) && self.source_map != Some(true) {
            self.inline_sources = Some(true);
            self.inline_source_map = Some(true);
            self.source_map = Some(false);
        }
    }

    fn into_resolved(
        self,
        target_name: &str,
        compilation_tasks: Vec<CompilationTask>,
        diagnostics: Diagnostics,
    ) -> ResolvedOptions {
        let source_map = match (self.source_map, self.inline_source_map) {
            (None, None) => defaults::SOURCE_MAP,
            (source_map, _) => source_map.unwrap_or(false),
        };
        let remove_comments = self
            .remove_comments
            .or(self.comments.map(|comments| !comments))
            .unwrap_or(defaults::REMOVE_COMMENTS);

        ResolvedOptions {
            target_name: target_name.to_string(),

            html: self.html.unwrap_or_default(),
            html_out_dir: self.html_out_dir,
            html_out_dir_flatten: self
                .html_out_dir_flatten
                .unwrap_or(defaults::HTML_OUT_DIR_FLATTEN),
            reference: self.reference,
            test_execute: self.test_execute,
            tsconfig: self.tsconfig,
            template_cache: self.template_cache,
            vs: self.vs,
            watch: self.watch,

            additional_flags: self.additional_flags,
            comments: self.comments,
            compile: self.compile.unwrap_or(defaults::COMPILE),
            compiler: self.compiler,
            declaration: self.declaration.unwrap_or(false),
            emit_decorator_metadata: self.emit_decorator_metadata.unwrap_or(false),
            experimental_decorators: self.experimental_decorators.unwrap_or(false),
            fail_on_type_errors: self
                .fail_on_type_errors
                .unwrap_or(defaults::FAIL_ON_TYPE_ERRORS),
            fast: self.fast.unwrap_or(defaults::FAST),
            html_module_template: self
                .html_module_template
                .unwrap_or_else(|| defaults::HTML_MODULE_TEMPLATE.to_string()),
            html_var_template: self
                .html_var_template
                .unwrap_or_else(|| defaults::HTML_VAR_TEMPLATE.to_string()),
            inline_source_map: self.inline_source_map.unwrap_or(false),
            inline_sources: self.inline_sources.unwrap_or(false),
            isolated_modules: self.isolated_modules.unwrap_or(false),
            map_root: self.map_root,
            module: self.module,
            new_line: self.new_line,
            no_emit: self.no_emit.unwrap_or(false),
            no_emit_helpers: self.no_emit_helpers.unwrap_or(false),
            no_implicit_any: self.no_implicit_any.unwrap_or(false),
            no_resolve: self.no_resolve.unwrap_or(false),
            preserve_const_enums: self.preserve_const_enums.unwrap_or(false),
            remove_comments,
            source_root: self.source_root,
            source_map,
            suppress_implicit_any_index_errors: self
                .suppress_implicit_any_index_errors
                .unwrap_or(false),
            target: self.target.unwrap_or_else(|| defaults::TARGET.to_string()),
            verbose: self.verbose.unwrap_or(false),

            compilation_tasks,
            warnings: diagnostics.warnings,
            errors: diagnostics.errors,
        }
    }
}

/// Builds one compilation task per file group, in order.
///
/// A `dest` ending in `.js` is a merged output file; any other non-empty
/// `dest` is an output directory.
fn build_compilation_tasks(
    files: &[FileGroup],
    target_name: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<CompilationTask> {
    let mut tasks = Vec::with_capacity(files.len());

    for (index, group) in files.iter().enumerate() {
        let number = index + 1;
        let mut out = non_empty(&group.out).map(escape_path_if_required);
        let mut out_dir = non_empty(&group.out_dir).map(escape_path_if_required);
        if let Some(dest) = non_empty(&group.dest) {
            if is_javascript_file(dest) {
                out = Some(escape_path_if_required(dest));
            } else {
                out_dir = Some(escape_path_if_required(dest));
            }
        }

        let destination = match (out, out_dir) {
            (Some(out), Some(out_dir)) => {
                diagnostics.warnings.push(format!(
                    "Target \"{target_name}\" file group {number} sets both out ({out}) and \
                     outDir ({out_dir}); they should not be used together."
                ));
                Destination::Both { out, out_dir }
            }
            (Some(out), None) => Destination::OutFile(out),
            (None, Some(out_dir)) => Destination::OutDir(out_dir),
            (None, None) => {
                diagnostics.errors.push(format!(
                    "Target \"{target_name}\" file group {number} has no destination.  Set \
                     dest, out, or outDir."
                ));
                continue;
            }
        };

        tasks.push(CompilationTask {
            src: group
                .src
                .iter()
                .map(|file| escape_path_if_required(file))
                .collect(),
            destination,
            base_dir: non_empty(&group.base_dir).map(str::to_string),
        });
    }

    tasks
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casing::fix_casing;
    use crate::loader::{load_config_from_str, parse_raw_config};
    use pretty_assertions::assert_eq;

    fn group(dest: &str) -> FileGroup {
        FileGroup {
            src: vec!["src/app.ts".to_string()],
            dest: Some(dest.to_string()),
            ..FileGroup::default()
        }
    }

    fn resolve_with(target: &str) -> ResolvedOptions {
        let target = parse_raw_config(target).unwrap();
        resolve_options(&RawConfig::default(), &target, "dev", &[group("build")])
    }

    #[test]
    fn defaults_fill_unset_options() {
        let resolved = resolve_with("");
        assert!(resolved.warnings.is_empty());
        assert!(resolved.errors.is_empty());
        assert_eq!(resolved.target_name, "dev");
        assert!(resolved.source_map);
        assert!(!resolved.inline_source_map);
        assert_eq!(resolved.target, "es5");
        assert_eq!(resolved.fast, FastMode::Never);
        assert!(resolved.compile);
        assert!(resolved.fail_on_type_errors);
        assert!(resolved.remove_comments);
        assert!(!resolved.html_out_dir_flatten);
        assert_eq!(resolved.html_out_dir, None);
        assert_eq!(resolved.html_module_template, "<%= filename %>");
        assert_eq!(resolved.html_var_template, "<%= ext %>");
        assert_eq!(resolved.module, None);
    }

    #[test]
    fn target_overrides_task() {
        let task = parse_raw_config(
            r#"
watch = "src"
reference = "src/reference.ts"
[options]
target = "es3"
module = "amd"
"#,
        )
        .unwrap();
        let target = parse_raw_config(
            r#"
watch = "app"
[options]
module = "commonjs"
"#,
        )
        .unwrap();
        let resolved = resolve_options(&task, &target, "dev", &[group("build")]);
        assert_eq!(resolved.watch.as_deref(), Some("app"));
        assert_eq!(resolved.reference.as_deref(), Some("src/reference.ts"));
        assert_eq!(resolved.target, "es3");
        assert_eq!(resolved.module.as_deref(), Some("commonjs"));
    }

    #[test]
    fn miscased_property_is_used_and_reported_once() {
        let resolved = resolve_with("[options]\nNoImplicitAny = true");
        assert!(resolved.no_implicit_any);
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved.warnings[0].contains("target \"dev\""));
    }

    #[test]
    fn misplaced_option_is_ignored() {
        let resolved = resolve_with("declaration = true");
        assert!(!resolved.declaration);
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved.warnings[0].contains("possibly in the wrong place"));
    }

    #[test]
    fn decorator_metadata_implies_experimental_decorators() {
        let resolved = resolve_with("[options]\nemitDecoratorMetadata = true");
        assert!(resolved.emit_decorator_metadata);
        assert!(resolved.experimental_decorators);
    }

    #[test]
    fn inline_source_map_wins_over_source_map() {
        let resolved = resolve_with("[options]\ninlineSourceMap = true\nsourceMap = true");
        assert!(resolved.inline_source_map);
        assert!(!resolved.source_map);
        assert_eq!(
            resolved.warnings,
            vec![
                "TypeScript cannot use inlineSourceMap and sourceMap together.  Ignoring sourceMap."
                    .to_string()
            ]
        );
        assert!(resolved.errors.is_empty());
    }

    #[test]
    fn inline_sources_with_source_map_is_an_error() {
        let resolved = resolve_with("[options]\ninlineSources = true\nsourceMap = true");
        assert_eq!(resolved.errors.len(), 1);
        assert!(resolved.errors[0].contains("inlineSources and sourceMap"));
        // not auto-resolved
        assert!(resolved.source_map);
        assert!(resolved.inline_sources);
        assert!(!resolved.inline_source_map);
    }

    #[test]
    fn inline_sources_force_inline_map() {
        for config in [
            "[options]\ninlineSources = true",
            "[options]\ninlineSources = true\nsourceMap = false",
        ] {
            let resolved = resolve_with(config);
            assert!(resolved.inline_sources, "{config}");
            assert!(resolved.inline_source_map, "{config}");
            assert!(!resolved.source_map, "{config}");
            assert!(resolved.errors.is_empty(), "{config}");
        }
    }

    #[test]
    fn explicit_inline_source_map_suppresses_source_map_default() {
        let resolved = resolve_with("[options]\ninlineSourceMap = false");
        assert!(!resolved.source_map);
        assert!(!resolved.inline_source_map);
    }

    #[test]
    fn comments_drive_remove_comments_when_unset() {
        assert!(!resolve_with("[options]\ncomments = true").remove_comments);
        assert!(resolve_with("[options]\ncomments = false").remove_comments);
        assert!(
            !resolve_with("[options]\ncomments = false\nremoveComments = false").remove_comments
        );
    }

    #[test]
    fn wrong_type_is_an_error_and_falls_back() {
        let resolved = resolve_with("[options]\nsourceMap = \"yes\"\ntarget = 6");
        assert_eq!(
            resolved.errors,
            vec![
                "Property \"sourceMap\" in target \"dev\" options should be a boolean, not \"yes\"."
                    .to_string(),
                "Property \"target\" in target \"dev\" options should be a string, not integer."
                    .to_string(),
            ]
        );
        assert!(resolved.source_map);
        assert_eq!(resolved.target, "es5");
    }

    #[test]
    fn wrong_type_in_target_keeps_task_value() {
        let task = parse_raw_config("[options]\nmodule = \"amd\"").unwrap();
        let target = parse_raw_config("[options]\nmodule = false").unwrap();
        let resolved = resolve_options(&task, &target, "dev", &[group("build")]);
        assert_eq!(resolved.module.as_deref(), Some("amd"));
        assert_eq!(resolved.errors.len(), 1);
    }

    #[test]
    fn fast_accepts_booleans_and_modes() {
        assert_eq!(resolve_with("[options]\nfast = true").fast, FastMode::Always);
        assert_eq!(resolve_with("[options]\nfast = false").fast, FastMode::Never);
        assert_eq!(resolve_with("[options]\nfast = \"watch\"").fast, FastMode::Watch);

        let bad = resolve_with("[options]\nfast = \"sometimes\"");
        assert_eq!(bad.fast, FastMode::Never);
        assert_eq!(bad.errors.len(), 1);
    }

    #[test]
    fn html_accepts_string_or_list() {
        assert_eq!(resolve_with("html = \"a.html\"").html, vec!["a.html"]);
        assert_eq!(
            resolve_with("html = [\"a.html\", \"b.html\"]").html,
            vec!["a.html", "b.html"]
        );
        assert_eq!(resolve_with("html = [\"a.html\", 1]").errors.len(), 1);
    }

    #[test]
    fn pass_through_properties_keep_their_shape() {
        let resolved = resolve_with("[tsconfig]\npassThrough = true");
        let tsconfig = resolved.tsconfig.unwrap();
        assert_eq!(tsconfig.get("passThrough").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn destination_classification() {
        let files = vec![
            group("build/app.js"),
            group("build/out"),
            FileGroup {
                src: vec!["my src/app.ts".to_string()],
                dest: Some("my build/app.js".to_string()),
                base_dir: Some("my src".to_string()),
                ..FileGroup::default()
            },
        ];
        let resolved = resolve_options(&RawConfig::default(), &RawConfig::default(), "dev", &files);
        let tasks = &resolved.compilation_tasks;

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].destination, Destination::OutFile("build/app.js".into()));
        assert_eq!(tasks[1].destination, Destination::OutDir("build/out".into()));
        assert_eq!(tasks[2].out(), Some("\"my build/app.js\""));
        assert_eq!(tasks[2].src, vec!["\"my src/app.ts\""]);
        assert_eq!(tasks[2].base_dir.as_deref(), Some("my src"));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn explicit_out_and_out_dir_warns() {
        let files = vec![FileGroup {
            src: vec!["app.ts".to_string()],
            out: Some("app.js".to_string()),
            out_dir: Some("build".to_string()),
            ..FileGroup::default()
        }];
        let resolved = resolve_options(&RawConfig::default(), &RawConfig::default(), "dev", &files);
        assert_eq!(
            resolved.compilation_tasks[0].destination,
            Destination::Both {
                out: "app.js".into(),
                out_dir: "build".into()
            }
        );
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved.errors.is_empty());
    }

    #[test]
    fn group_without_destination_is_an_error() {
        let files = vec![
            FileGroup {
                src: vec!["app.ts".to_string()],
                dest: Some("  ".to_string()),
                ..FileGroup::default()
            },
            group("build"),
        ];
        let resolved = resolve_options(&RawConfig::default(), &RawConfig::default(), "dev", &files);
        assert_eq!(resolved.compilation_tasks.len(), 1);
        assert_eq!(
            resolved.errors,
            vec![
                "Target \"dev\" file group 1 has no destination.  Set dest, out, or outDir."
                    .to_string()
            ]
        );
    }

    #[test]
    fn resolving_corrected_config_is_idempotent() {
        let raw = parse_raw_config(
            r#"
Reference = "src/reference.ts"
[options]
SourceMap = false
fast = "watch"
"#,
        )
        .unwrap();
        let corrected = fix_casing(&raw, &target_label("dev")).config;
        let files = [group("build")];

        let first = resolve_options(&RawConfig::default(), &corrected, "dev", &files);
        let second = resolve_options(&RawConfig::default(), &corrected, "dev", &files);
        assert!(first.warnings.is_empty());
        assert_eq!(first, second);
        assert_eq!(first.reference.as_deref(), Some("src/reference.ts"));
        assert!(!first.source_map);
    }

    #[test]
    fn input_configs_are_not_mutated() {
        let target = parse_raw_config("WATCH = \"src\"").unwrap();
        let before = target.clone();
        let resolved = resolve_options(&RawConfig::default(), &target, "dev", &[group("build")]);
        assert_eq!(resolved.watch.as_deref(), Some("src"));
        assert_eq!(target, before);
    }

    #[test]
    fn resolve_target_by_name() {
        let config = load_config_from_str(
            r#"
[ts.options]
verbose = true

[targets.dev]
src = ["src/app.ts"]
dest = "build/app.js"
"#,
        )
        .unwrap();
        let resolved = resolve_target(&config, "dev").unwrap();
        assert!(resolved.verbose);
        assert_eq!(resolved.compilation_tasks[0].out(), Some("build/app.js"));

        let err = resolve_target(&config, "release").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTarget(_)));
    }
}
