//! Configuration types: raw sections as written by the user and the resolved
//! per-target options record.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The whole `tsbuild.toml` file.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// Task-level configuration shared by every target (the `[ts]` section).
    pub task: RawConfig,
    /// Named target sections.
    pub targets: BTreeMap<String, TargetSection>,
}

/// One `[targets.<name>]` section, split into its configuration and file groups.
#[derive(Debug, Clone, Default)]
pub struct TargetSection {
    /// Target-level properties and options.
    pub config: RawConfig,
    /// Source lists and their destinations.
    pub files: Vec<FileGroup>,
}

/// One level of user configuration, kept as written.
///
/// Keys are not validated here: foreign and miscased keys are preserved so the
/// resolver can warn about them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawConfig {
    /// Top-level keys (candidates for direct properties).
    pub properties: toml::Table,
    /// Keys of the nested `options` table (candidates for options properties).
    pub options: toml::Table,
}

/// A source list and its output destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileGroup {
    /// Source files or simple patterns.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub src: Vec<String>,
    /// Generic destination: a `.js` file means merged output, anything else a directory.
    #[serde(default)]
    pub dest: Option<String>,
    /// Explicit merged output file.
    #[serde(default)]
    pub out: Option<String>,
    /// Explicit output directory.
    #[serde(default, rename = "outDir")]
    pub out_dir: Option<String>,
    /// Root of the source tree when compiling into `outDir`.
    #[serde(default, rename = "baseDir")]
    pub base_dir: Option<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// When fast (incremental) compilation is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FastMode {
    /// Always compile the full file list.
    #[default]
    Never,
    /// Compile only changed files while watching.
    Watch,
    /// Compile only changed files on every run.
    Always,
}

impl FastMode {
    /// Parses the string form accepted in configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "never" => Some(FastMode::Never),
            "watch" => Some(FastMode::Watch),
            "always" => Some(FastMode::Always),
            _ => None,
        }
    }

    /// Returns `true` if fast compilation applies in the given run mode.
    pub fn is_active(self, watching: bool) -> bool {
        match self {
            FastMode::Never => false,
            FastMode::Watch => watching,
            FastMode::Always => true,
        }
    }
}

/// Where a compilation task writes its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Destination {
    /// All output merged into one file (`--out`).
    OutFile(String),
    /// Output mirrored into a directory (`--outDir`).
    OutDir(String),
    /// Both given explicitly by the user; the resolver warns about it.
    Both {
        /// The merged output file.
        out: String,
        /// The output directory.
        #[serde(rename = "outDir")]
        out_dir: String,
    },
}

impl Destination {
    /// The merged output file, if any.
    pub fn out(&self) -> Option<&str> {
        match self {
            Destination::OutFile(out) | Destination::Both { out, .. } => Some(out),
            Destination::OutDir(_) => None,
        }
    }

    /// The output directory, if any.
    pub fn out_dir(&self) -> Option<&str> {
        match self {
            Destination::OutDir(dir) | Destination::Both { out_dir: dir, .. } => Some(dir),
            Destination::OutFile(_) => None,
        }
    }
}

/// One unit of compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationTask {
    /// Source paths, escaped with [`tsbuild_common::escape_path_if_required`].
    pub src: Vec<String>,
    /// Output destination.
    pub destination: Destination,
    /// Base directory used to anchor `outDir` output.
    pub base_dir: Option<String>,
}

impl CompilationTask {
    /// The merged output file, if any.
    pub fn out(&self) -> Option<&str> {
        self.destination.out()
    }

    /// The output directory, if any.
    pub fn out_dir(&self) -> Option<&str> {
        self.destination.out_dir()
    }
}

/// The fully resolved options for one target.
///
/// Produced by [`resolve_options`](crate::resolve_options). Compilation must
/// not proceed while [`errors`](Self::errors) is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    /// Name of the target these options belong to.
    pub target_name: String,

    /// HTML files to wrap as modules.
    pub html: Vec<String>,
    /// Output directory for HTML modules.
    pub html_out_dir: Option<String>,
    /// Flatten the HTML output directory.
    pub html_out_dir_flatten: bool,
    /// Reference file path.
    pub reference: Option<String>,
    /// Test command to execute after compilation.
    pub test_execute: Option<String>,
    /// tsconfig.json settings, passed through untouched.
    pub tsconfig: Option<toml::Value>,
    /// templateCache settings, passed through untouched.
    pub template_cache: Option<toml::Value>,
    /// Visual Studio settings, passed through untouched.
    pub vs: Option<toml::Value>,
    /// Directory to watch.
    pub watch: Option<String>,

    /// Extra compiler flags.
    pub additional_flags: Option<String>,
    /// Legacy comment preservation flag as written.
    pub comments: Option<bool>,
    /// Invoke the compiler.
    pub compile: bool,
    /// Custom compiler executable.
    pub compiler: Option<String>,
    /// Emit `.d.ts` files.
    pub declaration: bool,
    /// Emit decorator metadata.
    pub emit_decorator_metadata: bool,
    /// Enable experimental decorators.
    pub experimental_decorators: bool,
    /// Treat type errors as failures.
    pub fail_on_type_errors: bool,
    /// Fast compilation mode.
    pub fast: FastMode,
    /// HTML module name template.
    pub html_module_template: String,
    /// HTML variable name template.
    pub html_var_template: String,
    /// Emit source maps inline.
    pub inline_source_map: bool,
    /// Include sources in inline source maps.
    pub inline_sources: bool,
    /// Compile each file as an isolated module.
    pub isolated_modules: bool,
    /// Map root URL.
    pub map_root: Option<String>,
    /// Module kind.
    pub module: Option<String>,
    /// Newline style.
    pub new_line: Option<String>,
    /// Skip emitting output.
    pub no_emit: bool,
    /// Skip emitting helpers.
    pub no_emit_helpers: bool,
    /// Error on implicit `any`.
    pub no_implicit_any: bool,
    /// Do not resolve imports.
    pub no_resolve: bool,
    /// Keep const enum declarations.
    pub preserve_const_enums: bool,
    /// Strip comments from output.
    pub remove_comments: bool,
    /// Source root URL.
    pub source_root: Option<String>,
    /// Emit `.map` files.
    pub source_map: bool,
    /// Suppress implicit-any index errors.
    pub suppress_implicit_any_index_errors: bool,
    /// Language target version.
    pub target: String,
    /// Log the compiler command line.
    pub verbose: bool,

    /// Units of compilation, in file group order.
    pub compilation_tasks: Vec<CompilationTask>,
    /// Non-fatal diagnostics.
    pub warnings: Vec<String>,
    /// Fatal configuration errors.
    pub errors: Vec<String>,
}

impl ResolvedOptions {
    /// Returns `true` if any configuration error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
