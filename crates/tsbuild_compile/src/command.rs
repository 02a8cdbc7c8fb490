//! Compiler command line assembly.
//!
//! The compiler is never given its arguments directly. They are written,
//! space separated, to a temporary command file which is passed as
//! `@<path>`, so long file lists do not hit command line limits.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tsbuild_common::{escape_path_if_required, unquote_path};
use tsbuild_config::{CompilationTask, ResolvedOptions};

use crate::error::CompileError;
use crate::runner::Invocation;

/// Prefix of temporary command file names.
pub const COMMAND_FILE_PREFIX: &str = "tscommand-";

/// The program used to run the compiler, plus any arguments that precede the
/// command file (typically the compiler script run by `node`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCommand {
    /// Executable to launch.
    pub program: String,
    /// Arguments placed before `@<command file>`.
    pub leading_args: Vec<String>,
}

impl CompilerCommand {
    /// A compiler executable invoked directly.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// A compiler script run with `node`.
    pub fn node(script: impl AsRef<Path>) -> Self {
        Self {
            program: "node".to_string(),
            leading_args: vec![script.as_ref().display().to_string()],
        }
    }

    /// Builds the invocation that hands `command_file` to this compiler.
    pub fn invocation(&self, command_file: &Path, working_dir: &Path) -> Invocation {
        let mut args = self.leading_args.clone();
        args.push(format!("@{}", command_file.display()));
        Invocation {
            program: self.program.clone(),
            args,
            working_dir: working_dir.to_path_buf(),
        }
    }
}

/// Assembles the compiler arguments for one compilation task.
///
/// Order: files, boolean flags, `--target`/`--module`/`--newLine`, output
/// destination, `--sourceRoot`, `--mapRoot`, then the split
/// `additionalFlags`.
pub fn build_arguments(
    files: &[String],
    working_dir: &Path,
    task: &CompilationTask,
    options: &ResolvedOptions,
) -> Vec<String> {
    let mut args: Vec<String> = files
        .iter()
        .map(|file| absolute_file_arg(file, working_dir))
        .collect();

    let switches = [
        (options.source_map, "--sourcemap"),
        (options.inline_source_map, "--inlineSourceMap"),
        (options.inline_sources, "--inlineSources"),
        (options.declaration, "--declaration"),
        (options.remove_comments, "--removeComments"),
        (options.no_implicit_any, "--noImplicitAny"),
        (options.no_resolve, "--noResolve"),
        (options.experimental_decorators, "--experimentalDecorators"),
        (options.emit_decorator_metadata, "--emitDecoratorMetadata"),
        (options.isolated_modules, "--isolatedModules"),
        (options.no_emit, "--noEmit"),
        (options.no_emit_helpers, "--noEmitHelpers"),
        (options.preserve_const_enums, "--preserveConstEnums"),
        (
            options.suppress_implicit_any_index_errors,
            "--suppressImplicitAnyIndexErrors",
        ),
    ];
    args.extend(
        switches
            .into_iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, flag)| flag.to_string()),
    );

    push_flag(&mut args, "--target", Some(options.target.to_uppercase().as_str()));
    push_flag(
        &mut args,
        "--module",
        options.module.as_ref().map(|m| m.to_lowercase()).as_deref(),
    );
    push_flag(&mut args, "--newLine", options.new_line.as_deref());

    push_flag(&mut args, "--out", task.out());
    push_flag(&mut args, "--outDir", task.out_dir());
    let source_root = options.source_root.as_deref().map(escape_path_if_required);
    push_flag(&mut args, "--sourceRoot", source_root.as_deref());
    let map_root = options.map_root.as_deref().map(escape_path_if_required);
    push_flag(&mut args, "--mapRoot", map_root.as_deref());

    if let Some(extra) = &options.additional_flags {
        args.extend(extra.split_whitespace().map(str::to_string));
    }

    args
}

fn push_flag(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

/// Turns a possibly quoted, possibly relative source path into an absolute
/// path, quoted when it contains a space.
pub fn absolute_file_arg(file: &str, working_dir: &Path) -> String {
    let path = Path::new(unquote_path(file));
    let absolute = if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&working_dir.join(path))
    };
    escape_path_if_required(&absolute.to_string_lossy())
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Writes `args` to a new uniquely named temporary command file.
///
/// The file is deleted when the returned handle is closed or dropped.
pub fn write_command_file(args: &[String]) -> Result<NamedTempFile, CompileError> {
    let mut file = tempfile::Builder::new()
        .prefix(COMMAND_FILE_PREFIX)
        .suffix(".tmp")
        .tempfile()
        .map_err(|source| CompileError::CommandFile { source })?;
    file.write_all(args.join(" ").as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| CompileError::CommandFile { source })?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsbuild_config::{parse_raw_config, resolve_options, FileGroup, RawConfig};

    fn resolve(options: &str, group: FileGroup) -> ResolvedOptions {
        let target = parse_raw_config(options).unwrap();
        resolve_options(&RawConfig::default(), &target, "dev", &[group])
    }

    fn dest_group(dest: &str) -> FileGroup {
        FileGroup {
            src: vec!["app.ts".to_string()],
            dest: Some(dest.to_string()),
            ..FileGroup::default()
        }
    }

    #[test]
    fn default_arguments() {
        let options = resolve("", dest_group("build/app.js"));
        let task = &options.compilation_tasks[0];
        let args = build_arguments(&["src/app.ts".to_string()], Path::new("/work"), task, &options);
        assert_eq!(
            args,
            vec![
                "/work/src/app.ts",
                "--sourcemap",
                "--removeComments",
                "--target",
                "ES5",
                "--out",
                "build/app.js",
            ]
        );
    }

    #[test]
    fn full_argument_order() {
        let options = resolve(
            r#"
[options]
sourceMap = false
inlineSources = true
declaration = true
removeComments = false
noImplicitAny = true
noResolve = true
emitDecoratorMetadata = true
isolatedModules = true
noEmit = true
noEmitHelpers = true
preserveConstEnums = true
suppressImplicitAnyIndexErrors = true
target = "es6"
module = "CommonJS"
newLine = "LF"
sourceRoot = "/src"
mapRoot = "/maps"
additionalFlags = "--watch  --pretty"
"#,
            dest_group("build"),
        );
        let task = &options.compilation_tasks[0];
        let args = build_arguments(&["a.ts".to_string()], Path::new("/work"), task, &options);
        assert_eq!(
            args,
            vec![
                "/work/a.ts",
                "--inlineSourceMap",
                "--inlineSources",
                "--declaration",
                "--noImplicitAny",
                "--noResolve",
                "--experimentalDecorators",
                "--emitDecoratorMetadata",
                "--isolatedModules",
                "--noEmit",
                "--noEmitHelpers",
                "--preserveConstEnums",
                "--suppressImplicitAnyIndexErrors",
                "--target",
                "ES6",
                "--module",
                "commonjs",
                "--newLine",
                "LF",
                "--outDir",
                "build",
                "--sourceRoot",
                "/src",
                "--mapRoot",
                "/maps",
                "--watch",
                "--pretty",
            ]
        );
    }

    #[test]
    fn both_destinations_are_passed() {
        let group = FileGroup {
            src: vec!["app.ts".to_string()],
            out: Some("app.js".to_string()),
            out_dir: Some("build".to_string()),
            ..FileGroup::default()
        };
        let options = resolve("", group);
        let args = build_arguments(&[], Path::new("/work"), &options.compilation_tasks[0], &options);
        let out = args.iter().position(|a| a == "--out").unwrap();
        let out_dir = args.iter().position(|a| a == "--outDir").unwrap();
        assert!(out < out_dir);
    }

    #[test]
    fn map_roots_with_spaces_stay_one_argument() {
        let options = resolve(
            "[options]\nsourceRoot = \"my sources\"\nmapRoot = \"my maps\"",
            dest_group("build"),
        );
        let args = build_arguments(&[], Path::new("/work"), &options.compilation_tasks[0], &options);
        let tail: Vec<&str> = args[args.len() - 4..].iter().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec!["--sourceRoot", "\"my sources\"", "--mapRoot", "\"my maps\""]
        );
    }

    #[test]
    fn file_args_are_absolute_and_quoted() {
        let cwd = Path::new("/work");
        assert_eq!(absolute_file_arg("src/a.ts", cwd), "/work/src/a.ts");
        assert_eq!(absolute_file_arg("./src/../lib/a.ts", cwd), "/work/lib/a.ts");
        assert_eq!(absolute_file_arg("\"my src/a.ts\"", cwd), "\"/work/my src/a.ts\"");
        assert_eq!(absolute_file_arg("/abs/a.ts", cwd), "/abs/a.ts");
    }

    #[test]
    fn command_file_holds_joined_arguments() {
        let args = vec!["/work/a.ts".to_string(), "--target".to_string(), "ES5".to_string()];
        let file = write_command_file(&args).unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(COMMAND_FILE_PREFIX));
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "/work/a.ts --target ES5"
        );

        let path = file.path().to_path_buf();
        file.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn invocation_appends_command_file() {
        let command = CompilerCommand::node("/work/node_modules/typescript/bin/tsc");
        let invocation = command.invocation(Path::new("/tmp/tscommand-1.tmp"), Path::new("/work"));
        assert_eq!(invocation.program, "node");
        assert_eq!(
            invocation.args,
            vec!["/work/node_modules/typescript/bin/tsc", "@/tmp/tscommand-1.tmp"]
        );
        assert_eq!(invocation.working_dir, PathBuf::from("/work"));
    }
}
