//! The compilation driver: runs the compiler for one compilation task.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use tsbuild_cache::ChangeTracker;
use tsbuild_common::unquote_path;
use tsbuild_config::{CompilationTask, ResolvedOptions};

use crate::command::{build_arguments, write_command_file, CompilerCommand};
use crate::error::CompileError;
use crate::runner::CompilerRunner;

/// File written into the base directory so `--outDir` output keeps its layout.
pub const BASE_DIR_PLACEHOLDER: &str = "ignoreBaseDirFile.ts";

/// Content of the base directory placeholder.
pub const BASE_DIR_PLACEHOLDER_CONTENT: &str =
    "// Ignore this file. See https://github.com/grunt-ts/grunt-ts/issues/77";

/// Output reported when fast compilation finds nothing to do.
pub const NO_CHANGES_OUTPUT: &str = "No files compiled as no change detected";

/// Warning issued when fast compilation is requested with a merged output file.
pub const FAST_WITH_OUT_WARNING: &str =
    "Fast compile will not work when out is specified. Ignoring fast compilation.";

/// A step run over the file lists right before the compiler is invoked.
pub trait PrePass {
    /// Receives the files about to be compiled and the target's full list.
    fn run(&mut self, to_compile: &[String], all_files: &[String], options: &ResolvedOptions);
}

/// The default pre-pass, which does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrePass;

impl PrePass for NoPrePass {
    fn run(&mut self, _to_compile: &[String], _all_files: &[String], _options: &ResolvedOptions) {}
}

/// Outcome of a compilation that reached a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    /// Compiler exit code, or 0 when nothing needed compiling.
    pub exit_code: i32,
    /// Compiler output, or [`NO_CHANGES_OUTPUT`].
    pub output: String,
    /// Number of files handed to the compiler, placeholder included.
    pub file_count: usize,
    /// Warnings raised while preparing the compile.
    pub warnings: Vec<String>,
}

impl CompileResult {
    /// Returns `true` if the compiler exited cleanly.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Drives compiler invocations for resolved targets.
///
/// The driver owns its change tracker so fast compilation state carries over
/// between compiles, which is what watch mode relies on.
#[derive(Debug)]
pub struct Driver<R, T, P = NoPrePass> {
    runner: R,
    tracker: T,
    pre_pass: P,
    compiler: CompilerCommand,
    working_dir: PathBuf,
    watching: bool,
}

impl<R, T> Driver<R, T, NoPrePass>
where
    R: CompilerRunner,
    T: ChangeTracker,
{
    /// Creates a driver for a single (non-watch) run.
    ///
    /// Relative source paths are resolved against `working_dir`.
    pub fn new(runner: R, tracker: T, compiler: CompilerCommand, working_dir: PathBuf) -> Self {
        Self {
            runner,
            tracker,
            pre_pass: NoPrePass,
            compiler,
            working_dir,
            watching: false,
        }
    }
}

impl<R, T, P> Driver<R, T, P> {
    /// Marks the driver as running under watch mode.
    pub fn watching(mut self, watching: bool) -> Self {
        self.watching = watching;
        self
    }

    /// Replaces the pre-pass.
    pub fn with_pre_pass<Q: PrePass>(self, pre_pass: Q) -> Driver<R, T, Q> {
        Driver {
            runner: self.runner,
            tracker: self.tracker,
            pre_pass,
            compiler: self.compiler,
            working_dir: self.working_dir,
            watching: self.watching,
        }
    }

    /// The change tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// The directory relative paths are resolved against.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl<R, T, P> Driver<R, T, P>
where
    R: CompilerRunner,
    T: ChangeTracker,
    P: PrePass,
{
    /// Compiles `files` for one compilation task of `options`.
    ///
    /// The options must be free of configuration errors. A non-zero compiler
    /// exit code is reported in the result, not as an error.
    pub async fn compile(
        &mut self,
        files: &[String],
        task: &CompilationTask,
        options: &ResolvedOptions,
    ) -> Result<CompileResult, CompileError> {
        let target_name = options.target_name.as_str();
        let fast = options.fast.is_active(self.watching);
        let mut warnings = Vec::new();
        let mut to_compile = files.to_vec();

        if fast {
            if task.out().is_some() {
                warn!(target_name, "{FAST_WITH_OUT_WARNING}");
                warnings.push(FAST_WITH_OUT_WARNING.to_string());
            } else {
                let changed = self
                    .tracker
                    .changed_files(files, &self.working_dir, target_name);
                if changed.is_empty() {
                    info!(target_name, "no file changes detected, skipping compile");
                    return Ok(CompileResult {
                        exit_code: 0,
                        output: NO_CHANGES_OUTPUT.to_string(),
                        file_count: 0,
                        warnings,
                    });
                }
                for file in &changed {
                    info!(target_name, file = file.as_str(), "fast compile");
                }
                to_compile = changed;
            }
        }

        self.pre_pass.run(&to_compile, files, options);

        let mut submitted = to_compile.clone();
        if let (Some(_), Some(base_dir)) = (task.out_dir(), task.base_dir.as_deref()) {
            if !submitted.is_empty() {
                let base_dir = self.working_dir.join(unquote_path(base_dir));
                let placeholder = ensure_base_dir_placeholder(&base_dir)?;
                submitted.push(placeholder.display().to_string());
            }
        }

        let args = build_arguments(&submitted, &self.working_dir, task, options);
        if options.verbose {
            info!(target_name, "{}", args.join(" "));
        } else {
            debug!(target_name, "{}", args.join(" "));
        }

        let command = match &options.compiler {
            Some(compiler) => CompilerCommand::node(compiler),
            None => self.compiler.clone(),
        };

        let command_file = write_command_file(&args)?;
        let invocation = command.invocation(command_file.path(), &self.working_dir);
        let outcome = self.runner.run(&invocation).await;

        let command_path = command_file.path().to_path_buf();
        command_file
            .close()
            .map_err(|source| CompileError::CommandFileCleanup {
                path: command_path,
                source,
            })?;
        let output = outcome?;

        if output.exit_code == 0 && fast {
            self.tracker
                .record_success(&to_compile, &self.working_dir, target_name)?;
        }

        Ok(CompileResult {
            exit_code: output.exit_code,
            output: output.output,
            file_count: submitted.len(),
            warnings,
        })
    }
}

/// Creates the placeholder in `base_dir` unless it already exists.
fn ensure_base_dir_placeholder(base_dir: &Path) -> Result<PathBuf, CompileError> {
    let path = base_dir.join(BASE_DIR_PLACEHOLDER);
    if !path.exists() {
        std::fs::write(&path, BASE_DIR_PLACEHOLDER_CONTENT).map_err(|source| {
            CompileError::Placeholder {
                path: path.clone(),
                source,
            }
        })?;
    }
    Ok(path)
}
