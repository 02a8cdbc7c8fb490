//! The `tsbuild build` command: resolve and compile targets once.

use tracing::{debug, warn};
use tsbuild_cache::ChangeTracker;
use tsbuild_compile::{CompileResult, CompilerRunner, Driver};
use tsbuild_config::{resolve_target, ProjectConfig, ResolvedOptions};

use crate::pipeline::{create_driver, expand_sources, load_project, runtime, select_targets};
use crate::reference::write_reference_file;
use crate::{BuildArgs, GlobalArgs};

/// Compiler exit code for type errors in otherwise emitted output.
pub const TYPE_ERRORS_EXIT_CODE: i32 = 2;

/// How a compile result counts toward the target's success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The compiler exited cleanly.
    Succeeded,
    /// Type errors were reported but tolerated by `failOnTypeErrors = false`.
    TypeErrorsTolerated,
    /// The compilation failed.
    Failed,
}

/// Classifies a compile result.
pub fn classify(result: &CompileResult, fail_on_type_errors: bool) -> Outcome {
    if result.succeeded() {
        Outcome::Succeeded
    } else if result.exit_code == TYPE_ERRORS_EXIT_CODE && !fail_on_type_errors {
        Outcome::TypeErrorsTolerated
    } else {
        Outcome::Failed
    }
}

/// Runs the `build` command.
///
/// Returns exit code 0 if every target built, 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    let targets = select_targets(&config, &args.targets)?;
    let mut driver = create_driver(&root, global)?;
    let runtime = runtime()?;

    let mut failed = 0usize;
    for name in &targets {
        if !global.quiet {
            eprintln!("Running target \"{name}\"");
        }
        match runtime.block_on(build_target(&mut driver, &config, name, global.quiet)) {
            Ok(true) => {}
            Ok(false) => failed += 1,
            Err(e) => {
                eprintln!("error: [{name}] {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("error: {failed} of {} target(s) failed", targets.len());
        return Ok(1);
    }
    Ok(0)
}

/// Resolves and builds one target. Returns whether it succeeded.
pub async fn build_target<R, T>(
    driver: &mut Driver<R, T>,
    config: &ProjectConfig,
    target_name: &str,
    quiet: bool,
) -> Result<bool, Box<dyn std::error::Error>>
where
    R: CompilerRunner,
    T: ChangeTracker,
{
    let options = resolve_target(config, target_name)?;
    build_resolved(driver, &options, quiet).await
}

/// Builds every compilation task of already resolved options.
///
/// Warnings are logged; configuration errors are printed and the target is
/// not compiled.
pub async fn build_resolved<R, T>(
    driver: &mut Driver<R, T>,
    options: &ResolvedOptions,
    quiet: bool,
) -> Result<bool, Box<dyn std::error::Error>>
where
    R: CompilerRunner,
    T: ChangeTracker,
{
    let target_name = options.target_name.as_str();
    for warning in &options.warnings {
        warn!(target_name, "{warning}");
    }
    if options.has_errors() {
        for error in &options.errors {
            eprintln!("error: [{target_name}] {error}");
        }
        return Ok(false);
    }

    let root = driver.working_dir().to_path_buf();
    let mut success = true;
    for task in &options.compilation_tasks {
        let files = expand_sources(&root, &task.src)?;

        if let Some(reference) = &options.reference {
            let path = write_reference_file(&root, reference, &files)?;
            debug!(target_name, path = %path.display(), "wrote reference file");
        }

        if !options.compile {
            debug!(target_name, "compile = false, skipping compiler");
            continue;
        }

        let result = driver.compile(&files, task, options).await?;
        success &= report(&result, options, quiet);
    }
    Ok(success)
}

fn report(result: &CompileResult, options: &ResolvedOptions, quiet: bool) -> bool {
    let output = result.output.trim_end();
    match classify(result, options.fail_on_type_errors) {
        Outcome::Succeeded => {
            if !quiet {
                if !output.is_empty() {
                    eprintln!("{output}");
                }
                eprintln!(
                    "{} typescript files successfully processed.",
                    result.file_count
                );
            }
            true
        }
        Outcome::TypeErrorsTolerated => {
            eprintln!("{output}");
            warn!(
                target_name = options.target_name.as_str(),
                "type errors reported, output emitted; not failing because failOnTypeErrors is false"
            );
            true
        }
        Outcome::Failed => {
            if !output.is_empty() {
                eprintln!("{output}");
            }
            eprintln!("error: [{}] Compilation failed", options.target_name);
            false
        }
    }
}
