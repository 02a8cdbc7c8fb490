//! Compiler process execution.

use std::future::Future;
use std::path::PathBuf;

use crate::error::CompileError;

/// A fully assembled compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to launch.
    pub program: String,
    /// Arguments, ending with `@<command file>`.
    pub args: Vec<String>,
    /// Directory the compiler runs in.
    pub working_dir: PathBuf,
}

/// What the compiler reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    /// Process exit code; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    /// Captured stdout followed by stderr.
    pub output: String,
}

/// Runs a compiler invocation to completion.
pub trait CompilerRunner {
    /// Runs `invocation` and reports its exit code and output.
    ///
    /// Only a failure to run the process at all is an error.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<CompilerOutput, CompileError>> + Send;
}

/// Runs the compiler as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CompilerRunner for ProcessRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<CompilerOutput, CompileError>> + Send {
        async move {
            let output = tokio::process::Command::new(&invocation.program)
                .args(&invocation.args)
                .current_dir(&invocation.working_dir)
                .output()
                .await
                .map_err(|source| CompileError::Spawn {
                    program: invocation.program.clone(),
                    source,
                })?;

            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Ok(CompilerOutput {
                exit_code: output.status.code().unwrap_or(-1),
                output: text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let invocation = Invocation {
            program: "tsbuild-no-such-compiler".to_string(),
            args: vec!["@none".to_string()],
            working_dir: std::env::temp_dir(),
        };
        let err = ProcessRunner.run(&invocation).await.unwrap_err();
        assert!(matches!(err, CompileError::Spawn { ref program, .. } if program == "tsbuild-no-such-compiler"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_code_and_output_are_captured() {
        let invocation = Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo out; echo err >&2; exit 2".to_string()],
            working_dir: std::env::temp_dir(),
        };
        let output = ProcessRunner.run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, 2);
        assert_eq!(output.output, "out\nerr\n");
    }
}
