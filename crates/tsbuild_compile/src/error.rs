//! Error types for compiler invocation.

use std::path::PathBuf;

use tsbuild_cache::CacheError;

/// Errors that stop a compilation before the compiler's verdict is known.
///
/// A compiler that runs and exits non-zero is not an error: its exit code is
/// reported in [`CompileResult`](crate::CompileResult).
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The base directory placeholder file could not be written.
    #[error("failed to write placeholder file {path}: {source}")]
    Placeholder {
        /// Path of the placeholder file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The temporary command file could not be created or written.
    #[error("failed to create command file: {source}")]
    CommandFile {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The temporary command file could not be removed after the run.
    #[error("failed to remove command file {path}: {source}")]
    CommandFileCleanup {
        /// Path of the command file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler process could not be started.
    #[error("failed to launch compiler '{program}': {source}")]
    Spawn {
        /// The program that was launched.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The change cache could not record a successful compile.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
