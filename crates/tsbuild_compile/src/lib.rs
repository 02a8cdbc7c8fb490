//! Compiler invocation for resolved build targets.
//!
//! The [`Driver`] turns a compilation task and its resolved options into a
//! TypeScript compiler run: it narrows the file list through the change
//! tracker in fast mode, assembles the argument list, hands it to the
//! compiler through a temporary command file, and reports the result.

#![warn(missing_docs)]

pub mod command;
pub mod driver;
pub mod error;
pub mod locate;
pub mod runner;

pub use command::{build_arguments, CompilerCommand};
pub use driver::{CompileResult, Driver, NoPrePass, PrePass, NO_CHANGES_OUTPUT};
pub use error::CompileError;
pub use locate::{compiler_version, locate_compiler};
pub use runner::{CompilerOutput, CompilerRunner, Invocation, ProcessRunner};
