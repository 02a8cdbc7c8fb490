//! tsbuild CLI: the command-line interface for building TypeScript projects.
//!
//! Provides `tsbuild build` for compiling targets once, `tsbuild watch` for
//! rebuilding a target as its sources change, and `tsbuild resolve` for
//! inspecting the options a target resolves to.

#![warn(missing_docs)]

mod build;
mod pipeline;
mod reference;
mod resolve;
mod watch;

use std::process;

use clap::{Parser, Subcommand};

/// tsbuild: drive the TypeScript compiler from a `tsbuild.toml`.
#[derive(Parser, Debug)]
#[command(name = "tsbuild", version, about = "TypeScript build driver")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `tsbuild.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile targets once.
    Build(BuildArgs),
    /// Compile a target, then recompile on every change.
    Watch(WatchArgs),
    /// Print the resolved options of targets as JSON.
    Resolve(ResolveArgs),
}

/// Arguments for the `tsbuild build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Targets to build. Builds every target when omitted.
    pub targets: Vec<String>,
}

/// Arguments for the `tsbuild watch` subcommand.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Target to watch.
    pub target: String,

    /// Polling interval in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub interval: u64,
}

/// Arguments for the `tsbuild resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Targets to resolve. Resolves every target when omitted.
    pub targets: Vec<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    pipeline::init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Watch(ref args) => watch::run(args, &global),
        Command::Resolve(ref args) => resolve::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
