// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::Simulator;

/// Pattern used when no target patterns are given on the command line.
pub const MATCH_ALL: &str = ".*";

/// Command-line arguments for `simbatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "simbatch",
    version,
    about = "Batch testbench execution: discover, run and report HDL simulations.",
    long_about = None
)]
pub struct CliArgs {
    /// Base directory that is scanned for testbenches.
    ///
    /// Default: the current working directory.
    #[arg(long, global = true, value_name = "PATH", default_value = ".")]
    pub basedir: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SIMBATCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub action: Action,
}

/// What to do with the selected targets.
#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Run the selected testbenches and print a results table.
    ///
    /// Exit code is the number of failing testbenches.
    Run(RunArgs),
    /// Print the names of the selected testbenches.
    List(ListArgs),
    /// Run `cleanall` in every selected testbench directory.
    Cleanup(CleanupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Simulator name.
    #[arg(long, value_enum, default_value_t = Simulator::Xsim)]
    pub simulator: Simulator,

    /// Optional environment setup script sourced before each testbench.
    #[arg(long, value_name = "SCRIPT")]
    pub setupenv: Option<PathBuf>,

    /// Number of parallel simulations to run.
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Build tool invoked in each testbench directory.
    #[arg(long, value_name = "CMD", default_value = "make")]
    pub build_tool: String,

    /// Space separated simulation target regexes (prefix-matched).
    #[arg(value_name = "PATTERN", default_value = MATCH_ALL)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Space separated simulation target regexes (prefix-matched).
    #[arg(value_name = "PATTERN", default_value = MATCH_ALL)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CleanupArgs {
    /// Optional environment setup script sourced before each cleanup.
    #[arg(long, value_name = "SCRIPT")]
    pub setupenv: Option<PathBuf>,

    /// Build tool invoked in each testbench directory.
    #[arg(long, value_name = "CMD", default_value = "make")]
    pub build_tool: String,

    /// Space separated simulation target regexes (prefix-matched).
    #[arg(value_name = "PATTERN", default_value = MATCH_ALL)]
    pub patterns: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
