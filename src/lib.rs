// src/lib.rs

pub mod cli;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::{Action, CleanupArgs, CliArgs, ListArgs, RunArgs};
use crate::discovery::{Target, discover_targets, select_targets};
use crate::engine::{
    CancellationController, DrainOutcome, INTERRUPTED_EXIT_CODE, ProgressReporter, RunOptions,
    run_jobs, write_report,
};
use crate::errors::Result;
use crate::exec::{ExecConfig, MakeExecutor, run_cleanup};
use crate::fs::RealFileSystem;
use crate::types::Simulator;

/// High-level entry point used by `main.rs`.
///
/// Returns the process exit status:
/// - `list` / `cleanup`: 0
/// - `run`: number of failing jobs, or [`INTERRUPTED_EXIT_CODE`] after Ctrl-C
pub async fn run(args: CliArgs) -> Result<i32> {
    let controller = CancellationController::new();
    let listener = controller.listen_for_ctrl_c();
    let result = run_with_cancel(args, controller.token()).await;
    listener.abort();
    result
}

/// Like [`run`], but interrupted by cancelling `cancel` instead of Ctrl-C.
pub async fn run_with_cancel(args: CliArgs, cancel: CancellationToken) -> Result<i32> {
    let basedir = resolve_basedir(&args.basedir)?;

    match args.action {
        Action::List(list) => do_list(&basedir, list),
        Action::Run(run) => do_run(&basedir, run, cancel).await,
        Action::Cleanup(cleanup) => do_cleanup(&basedir, cleanup).await,
    }
}

/// Discover and select targets under `basedir`.
pub fn find_targets(basedir: &Path, patterns: &[String]) -> Result<Vec<Target>> {
    let targets = discover_targets(&RealFileSystem, basedir);
    info!(
        basedir = %basedir.display(),
        found = targets.len(),
        "testbench discovery finished"
    );
    select_targets(&targets, patterns)
}

fn do_list(basedir: &Path, args: ListArgs) -> Result<i32> {
    for target in find_targets(basedir, &args.patterns)? {
        println!("{}", target.name);
    }
    Ok(0)
}

async fn do_run(basedir: &Path, args: RunArgs, cancel: CancellationToken) -> Result<i32> {
    let targets = find_targets(basedir, &args.patterns)?;

    info!("Queueing the following targets to simulate:");
    for target in &targets {
        info!("* {}", target.name);
    }

    let config = ExecConfig::new(args.simulator)
        .with_setup_env(args.setupenv)
        .with_build_tool(args.build_tool);
    let executor = Arc::new(MakeExecutor::new(config));

    let options = RunOptions {
        threads: args.threads,
        ..RunOptions::default()
    };
    let outcome = run_jobs(
        targets,
        executor,
        options,
        cancel,
        ProgressReporter::new(std::io::stderr()),
    )
    .await;

    match outcome {
        DrainOutcome::Completed(report) => {
            let mut stdout = std::io::stdout().lock();
            write_report(&report, &mut stdout)?;
            Ok(report.exit_code())
        }
        DrainOutcome::Aborted(_) => Ok(INTERRUPTED_EXIT_CODE),
    }
}

async fn do_cleanup(basedir: &Path, args: CleanupArgs) -> Result<i32> {
    let targets = find_targets(basedir, &args.patterns)?;
    // The simulator is irrelevant for cleanup; only the action differs.
    let config = ExecConfig::new(Simulator::default())
        .with_setup_env(args.setupenv)
        .with_build_tool(args.build_tool);

    let failed = run_cleanup(&config, &targets).await?;
    info!(targets = targets.len(), failed, "cleanup finished");
    Ok(0)
}

fn resolve_basedir(basedir: &Path) -> Result<PathBuf> {
    let resolved = std::fs::canonicalize(basedir)
        .with_context(|| format!("resolving base directory {:?}", basedir))?;
    Ok(resolved)
}
