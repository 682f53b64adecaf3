// src/engine/mod.rs

//! Concurrent execution engine.
//!
//! This module ties together:
//! - the shared job queue ([`queue`])
//! - the fixed-size worker pool ([`pool`])
//! - result collection and the periodic progress line ([`aggregate`],
//!   [`progress`])
//! - interrupt handling ([`cancel`])
//! - the final results printout ([`report`])
//!
//! [`run_jobs`] is the single entry point that wires them for one run.

pub mod aggregate;
pub mod cancel;
pub mod pool;
pub mod progress;
pub mod queue;
pub mod report;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::discovery::Target;
use crate::exec::JobExecutor;

pub use aggregate::{DrainOutcome, PROGRESS_INTERVAL, ResultAggregator, RunReport};
pub use cancel::{CancellationController, INTERRUPTED_EXIT_CODE};
pub use pool::{JobReport, WorkerPool, effective_worker_count};
pub use progress::ProgressReporter;
pub use queue::{Job, JobQueue, JobSender};
pub use report::{result_line, write_report};

/// How long workers get to wind down after an interrupt.
const ABORT_GRACE: Duration = Duration::from_secs(2);

/// Options for a single run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Upper bound on concurrent jobs.
    pub threads: usize,
    /// Interval between progress lines.
    pub progress_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            threads: 4,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

/// Run one job per entry of `targets` and collect the results.
///
/// Workers are started as `min(threads, targets.len())`. The call returns
/// when every job has reported, or promptly after `cancel` fires.
pub async fn run_jobs<W: Write>(
    targets: Vec<Target>,
    executor: Arc<dyn JobExecutor>,
    options: RunOptions,
    cancel: CancellationToken,
    progress: ProgressReporter<W>,
) -> DrainOutcome {
    let total = targets.len();
    let worker_count = effective_worker_count(options.threads, total);

    let queue = JobQueue::from_jobs(targets.into_iter().map(Job::new));
    let (results_tx, results_rx) = mpsc::unbounded_channel();
    let pool = WorkerPool::spawn(queue, executor, worker_count, cancel.clone(), results_tx);

    let outcome = ResultAggregator::new(results_rx, total, progress)
        .with_interval(options.progress_interval)
        .drain(&cancel)
        .await;

    if outcome.is_aborted() {
        if tokio::time::timeout(ABORT_GRACE, pool.join()).await.is_err() {
            warn!("workers did not stop within the grace period");
        }
    } else {
        pool.join().await;
    }

    info!(
        results = outcome.report().len(),
        failures = outcome.report().failures(),
        "run finished"
    );
    outcome
}
