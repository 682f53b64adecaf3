// src/engine/aggregate.rs

//! Result collection for a run.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::exec::JobResult;
use crate::types::TargetName;

use super::pool::JobReport;
use super::progress::ProgressReporter;

/// Default interval between progress lines.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Results of a run, keyed by target name.
///
/// A target enqueued more than once keeps one entry per job, in arrival
/// order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    results: BTreeMap<TargetName, Vec<JobResult>>,
    expected: usize,
    received: usize,
}

impl RunReport {
    pub fn new(expected: usize) -> Self {
        Self {
            results: BTreeMap::new(),
            expected,
            received: 0,
        }
    }

    pub fn record(&mut self, name: TargetName, result: JobResult) {
        self.results.entry(name).or_default().push(result);
        self.received += 1;
    }

    /// Number of results recorded.
    pub fn len(&self) -> usize {
        self.received
    }

    pub fn is_empty(&self) -> bool {
        self.received == 0
    }

    /// Jobs that never reported a result.
    pub fn missing(&self) -> usize {
        self.expected.saturating_sub(self.received)
    }

    /// All results recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&[JobResult]> {
        self.results.get(name).map(Vec::as_slice)
    }

    /// Distinct target names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Every result, sorted by name (stable within a name).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobResult)> {
        self.results
            .iter()
            .flat_map(|(name, list)| list.iter().map(move |r| (name.as_str(), r)))
    }

    /// Results whose effective pass flag is false, plus missing results.
    pub fn failures(&self) -> usize {
        self.iter().filter(|(_, r)| !r.passed()).count() + self.missing()
    }

    /// Process exit status for this run: the failure count.
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.failures()).unwrap_or(i32::MAX)
    }
}

/// How draining ended.
#[derive(Debug)]
pub enum DrainOutcome {
    /// Every expected result arrived (or the sink closed early).
    Completed(RunReport),
    /// The operator interrupted the run; holds what arrived so far.
    Aborted(RunReport),
}

impl DrainOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            DrainOutcome::Completed(r) | DrainOutcome::Aborted(r) => r,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, DrainOutcome::Aborted(_))
    }
}

/// Drains the result sink into a [`RunReport`].
#[derive(Debug)]
pub struct ResultAggregator<W: Write> {
    results: mpsc::UnboundedReceiver<JobReport>,
    expected: usize,
    progress: ProgressReporter<W>,
    interval: Duration,
}

impl<W: Write> ResultAggregator<W> {
    pub fn new(
        results: mpsc::UnboundedReceiver<JobReport>,
        expected: usize,
        progress: ProgressReporter<W>,
    ) -> Self {
        Self {
            results,
            expected,
            progress,
            interval: PROGRESS_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wait until `expected` results have arrived, printing progress on
    /// every tick. Returns early with [`DrainOutcome::Aborted`] as soon as
    /// `cancel` fires.
    pub async fn drain(mut self, cancel: &CancellationToken) -> DrainOutcome {
        let mut report = RunReport::new(self.expected);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while report.len() < self.expected {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.progress.finish();
                    info!(
                        completed = report.len(),
                        total = self.expected,
                        "Received SIGINT. Aborting..."
                    );
                    return DrainOutcome::Aborted(report);
                }
                msg = self.results.recv() => match msg {
                    Some((name, result)) => {
                        debug!(target = %name, status = %result.status(), "result received");
                        report.record(name, result);
                    }
                    None => {
                        error!(
                            missing = report.missing(),
                            "result sink closed before every job reported"
                        );
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.progress.update(report.len(), self.expected);
                }
            }
        }

        if self.expected > 0 {
            self.progress.update(report.len(), self.expected);
        }
        self.progress.finish();
        DrainOutcome::Completed(report)
    }
}
