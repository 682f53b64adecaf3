// src/engine/pool.rs

//! Fixed-size worker pool draining a [`JobQueue`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::exec::{JobExecutor, JobResult};
use crate::types::TargetName;

use super::queue::{Job, JobQueue};

/// What a worker publishes for each job it takes off the queue.
pub type JobReport = (TargetName, JobResult);

/// Number of workers worth starting for `jobs` jobs.
pub fn effective_worker_count(threads: usize, jobs: usize) -> usize {
    threads.max(1).min(jobs)
}

/// Handles to the running workers.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `worker_count` workers.
    ///
    /// Each worker repeatedly takes one job from `queue`, runs it to
    /// completion on `executor` and sends the result to `results`. Workers are
    /// interchangeable and never run two jobs at once.
    ///
    /// Once `cancel` fires, the job in flight resolves to
    /// [`JobResult::Aborted`] and workers stop executing: anything still
    /// queued is reported as `Aborted` without being run.
    pub fn spawn(
        queue: JobQueue,
        executor: Arc<dyn JobExecutor>,
        worker_count: usize,
        cancel: CancellationToken,
        results: mpsc::UnboundedSender<JobReport>,
    ) -> Self {
        info!("Starting {worker_count} job(s) to process queue...");

        let workers = (0..worker_count)
            .map(|worker_id| {
                let worker = Worker {
                    id: worker_id,
                    queue: queue.clone(),
                    executor: Arc::clone(&executor),
                    cancel: cancel.clone(),
                    results: results.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self { workers }
    }

    /// Wait for every worker to exit.
    pub async fn join(self) {
        for handle in self.workers {
            if let Err(err) = handle.await {
                warn!(error = %err, "worker task ended abnormally");
            }
        }
    }
}

struct Worker {
    id: usize,
    queue: JobQueue,
    executor: Arc<dyn JobExecutor>,
    cancel: CancellationToken,
    results: mpsc::UnboundedSender<JobReport>,
}

impl Worker {
    async fn run(self) {
        debug!(worker = self.id, "worker started");

        while let Some(job) = self.next_job().await {
            let name = job.target.name.clone();
            let result = if self.cancel.is_cancelled() {
                JobResult::Aborted
            } else {
                self.execute(job).await
            };

            if self.results.send((name, result)).is_err() {
                debug!(worker = self.id, "result sink closed; worker stopping");
                break;
            }
        }

        debug!(worker = self.id, "worker finished");
    }

    /// Next job to report on. After cancellation only already-queued jobs
    /// are returned, so an open queue cannot keep the worker alive.
    async fn next_job(&self) -> Option<Job> {
        if self.cancel.is_cancelled() {
            return self.queue.try_next().await;
        }
        tokio::select! {
            job = self.queue.next() => job,
            _ = self.cancel.cancelled() => self.queue.try_next().await,
        }
    }

    async fn execute(&self, job: Job) -> JobResult {
        let name = job.target.name.clone();
        let span = info_span!("job", target = %name, worker = self.id);
        let executor = Arc::clone(&self.executor);

        // Run on its own task so a panicking executor still yields a result
        // and aborting the task drops (and kills) the child process.
        let mut handle = tokio::spawn(
            async move {
                info!("Running simulation");
                let result = executor.execute(&job.target).await;
                info!(status = %result.status(), "DONE");
                result
            }
            .instrument(span),
        );

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!(target = %name, worker = self.id, "received interrupt; aborting job");
                handle.abort();
                JobResult::Aborted
            }
            joined = &mut handle => match joined {
                Ok(result) => result,
                Err(err) => {
                    warn!(target = %name, worker = self.id, error = %err, "job task failed");
                    JobResult::UnknownError {
                        message: format!("job task failed: {err}"),
                    }
                }
            },
        }
    }
}
