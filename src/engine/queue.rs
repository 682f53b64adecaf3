// src/engine/queue.rs

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::discovery::Target;

/// One scheduled execution of a target.
///
/// A target selected by several patterns becomes several jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub target: Target,
}

impl Job {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

/// Shared FIFO of jobs, drained by the worker pool.
///
/// Cloning is cheap and every clone pops from the same queue. `next` waits
/// while the queue is empty and returns `None` once it is empty *and* every
/// [`JobSender`] has been dropped.
#[derive(Debug, Clone)]
pub struct JobQueue {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>,
}

/// Producer side of a [`JobQueue`].
#[derive(Debug, Clone)]
pub struct JobSender {
    tx: mpsc::UnboundedSender<Job>,
}

impl JobSender {
    /// Enqueue a job. Returns `false` if the queue is gone.
    pub fn push(&self, job: Job) -> bool {
        self.tx.send(job).is_ok()
    }
}

impl JobQueue {
    /// Create an open queue; it closes when all senders are dropped.
    pub fn channel() -> (JobSender, JobQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            JobSender { tx },
            JobQueue {
                rx: Arc::new(Mutex::new(rx)),
            },
        )
    }

    /// Create a closed queue pre-filled with `jobs`, in order.
    pub fn from_jobs(jobs: impl IntoIterator<Item = Job>) -> JobQueue {
        let (sender, queue) = Self::channel();
        let mut count = 0usize;
        for job in jobs {
            sender.push(job);
            count += 1;
        }
        debug!(jobs = count, "job queue filled");
        queue
    }

    /// Pop the next job, waiting if the queue is empty but still open.
    pub async fn next(&self) -> Option<Job> {
        self.rx.lock().await.recv().await
    }

    /// Pop the next job only if one is already queued.
    pub async fn try_next(&self) -> Option<Job> {
        self.rx.lock().await.try_recv().ok()
    }
}
