// src/exec/backend.rs

//! Pluggable job executor abstraction.
//!
//! Workers talk to a [`JobExecutor`] instead of spawning processes directly,
//! so tests can swap in a scripted executor while production uses
//! [`MakeExecutor`].
//!
//! Cancellation is not part of the trait: a worker aborts a job by dropping
//! the future returned from `execute`. [`MakeExecutor`] spawns children with
//! `kill_on_drop(true)`, so dropping the future also kills the process.

use std::future::Future;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::discovery::Target;

use super::classify::classify_output;
use super::command::ExecConfig;
use super::result::JobResult;

/// Boxed future returned by [`JobExecutor::execute`].
pub type JobFuture<'a> = Pin<Box<dyn Future<Output = JobResult> + Send + 'a>>;

/// Trait abstracting how one job is executed.
///
/// Implementations must not touch process-wide state such as the current
/// directory: several jobs run at the same time.
pub trait JobExecutor: Send + Sync {
    /// Run the job for `target` to completion and classify it.
    fn execute<'a>(&'a self, target: &'a Target) -> JobFuture<'a>;
}

/// Runs `<build-tool> <simulator>` through `sh` in the target directory.
#[derive(Debug, Clone)]
pub struct MakeExecutor {
    config: ExecConfig,
}

impl MakeExecutor {
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    async fn run(&self, target: &Target) -> JobResult {
        if let Err(marker) = self.config.check_environment() {
            warn!(target = %target.name, %marker, "simulation environment was uninitialized");
            return JobResult::UnknownError {
                message: format!(
                    "Simulation environment was uninitialized ({marker} is not set)"
                ),
            };
        }

        match self.spawn_and_wait(target).await {
            Ok((status, output)) => {
                let code = exit_code(status);
                debug!(
                    target = %target.name,
                    exit_code = code,
                    bytes = output.len(),
                    "simulation process exited"
                );
                classify_output(code, output)
            }
            Err(err) => {
                warn!(target = %target.name, error = %err, "failed to run simulation");
                JobResult::UnknownError {
                    message: format!("{err:#}"),
                }
            }
        }
    }

    async fn spawn_and_wait(&self, target: &Target) -> anyhow::Result<(ExitStatus, Vec<u8>)> {
        let simulator = self.config.simulator.as_str();
        let mut cmd = self.config.command(target, simulator)?;
        cmd.stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        info!(
            target = %target.name,
            dir = %target.path.display(),
            %simulator,
            "starting simulation process"
        );

        let child = cmd
            .spawn()
            .with_context(|| format!("spawning simulation for target '{}'", target.name))?;
        let output = child
            .wait_with_output()
            .await
            .with_context(|| format!("waiting for simulation of target '{}'", target.name))?;

        Ok((output.status, output.stdout))
    }
}

impl JobExecutor for MakeExecutor {
    fn execute<'a>(&'a self, target: &'a Target) -> JobFuture<'a> {
        Box::pin(self.run(target))
    }
}

/// Exit status as an integer; a signal-terminated process reports the
/// signal number.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return signal;
        }
    }
    -1
}
