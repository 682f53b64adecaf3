// src/engine/cancel.rs

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Exit status used when the operator interrupts a run.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Turns Ctrl-C (SIGINT) into cancellation of a shared token.
///
/// Installing the listener replaces the default SIGINT behaviour for the
/// rest of the process, so a second interrupt exits explicitly.
///
/// The drain loop and every worker hold clones of [`token`]; cancelling it
/// aborts jobs in flight and abandons the rest of the queue.
///
/// [`token`]: CancellationController::token
#[derive(Debug, Clone, Default)]
pub struct CancellationController {
    token: CancellationToken,
}

impl CancellationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawn a listener that cancels the token on the first Ctrl-C and
    /// exits the process with [`INTERRUPTED_EXIT_CODE`] on the second.
    ///
    /// The listener also exits quietly if the token is cancelled elsewhere.
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        error!(error = %e, "failed to listen for Ctrl+C");
                        return;
                    }
                    warn!("Ctrl-C received; cancelling run (press again to exit now)");
                    token.cancel();
                }
                _ = token.cancelled() => return,
            }

            if tokio::signal::ctrl_c().await.is_ok() {
                error!("second Ctrl-C received; exiting");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
    }
}
