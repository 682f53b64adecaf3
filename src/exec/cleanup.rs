// src/exec/cleanup.rs

//! Sequential `cleanall` over selected targets.

use std::process::Stdio;

use tracing::{info, warn};

use crate::discovery::Target;
use crate::errors::{Result, SimbatchError};

use super::command::{CLEANUP_ACTION, ExecConfig};

/// Run the cleanup action in each target directory, one at a time.
///
/// The toolchain precondition is checked once up front. Individual cleanup
/// failures are logged and do not stop the remaining targets. Returns the
/// number of targets whose cleanup failed.
pub async fn run_cleanup(config: &ExecConfig, targets: &[Target]) -> Result<usize> {
    config
        .check_environment()
        .map_err(SimbatchError::EnvUninitialized)?;

    let mut failed = 0;
    for target in targets {
        info!("Cleaning up {}", target.name);

        let mut cmd = match config.command(target, CLEANUP_ACTION) {
            Ok(cmd) => cmd,
            Err(err) => {
                failed += 1;
                warn!(target = %target.name, error = %err, "failed to prepare cleanup");
                continue;
            }
        };
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        match cmd.status().await {
            Ok(status) if status.success() => {}
            Ok(status) => {
                failed += 1;
                warn!(target = %target.name, %status, "cleanup exited unsuccessfully");
            }
            Err(err) => {
                failed += 1;
                warn!(target = %target.name, error = %err, "failed to spawn cleanup");
            }
        }
    }

    Ok(failed)
}
