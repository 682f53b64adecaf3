// src/exec/command.rs

//! Shell command construction for build-tool invocations.
//!
//! Everything a spawn needs (working directory, environment, script) is set
//! on the individual `Command`; nothing here touches process-wide state.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::discovery::Target;
use crate::types::Simulator;

/// Environment variable that proves the simulation toolchain was set up.
pub const DEFAULT_TOOLCHAIN_MARKER: &str = "VIVADO_PATH";

/// Build tool used when none is configured.
pub const DEFAULT_BUILD_TOOL: &str = "make";

/// Build-tool target that removes simulation artifacts.
pub const CLEANUP_ACTION: &str = "cleanall";

/// Set on every child to the name of the target it runs for.
pub const TARGET_ENV_VAR: &str = "SIMBATCH_TARGET";

/// How jobs are invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    pub simulator: Simulator,
    /// Script sourced (`. script;`) before the build tool runs.
    pub setup_env: Option<PathBuf>,
    /// Program (and leading arguments) run in the target directory.
    pub build_tool: String,
    /// Variable that must be set when there is no setup script.
    pub toolchain_marker: Option<String>,
}

impl ExecConfig {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator,
            setup_env: None,
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            toolchain_marker: Some(DEFAULT_TOOLCHAIN_MARKER.to_string()),
        }
    }

    pub fn with_setup_env(mut self, setup_env: Option<PathBuf>) -> Self {
        self.setup_env = setup_env;
        self
    }

    pub fn with_build_tool(mut self, build_tool: impl Into<String>) -> Self {
        self.build_tool = build_tool.into();
        self
    }

    pub fn with_toolchain_marker(mut self, marker: Option<String>) -> Self {
        self.toolchain_marker = marker;
        self
    }

    /// Check that the toolchain can be expected to work.
    ///
    /// Passes when a setup script is configured, or when the marker variable
    /// is present in this process's environment. Returns the marker name on
    /// failure.
    pub fn check_environment(&self) -> std::result::Result<(), String> {
        if self.setup_env.is_some() {
            return Ok(());
        }
        match &self.toolchain_marker {
            Some(marker) if std::env::var_os(marker).is_none() => Err(marker.clone()),
            _ => Ok(()),
        }
    }

    /// Shell script that runs `<build_tool> <action>` with stderr merged into
    /// stdout, sourcing the setup script first if there is one.
    pub fn shell_script(&self, action: &str) -> Result<String> {
        let prefix = match &self.setup_env {
            Some(script) => {
                let script = std::fs::canonicalize(script)
                    .with_context(|| format!("resolving setup script {:?}", script))?;
                format!(". {}; ", shell_quote(&script))
            }
            None => String::new(),
        };
        Ok(format!("exec 2>&1; {prefix}exec {} {action}", self.build_tool))
    }

    /// Command running `action` for `target`.
    ///
    /// Stdio is left to the caller.
    pub fn command(&self, target: &Target, action: &str) -> Result<Command> {
        let script = self.shell_script(action)?;

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(script)
            .current_dir(&target.path)
            .env(TARGET_ENV_VAR, &target.name)
            .stdin(Stdio::null());
        Ok(cmd)
    }
}

/// Single-quote a path for `sh`.
fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}
