// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] builds the per-target shell invocation (`ExecConfig`).
//! - [`backend`] provides the `JobExecutor` trait and the production
//!   `MakeExecutor`.
//! - [`classify`] turns an exit code plus captured output into a result.
//! - [`result`] defines `JobResult`.
//! - [`cleanup`] runs the cleanup action over targets sequentially.

pub mod backend;
pub mod classify;
pub mod cleanup;
pub mod command;
pub mod result;

pub use backend::{JobExecutor, JobFuture, MakeExecutor};
pub use classify::{TrailerFields, classify_output, parse_trailer};
pub use cleanup::run_cleanup;
pub use command::ExecConfig;
pub use result::{JobResult, ResultStatus, TestbenchSummary};
