// src/exec/result.rs

//! Typed outcome of a single job.

use std::fmt;

/// Counters parsed from a testbench trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestbenchSummary {
    pub module: String,
    pub elapsed_ns: i64,
    pub expected: u64,
    pub run: u64,
    pub passed_count: u64,
    /// Taken from the `Result: PASSED|FAILED` line only.
    pub overall_passed: bool,
    pub output: Vec<u8>,
}

/// Outcome of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    /// Exit status 0 and a recognised trailer.
    Parsed(TestbenchSummary),
    /// Exit status 0 but no trailer in the output.
    ParseError { output: Vec<u8> },
    /// Non-zero exit status (absolute value).
    ExecError { code: i32, output: Vec<u8> },
    /// The job could not be started, or failed outside the process.
    UnknownError { message: String },
    /// Cancelled by an operator interrupt.
    Aborted,
}

impl JobResult {
    /// Effective pass flag; only a parsed `Result: PASSED` counts.
    pub fn passed(&self) -> bool {
        matches!(self, JobResult::Parsed(s) if s.overall_passed)
    }

    /// Parsed counters, if the job produced a trailer.
    pub fn summary(&self) -> Option<&TestbenchSummary> {
        match self {
            JobResult::Parsed(s) => Some(s),
            _ => None,
        }
    }

    /// Captured output, or a short description for results without any.
    pub fn raw_output(&self) -> &[u8] {
        match self {
            JobResult::Parsed(s) => &s.output,
            JobResult::ParseError { output } | JobResult::ExecError { output, .. } => output,
            JobResult::UnknownError { message } => message.as_bytes(),
            JobResult::Aborted => b"Aborted by user",
        }
    }

    /// Status label used in the results table.
    pub fn status(&self) -> ResultStatus {
        match self {
            JobResult::Parsed(_) => ResultStatus::Success,
            JobResult::ParseError { .. } => ResultStatus::ParseError,
            JobResult::ExecError { code, .. } => ResultStatus::ExecError(*code),
            JobResult::UnknownError { .. } => ResultStatus::UnknownError,
            JobResult::Aborted => ResultStatus::Aborted,
        }
    }
}

/// Failure kind of a [`JobResult`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    ParseError,
    ExecError(i32),
    UnknownError,
    Aborted,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Success => f.write_str("Success"),
            ResultStatus::ParseError => f.write_str("ParseError"),
            ResultStatus::ExecError(code) => write!(f, "ExecError({code})"),
            ResultStatus::UnknownError => f.write_str("UnknownError"),
            ResultStatus::Aborted => f.write_str("Aborted"),
        }
    }
}
