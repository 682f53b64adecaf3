// src/exec/classify.rs

//! Classification of a finished job from its exit code and captured output.
//!
//! The trailer a testbench prints when it finishes looks like:
//!
//! ```text
//! TESTBENCH FINISHED: noc_block_fft_tb
//!  - Time elapsed:   123450 ns
//!  - Tests Expected: 5
//!  - Tests Run:      5
//!  - Tests Passed:   5
//! Result: PASSED
//! ```
//!
//! Anything before the trailer (and after the `Result` line) is ignored.
//! When the output holds several trailers the last complete one wins.

use std::sync::LazyLock;

use regex::bytes::{Captures, Regex};

use super::result::{JobResult, TestbenchSummary};

static TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?-u)TESTBENCH FINISHED:[ \t]*([^\r\n]+)\r?\n",
        r"[ \t]*-[ \t]*Time elapsed:[ \t]*(\d+)[ \t]*ns[^\n]*\n",
        r"[ \t]*-[ \t]*Tests Expected:[ \t]*(\d+)[ \t]*\r?\n",
        r"[ \t]*-[ \t]*Tests Run:[ \t]*(\d+)[ \t]*\r?\n",
        r"[ \t]*-[ \t]*Tests Passed:[ \t]*(\d+)[ \t]*\r?\n",
        r"Result:[ \t]*(PASSED|FAILED)",
    ))
    .expect("static trailer regex is valid")
});

/// Classify a process that ran to completion.
///
/// A non-zero `exit_code` always yields [`JobResult::ExecError`] with the
/// absolute code, whatever the output says.
pub fn classify_output(exit_code: i32, output: Vec<u8>) -> JobResult {
    if exit_code != 0 {
        return JobResult::ExecError {
            code: exit_code.saturating_abs(),
            output,
        };
    }

    match parse_trailer(&output) {
        Some(fields) => JobResult::Parsed(TestbenchSummary {
            module: fields.module,
            elapsed_ns: fields.elapsed_ns,
            expected: fields.expected,
            run: fields.run,
            passed_count: fields.passed_count,
            overall_passed: fields.overall_passed,
            output,
        }),
        None => JobResult::ParseError { output },
    }
}

/// Fields of the last trailer found in `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerFields {
    pub module: String,
    pub elapsed_ns: i64,
    pub expected: u64,
    pub run: u64,
    pub passed_count: u64,
    pub overall_passed: bool,
}

/// Find and decode the last complete trailer. Returns `None` if no trailer
/// has a module name and counters that fit their types.
pub fn parse_trailer(output: &[u8]) -> Option<TrailerFields> {
    let matches: Vec<_> = TRAILER.captures_iter(output).collect();
    matches.iter().rev().find_map(decode_trailer)
}

fn decode_trailer(caps: &Captures<'_>) -> Option<TrailerFields> {
    let module = String::from_utf8_lossy(&caps[1]).trim().to_string();
    if module.is_empty() {
        return None;
    }

    Some(TrailerFields {
        module,
        elapsed_ns: number(caps, 2)?,
        expected: number(caps, 3)?,
        run: number(caps, 4)?,
        passed_count: number(caps, 5)?,
        overall_passed: &caps[6] == b"PASSED",
    })
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    std::str::from_utf8(caps.get(group)?.as_bytes())
        .ok()?
        .parse()
        .ok()
}
