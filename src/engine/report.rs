// src/engine/report.rs

//! Final results printout.

use std::io::{self, Write};

use crate::exec::JobResult;

use super::aggregate::RunReport;

/// Write the full report: every job's output under a header, then the
/// `RESULTS` table.
pub fn write_report<W: Write>(report: &RunReport, out: &mut W) -> io::Result<()> {
    for (name, result) in report.iter() {
        write_header(out, name, 0, '#')?;
        out.write_all(result.raw_output())?;
        if !result.raw_output().ends_with(b"\n") {
            writeln!(out)?;
        }
    }

    write_header(out, "RESULTS", 30, '#')?;
    for (name, result) in report.iter() {
        writeln!(out, "{}", result_line(name, result))?;
    }
    if report.missing() > 0 {
        writeln!(out, "* FAIL : {} job(s) never reported", report.missing())?;
    }
    out.flush()
}

/// One row of the results table.
pub fn result_line(name: &str, result: &JobResult) -> String {
    let verdict = if result.passed() { "PASS" } else { "FAIL" };
    match result.summary() {
        Some(s) => format!(
            "* {verdict} : {name} (Expected={}, Run={}, Passed={})",
            s.expected, s.run, s.passed_count
        ),
        None => format!("* {verdict} : {name} (Status={})", result.status()),
    }
}

/// Text centred between two rules of `ch`, padded to at least `min_len`.
fn write_header<W: Write>(out: &mut W, what: &str, min_len: usize, ch: char) -> io::Result<()> {
    let pad = (min_len.saturating_sub(what.len()) / 2).max(1);
    let text = format!("{0}{what}{0}", " ".repeat(pad));
    let rule: String = std::iter::repeat_n(ch, text.len()).collect();
    writeln!(out, "{rule}")?;
    writeln!(out, "{text}")?;
    writeln!(out, "{rule}")
}
