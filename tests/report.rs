// tests/report.rs

use std::time::Duration;

use clap::Parser;
use simbatch::cli::{Action, CliArgs, LogLevel};
use simbatch::engine::progress::{format_elapsed, progress_line};
use simbatch::engine::{RunReport, result_line, write_report};
use simbatch::exec::{JobResult, TestbenchSummary};
use simbatch::logging::resolve_level;
use simbatch::types::Simulator;

fn parsed(passed: bool, output: &str) -> JobResult {
    JobResult::Parsed(TestbenchSummary {
        module: "tb".to_string(),
        elapsed_ns: 10,
        expected: 4,
        run: 4,
        passed_count: if passed { 4 } else { 3 },
        overall_passed: passed,
        output: output.as_bytes().to_vec(),
    })
}

#[test]
fn result_lines_show_counters_or_status() {
    assert_eq!(
        result_line("a/tb", &parsed(true, "")),
        "* PASS : a/tb (Expected=4, Run=4, Passed=4)"
    );
    assert_eq!(
        result_line("a/tb", &parsed(false, "")),
        "* FAIL : a/tb (Expected=4, Run=4, Passed=3)"
    );
    assert_eq!(
        result_line("b/tb", &JobResult::ExecError { code: 2, output: Vec::new() }),
        "* FAIL : b/tb (Status=ExecError(2))"
    );
    assert_eq!(
        result_line("c/tb", &JobResult::ParseError { output: Vec::new() }),
        "* FAIL : c/tb (Status=ParseError)"
    );
    assert_eq!(
        result_line("d/tb", &JobResult::UnknownError { message: "x".into() }),
        "* FAIL : d/tb (Status=UnknownError)"
    );
    assert_eq!(result_line("e/tb", &JobResult::Aborted), "* FAIL : e/tb (Status=Aborted)");
}

#[test]
fn report_is_sorted_and_includes_raw_output() {
    let mut report = RunReport::new(3);
    report.record("b/tb".into(), JobResult::ExecError { code: 1, output: b"b failed".to_vec() });
    report.record("a/tb".into(), parsed(true, "a output\n"));
    report.record("a/tb".into(), JobResult::Aborted);

    let mut buf = Vec::new();
    write_report(&report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let a_out = text.find("a output").unwrap();
    let aborted = text.find("Aborted by user").unwrap();
    let b_out = text.find("b failed").unwrap();
    let results = text.find("RESULTS").unwrap();
    assert!(a_out < aborted && aborted < b_out && b_out < results, "{text}");

    let table: Vec<&str> = text[results..].lines().filter(|l| l.starts_with("* ")).collect();
    assert_eq!(
        table,
        vec![
            "* PASS : a/tb (Expected=4, Run=4, Passed=4)",
            "* FAIL : a/tb (Status=Aborted)",
            "* FAIL : b/tb (Status=ExecError(1))",
        ]
    );
    assert_eq!(report.failures(), 2);
    assert_eq!(report.exit_code(), 2);
}

#[test]
fn header_block_is_framed() {
    let report = RunReport::new(0);
    let mut buf = Vec::new();
    write_report(&report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].trim(), "RESULTS");
    assert_eq!(lines[0].len(), lines[1].len());
    assert!(lines[0].chars().all(|c| c == '#'));
    assert_eq!(lines[1].len(), 29);
}

#[test]
fn missing_results_count_as_failures() {
    let mut report = RunReport::new(3);
    report.record("a/tb".into(), parsed(true, ""));
    assert_eq!(report.missing(), 2);
    assert_eq!(report.exit_code(), 2);
}

#[test]
fn progress_line_format() {
    assert_eq!(format_elapsed(Duration::from_millis(999)), "0:00:00");
    assert_eq!(format_elapsed(Duration::from_secs(3723)), "1:02:03");
    assert_eq!(
        progress_line(Duration::from_secs(65), 3, 10),
        ">>> [0:01:05] (3/10 simulations completed) <<<"
    );
}

#[test]
fn cli_defaults_for_run() {
    let args = CliArgs::try_parse_from(["simbatch", "run"]).unwrap();
    let Action::Run(run) = args.action else {
        panic!("expected run action");
    };
    assert_eq!(run.simulator, Simulator::Xsim);
    assert_eq!(run.threads, 4);
    assert_eq!(run.build_tool, "make");
    assert!(run.setupenv.is_none());
    assert_eq!(run.patterns, vec![".*".to_string()]);
    assert_eq!(args.basedir, std::path::PathBuf::from("."));
}

#[test]
fn cli_parses_run_flags_and_patterns() {
    let args = CliArgs::try_parse_from([
        "simbatch",
        "run",
        "--basedir",
        "/src/usrp3",
        "--simulator",
        "vsim",
        "--threads",
        "8",
        "--setupenv",
        "setup.sh",
        "lib/fifo",
        "lib/axi",
    ])
    .unwrap();

    assert_eq!(args.basedir, std::path::PathBuf::from("/src/usrp3"));
    let Action::Run(run) = args.action else {
        panic!("expected run action");
    };
    assert_eq!(run.simulator, Simulator::Vsim);
    assert_eq!(run.threads, 8);
    assert_eq!(run.setupenv, Some(std::path::PathBuf::from("setup.sh")));
    assert_eq!(run.patterns, vec!["lib/fifo".to_string(), "lib/axi".to_string()]);
}

#[test]
fn cli_rejects_unknown_simulator() {
    assert!(CliArgs::try_parse_from(["simbatch", "run", "--simulator", "iverilog"]).is_err());
}

#[test]
fn cli_list_and_cleanup() {
    let args = CliArgs::try_parse_from(["simbatch", "list", "a", "b"]).unwrap();
    assert!(matches!(args.action, Action::List(ref l) if l.patterns == ["a", "b"]));

    let args = CliArgs::try_parse_from(["simbatch", "cleanup", "--setupenv", "env.sh"]).unwrap();
    assert!(matches!(args.action, Action::Cleanup(ref c) if c.setupenv.is_some()));
}

#[test]
fn log_level_priority() {
    assert_eq!(resolve_level(Some(LogLevel::Debug), Some("error")), tracing::Level::DEBUG);
    assert_eq!(resolve_level(None, Some("warning")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("nonsense")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}

#[test]
fn simulator_names() {
    assert_eq!(Simulator::Vsim.to_string(), "vsim");
    assert_eq!(Simulator::default(), Simulator::Xsim);

    let args = CliArgs::try_parse_from(["simbatch", "run", "--simulator", "vsim"]).unwrap();
    assert!(matches!(args.action, Action::Run(ref r) if r.simulator == Simulator::Vsim));
    assert!(CliArgs::try_parse_from(["simbatch", "run", "--simulator", "ghdl"]).is_err());
}
