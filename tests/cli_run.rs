// tests/cli_run.rs
//
// End-to-end runs through `simbatch::run`, the same entry point `main` uses.

#![cfg(unix)]

use std::error::Error;
use std::time::{Duration, Instant};

use clap::Parser;
use simbatch::cli::{Action, CliArgs};
use simbatch::engine::INTERRUPTED_EXIT_CODE;
use simbatch::errors::SimbatchError;
use simbatch_test_utils::builders::{TestbenchTree, TestbenchTreeBuilder};
use simbatch_test_utils::{init_tracing, trailer, with_timeout};
use tokio_util::sync::CancellationToken;

type TestResult = Result<(), Box<dyn Error>>;

fn args(tree: &TestbenchTree, action: &str, extra: &[&str]) -> CliArgs {
    let root = tree.canonical_root();
    let tool = format!("sh '{}'", root.join("fake_tool.sh").display());
    let setup = root.join("setup.sh");

    let mut argv = vec![
        "simbatch".to_string(),
        action.to_string(),
        "--basedir".to_string(),
        root.display().to_string(),
    ];
    if action != "list" {
        argv.extend([
            "--build-tool".to_string(),
            tool,
            "--setupenv".to_string(),
            setup.display().to_string(),
        ]);
    }
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(argv).expect("valid arguments")
}

fn two_testbench_tree(b_exit: i32) -> anyhow::Result<TestbenchTree> {
    let builder = TestbenchTreeBuilder::new()?
        .file(".", "setup.sh", "true\n")?
        .testbench("a/tb")?
        .output("a/tb", &trailer("a_tb", 1, 1, 1, true))?
        .testbench("b/tb")?;
    let builder = if b_exit == 0 {
        builder.output("b/tb", &trailer("b_tb", 1, 1, 1, true))?
    } else {
        builder.exit_code("b/tb", b_exit)?
    };
    Ok(builder.build())
}

#[tokio::test]
async fn run_all_passing_exits_zero() -> TestResult {
    init_tracing();
    let tree = two_testbench_tree(0)?;
    let code = with_timeout(simbatch::run(args(&tree, "run", &["--threads", "2", ".*"]))).await?;
    assert_eq!(code, 0);
    assert!(tree.marker("a/tb", "xsim").is_some());
    assert!(tree.marker("b/tb", "xsim").is_some());
    Ok(())
}

#[tokio::test]
async fn run_exit_code_counts_failures() -> TestResult {
    init_tracing();
    let tree = two_testbench_tree(2)?;
    let code = with_timeout(simbatch::run(args(&tree, "run", &["--threads", "2"]))).await?;
    assert_eq!(code, 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_patterns_run_the_job_twice() -> TestResult {
    init_tracing();
    let tree = two_testbench_tree(2)?;
    // b/tb fails and is selected by both patterns.
    let code = with_timeout(simbatch::run(args(&tree, "run", &["b", ".*"]))).await?;
    assert_eq!(code, 2);
    Ok(())
}

#[tokio::test]
async fn run_with_no_matches_succeeds() -> TestResult {
    let tree = two_testbench_tree(2)?;
    let code = with_timeout(simbatch::run(args(&tree, "run", &["nothing/here"]))).await?;
    assert_eq!(code, 0);
    assert!(tree.marker("a/tb", "xsim").is_none());
    Ok(())
}

#[tokio::test]
async fn list_and_cleanup_exit_zero() -> TestResult {
    let tree = two_testbench_tree(2)?;
    assert_eq!(simbatch::run(args(&tree, "list", &[])).await?, 0);
    assert!(tree.marker("a/tb", "xsim").is_none());

    assert_eq!(simbatch::run(args(&tree, "cleanup", &["a"])).await?, 0);
    assert!(tree.marker("a/tb", "cleanall").is_some());
    assert!(tree.marker("b/tb", "cleanall").is_none());
    Ok(())
}

#[tokio::test]
async fn interrupted_run_exits_with_interrupt_status() -> TestResult {
    init_tracing();
    let tree = TestbenchTreeBuilder::new()?
        .file(".", "setup.sh", "true\n")?
        .testbench("slow/tb")?
        .sleep("slow/tb", 10)?
        .testbench("zqueued/tb")?
        .build();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let code = with_timeout(simbatch::run_with_cancel(
        args(&tree, "run", &["--threads", "1"]),
        cancel,
    ))
    .await?;

    assert_eq!(code, INTERRUPTED_EXIT_CODE);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(tree.marker("zqueued/tb", "xsim").is_none());
    Ok(())
}

#[tokio::test]
async fn cleanup_with_missing_setup_script_still_exits_zero() -> TestResult {
    let tree = two_testbench_tree(0)?;
    let mut args = args(&tree, "cleanup", &[]);
    if let Action::Cleanup(ref mut cleanup) = args.action {
        cleanup.setupenv = Some(tree.root().join("does_not_exist.sh"));
    }

    assert_eq!(with_timeout(simbatch::run(args)).await?, 0);
    assert!(tree.marker("a/tb", "cleanall").is_none());
    Ok(())
}

#[tokio::test]
async fn invalid_pattern_is_an_error() -> TestResult {
    let tree = two_testbench_tree(0)?;
    match simbatch::run(args(&tree, "list", &["(unclosed"])).await {
        Err(SimbatchError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_basedir_is_an_error() -> TestResult {
    let args = CliArgs::try_parse_from(["simbatch", "list", "--basedir", "/no/such/dir/simbatch"])?;
    assert!(simbatch::run(args).await.is_err());
    Ok(())
}
