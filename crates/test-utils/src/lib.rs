pub mod builders;
pub mod fake_executor;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Canonical trailer text as printed by a finished testbench.
pub fn trailer(module: &str, expected: u64, run: u64, passed: u64, result_passed: bool) -> String {
    format!(
        "TESTBENCH FINISHED: {module}\n\
         \x20- Time elapsed:   12345 ns\n\
         \x20- Tests Expected: {expected}\n\
         \x20- Tests Run:      {run}\n\
         \x20- Tests Passed:   {passed}\n\
         Result: {}\n",
        if result_passed { "PASSED" } else { "FAILED" }
    )
}
