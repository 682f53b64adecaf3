// src/main.rs

use simbatch::{cli, logging, run};

/// Highest status a process can portably report.
const MAX_EXIT_CODE: i32 = 255;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code.clamp(0, MAX_EXIT_CODE)),
        Err(err) => {
            eprintln!("simbatch error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
