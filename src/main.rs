//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `cdn_cache_status` library that handles argument
//! parsing, logger initialization and the final summary. Replay output goes to
//! stdout; logs and the summary go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use cdn_cache_status::initialization::init_logger_with;
use cdn_cache_status::{run_replay, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_replay(config).await {
        Ok(report) => {
            eprintln!(
                "Replayed {} event{} ({} malformed, {} update{} pushed); {} tab{} with data",
                report.events,
                if report.events == 1 { "" } else { "s" },
                report.malformed,
                report.pushes,
                if report.pushes == 1 { "" } else { "s" },
                report.sessions,
                if report.sessions == 1 { "" } else { "s" }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("cdn_cache_status error: {:#}", e);
            process::exit(1);
        }
    }
}
