//! sysreportctl - collect a system report and, with your agreement, send it

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sysreport_common::ReportConfig;
use sysreportctl::cli::Cli;
use sysreportctl::commands::SendProgress;
use sysreportctl::{commands, errors, logging};
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::from(errors::EXIT_SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(errors::exit_code(&e) as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;

    let mut config = ReportConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.url = url;
    }
    if let Some(root) = cli.root {
        config.root = root;
    }

    let command = cli.command.unwrap_or_default();
    debug!(?command, "Running");

    let progress = SendProgress::default();
    let task_progress = progress.clone();

    // Blocking HTTP and stdin stay off the async workers
    let task =
        tokio::task::spawn_blocking(move || commands::run(command, &config, task_progress));

    tokio::select! {
        joined = task => joined.context("command task failed")?,
        Ok(()) = tokio::signal::ctrl_c() => {
            let in_flight = progress.in_flight();
            eprintln!();
            if in_flight {
                warn!("Interrupted during upload");
                eprintln!(
                    "Interrupted while sending: the report is stored but may not have been \
                     sent. Run again with --force to send it."
                );
            }
            std::process::exit(errors::interrupt_exit_code(in_flight));
        }
    }
}
