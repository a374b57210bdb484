//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use sysreport_common::ReportMode;

/// Collect a system report and, with your agreement, send it
#[derive(Parser, Debug)]
#[command(name = "sysreportctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the collection server. Overrides config file.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// System root to collect from. Overrides config file.
    #[arg(long, global = true, hide = true)]
    pub root: Option<PathBuf>,

    /// More logging (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand (if not provided, asks interactively)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the report that would be sent
    Show,

    /// Send the report (yes) or an opt-out message (no) without asking
    Send {
        #[arg(value_enum)]
        decision: Decision,

        /// Report again even if this release was already reported
        #[arg(short, long)]
        force: bool,
    },

    /// Show the report and ask before sending
    Interactive {
        /// Report again even if this release was already reported
        #[arg(short, long)]
        force: bool,
    },

    /// Send a report saved to a file
    Upload {
        file: PathBuf,

        /// Report again even if this release was already reported
        #[arg(short, long)]
        force: bool,
    },

    /// Remove the stored report so the next run reports again
    Forget,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Interactive { force: false }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
}

impl Decision {
    pub fn mode(self) -> ReportMode {
        match self {
            Decision::Yes => ReportMode::Auto,
            Decision::No => ReportMode::OptOut,
        }
    }
}
