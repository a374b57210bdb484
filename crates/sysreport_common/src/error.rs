//! Error types for sysreport.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a report run.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A report was already written for this cache slot and force was not set
    #[error("a report already exists at {}; use --force to report again", .path.display())]
    DuplicateReport { path: PathBuf },

    #[error("couldn't collect system metrics: {0}")]
    Collection(#[from] CollectError),

    /// The cache file could not be committed. Nothing was uploaded.
    #[error("couldn't write report to {}: {source}", .path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Upload failed after the cache file was committed
    #[error("couldn't send report: {0}")]
    Send(#[from] SendError),

    #[error("couldn't ask for confirmation: {0}")]
    Prompt(#[source] io::Error),

    #[error("report is not valid JSON: {0}")]
    InvalidReport(#[from] serde_json::Error),

    /// A prepared payload that is neither a full report nor the opt-out marker
    #[error("report has no \"Version\" field and is not the opt-out marker")]
    UnexpectedReport,
}

impl ReportError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::DuplicateReport { .. } => 2,
            ReportError::Collection(_) => 3,
            ReportError::CacheWrite { .. } => 4,
            ReportError::Send(_) => 5,
            ReportError::Prompt(_)
            | ReportError::InvalidReport(_)
            | ReportError::UnexpectedReport => 1,
        }
    }
}

/// Errors raised while gathering metrics.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("couldn't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("required field {0} is missing")]
    MissingField(&'static str),

    #[error("couldn't serialize metrics: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by an upload.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server answered HTTP {0}")]
    Status(u16),

    #[error("couldn't build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SendError::Status(status.as_u16()),
            None => SendError::Transport(e.to_string()),
        }
    }
}

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
