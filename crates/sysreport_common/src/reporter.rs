//! Report orchestration
//!
//! Decides, per run, whether to collect, ask, store and upload:
//!
//! 1. An existing report blocks the run unless forced.
//! 2. The collector produces the full report.
//! 3. The mode (or the user, in interactive mode) picks the full report or
//!    the opt-out marker. An aborted prompt ends the run with nothing stored.
//! 4. The chosen payload is cached, then uploaded. A failed upload leaves the
//!    cache in place; a forced re-run is the way to retry.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::collector::Collector;
use crate::error::ReportError;
use crate::prompt::{self, PromptDecision};
use crate::sender::Sender;

/// Payload stored and sent when detailed reporting is declined
pub const OPT_OUT_JSON: &str = r#"{"OptOut": true}"#;

/// Key every full report carries
const VERSION_FIELD: &str = "Version";

/// How a run decides what to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Send the full report without asking
    Auto,
    /// Send only the opt-out marker without asking
    OptOut,
    /// Show the report and ask first
    Interactive,
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Full report stored and sent
    Reported,
    /// Opt-out marker stored and sent
    OptedOut,
    /// User quit, nothing stored or sent
    Aborted,
}

pub struct Reporter<C, S> {
    collector: C,
    sender: S,
    cache: CacheStore,
}

impl<C: Collector, S: Sender> Reporter<C, S> {
    pub fn new(collector: C, sender: S, cache: CacheStore) -> Self {
        Self {
            collector,
            sender,
            cache,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Collect the report without storing or sending anything.
    pub fn collect(&self) -> Result<Vec<u8>, ReportError> {
        Ok(self.collector.collect()?)
    }

    /// Collect, decide, store and upload one report.
    ///
    /// `input` and `output` are only used in interactive mode.
    pub fn collect_and_send<R: BufRead, W: Write>(
        &self,
        mode: ReportMode,
        force: bool,
        endpoint: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<ReportOutcome, ReportError> {
        self.check_duplicate(force)?;
        debug!(?mode, force, "Starting report");

        let (payload, outcome) = match mode {
            ReportMode::Auto => (self.collector.collect()?, ReportOutcome::Reported),
            ReportMode::OptOut => {
                if let Err(e) = self.collector.collect() {
                    warn!(error = %e, "Collection failed, sending opt-out marker anyway");
                }
                (opt_out_payload(), ReportOutcome::OptedOut)
            }
            ReportMode::Interactive => {
                let data = self.collector.collect()?;
                match confirm(&data, input, output)? {
                    PromptDecision::Agree => (data, ReportOutcome::Reported),
                    PromptDecision::Decline => (opt_out_payload(), ReportOutcome::OptedOut),
                    PromptDecision::Abort => {
                        info!("Reporting aborted, nothing stored or sent");
                        return Ok(ReportOutcome::Aborted);
                    }
                }
            }
        };

        self.commit(&payload, endpoint)?;
        Ok(outcome)
    }

    /// Store and upload a report prepared elsewhere.
    pub fn send_report(
        &self,
        payload: &[u8],
        force: bool,
        endpoint: &str,
    ) -> Result<ReportOutcome, ReportError> {
        self.check_duplicate(force)?;
        let outcome = classify_payload(payload)?;

        self.commit(payload, endpoint)?;
        Ok(outcome)
    }

    fn check_duplicate(&self, force: bool) -> Result<(), ReportError> {
        if !self.cache.exists() {
            return Ok(());
        }
        if force {
            debug!(path = %self.cache.path().display(), "Report exists, forced to report again");
            return Ok(());
        }
        Err(ReportError::DuplicateReport {
            path: self.cache.path().to_path_buf(),
        })
    }

    fn commit(&self, payload: &[u8], endpoint: &str) -> Result<(), ReportError> {
        self.cache
            .write(payload)
            .map_err(|source| ReportError::CacheWrite {
                path: self.cache.path().to_path_buf(),
                source,
            })?;
        info!(path = %self.cache.path().display(), "Report stored");

        self.sender.send(endpoint, payload)?;
        info!(endpoint, "Report sent");
        Ok(())
    }
}

/// Only the opt-out marker or a JSON object carrying "Version" may be stored.
fn classify_payload(payload: &[u8]) -> Result<ReportOutcome, ReportError> {
    if payload == OPT_OUT_JSON.as_bytes() {
        return Ok(ReportOutcome::OptedOut);
    }
    match serde_json::from_slice::<serde_json::Value>(payload)? {
        serde_json::Value::Object(fields) if fields.contains_key(VERSION_FIELD) => {
            Ok(ReportOutcome::Reported)
        }
        _ => Err(ReportError::UnexpectedReport),
    }
}

fn opt_out_payload() -> Vec<u8> {
    OPT_OUT_JSON.as_bytes().to_vec()
}

/// Show the report, then ask about it.
fn confirm<R: BufRead, W: Write>(
    data: &[u8],
    input: &mut R,
    output: &mut W,
) -> Result<PromptDecision, ReportError> {
    output
        .write_all(data)
        .and_then(|_| output.write_all(b"\n"))
        .map_err(ReportError::Prompt)?;
    prompt::ask(input, output).map_err(ReportError::Prompt)
}
