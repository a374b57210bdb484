//! Command execution

use std::fs;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use sysreport_common::{
    CacheStore, HttpSender, ReportConfig, ReportError, ReportIdentity, ReportMode, ReportOutcome,
    Reporter, SendError, Sender, SystemCollector,
};
use tracing::{debug, info};

use crate::cli::Commands;

/// Whether an upload is under way. The report is already stored by then.
#[derive(Debug, Clone, Default)]
pub struct SendProgress(Arc<AtomicBool>);

impl SendProgress {
    pub fn in_flight(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sender that flags its uploads in a [`SendProgress`]
pub struct TrackedSender<S> {
    inner: S,
    progress: SendProgress,
}

impl<S: Sender> TrackedSender<S> {
    pub fn new(inner: S, progress: SendProgress) -> Self {
        Self { inner, progress }
    }
}

impl<S: Sender> Sender for TrackedSender<S> {
    fn send(&self, endpoint: &str, payload: &[u8]) -> Result<(), SendError> {
        self.progress.0.store(true, Ordering::SeqCst);
        let result = self.inner.send(endpoint, payload);
        self.progress.0.store(false, Ordering::SeqCst);
        result
    }
}

/// Everything one run needs, wired from configuration.
pub struct Session {
    reporter: Reporter<SystemCollector, TrackedSender<HttpSender>>,
    endpoint: String,
}

impl Session {
    pub fn from_config(config: &ReportConfig, progress: SendProgress) -> Result<Self> {
        let identity = ReportIdentity::from_root(&config.root).map_err(ReportError::from)?;
        let cache_root = config
            .cache_root()
            .context("couldn't determine cache directory")?;
        let cache = CacheStore::in_cache_root(&cache_root, &identity);
        let sender = HttpSender::new(config.timeout()).map_err(ReportError::from)?;
        let sender = TrackedSender::new(sender, progress);
        let endpoint = identity.report_url(&config.url);

        debug!(
            cache = %cache.path().display(),
            endpoint = %endpoint,
            "Session ready"
        );

        Ok(Self {
            reporter: Reporter::new(SystemCollector::new(config.root.clone()), sender, cache),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cache(&self) -> &CacheStore {
        self.reporter.cache()
    }
}

/// Run a command to completion.
pub fn run(command: Commands, config: &ReportConfig, progress: SendProgress) -> Result<()> {
    let session = Session::from_config(config, progress)?;

    match command {
        Commands::Show => {
            let data = session.reporter.collect()?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            writeln!(stdout)?;
        }
        Commands::Send { decision, force } => {
            let outcome = session.reporter.collect_and_send(
                decision.mode(),
                force,
                &session.endpoint,
                &mut io::empty(),
                &mut io::sink(),
            )?;
            report_outcome(outcome);
        }
        Commands::Interactive { force } => {
            let outcome = session.reporter.collect_and_send(
                ReportMode::Interactive,
                force,
                &session.endpoint,
                &mut io::stdin().lock(),
                &mut io::stdout().lock(),
            )?;
            report_outcome(outcome);
        }
        Commands::Upload { file, force } => {
            let payload =
                fs::read(&file).with_context(|| format!("couldn't read {}", file.display()))?;
            let outcome = session
                .reporter
                .send_report(&payload, force, &session.endpoint)?;
            report_outcome(outcome);
        }
        Commands::Forget => {
            let cache = session.cache();
            cache
                .clear()
                .with_context(|| format!("couldn't remove {}", cache.path().display()))?;
            info!(path = %cache.path().display(), "Stored report removed");
            println!("Removed {}", cache.path().display());
        }
    }

    Ok(())
}

/// User-facing line for a finished run
pub fn outcome_message(outcome: ReportOutcome) -> &'static str {
    match outcome {
        ReportOutcome::Reported => "Thank you, the report was sent.",
        ReportOutcome::OptedOut => "Opt-out choice was sent.",
        ReportOutcome::Aborted => "Nothing was reported.",
    }
}

fn report_outcome(outcome: ReportOutcome) {
    println!("{}", outcome_message(outcome));
}
