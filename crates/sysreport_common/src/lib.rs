//! sysreport common - collect, confirm, cache and upload a system report.
//!
//! [`Reporter`] owns the run: it consults the [`CacheStore`] so each
//! distribution release is reported once, asks the user through [`prompt`]
//! in interactive mode, and hands the chosen payload to a [`Sender`].

pub mod cache;
pub mod collector;
pub mod config;
pub mod error;
pub mod identity;
pub mod prompt;
pub mod reporter;
pub mod scanner;
pub mod sender;

pub use cache::CacheStore;
pub use collector::{Collector, SystemCollector, EXPECTED_REPORT_ITEM};
pub use config::ReportConfig;
pub use error::{CollectError, ConfigError, ReportError, SendError};
pub use identity::ReportIdentity;
pub use prompt::{PromptDecision, PROMPT, QUESTION};
pub use reporter::{ReportMode, ReportOutcome, Reporter, OPT_OUT_JSON};
pub use scanner::{scan_lines_or_question, Scan, TokenReader};
pub use sender::{HttpSender, Sender};
