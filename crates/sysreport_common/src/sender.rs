//! Report upload

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::SendError;

/// Default collection server
pub const DEFAULT_BASE_URL: &str = "https://metrics.sysreport.dev";

/// Default upload timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Destination for report payloads.
pub trait Sender {
    /// Upload `payload` to `endpoint`. Any non-success answer is an error.
    fn send(&self, endpoint: &str, payload: &[u8]) -> Result<(), SendError>;
}

/// Sender posting JSON over HTTP(S)
pub struct HttpSender {
    client: reqwest::blocking::Client,
}

impl HttpSender {
    pub fn new(timeout: Duration) -> Result<Self, SendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SendError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Sender for HttpSender {
    fn send(&self, endpoint: &str, payload: &[u8]) -> Result<(), SendError> {
        debug!(endpoint, bytes = payload.len(), "Uploading report");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SendError::Status(status.as_u16()))
        }
    }
}
