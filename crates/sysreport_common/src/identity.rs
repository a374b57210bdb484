//! Report identity - which distribution release a report belongs to
//!
//! The identity names both the cache slot and the upload path, so one
//! report is kept per distribution release.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CollectError;

/// Location of os-release relative to the system root
pub const OS_RELEASE: &str = "etc/os-release";

/// Distribution and release a report is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportIdentity {
    pub distro: String,
    pub version: String,
}

impl ReportIdentity {
    /// Read the identity from `<root>/etc/os-release`.
    pub fn from_root(root: &Path) -> Result<Self, CollectError> {
        let fields = read_os_release(root)?;
        Self::from_fields(&fields)
    }

    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, CollectError> {
        let distro = fields
            .get("ID")
            .filter(|v| !v.is_empty())
            .ok_or(CollectError::MissingField("ID"))?;
        let version = fields
            .get("VERSION_ID")
            .filter(|v| !v.is_empty())
            .ok_or(CollectError::MissingField("VERSION_ID"))?;

        Ok(Self {
            distro: distro.clone(),
            version: version.clone(),
        })
    }

    /// Cache file name, `<distro>.<version>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.distro, self.version)
    }

    /// Upload URL under `base`, `<base>/<distro>/desktop/<version>`.
    pub fn report_url(&self, base: &str) -> String {
        format!(
            "{}/{}/desktop/{}",
            base.trim_end_matches('/'),
            self.distro,
            self.version
        )
    }
}

/// Read and parse `<root>/etc/os-release`.
pub fn read_os_release(root: &Path) -> Result<HashMap<String, String>, CollectError> {
    let path: PathBuf = root.join(OS_RELEASE);
    let content = fs::read_to_string(&path).map_err(|source| CollectError::Io { path, source })?;
    Ok(parse_os_release(&content))
}

/// Parse os-release `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, surrounding quotes are removed.
pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
