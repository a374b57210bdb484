//! Report cache - the single persisted report per distribution release
//!
//! The file's presence is what the duplicate guard checks, so writes go
//! through a temp file and a rename to never leave a truncated report.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::identity::ReportIdentity;

/// Directory under the cache root holding report files
pub const CACHE_NAMESPACE: &str = "sysreport";

/// Single-slot report file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot for `identity` under `<cache_root>/sysreport/`.
    pub fn in_cache_root(cache_root: &Path, identity: &ReportIdentity) -> Self {
        Self::new(cache_root.join(CACHE_NAMESPACE).join(identity.file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a report was already written. An empty file still counts.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    /// Atomically replace the report with `data`.
    pub fn write(&self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let result = write_synced(&temp_path, data).and_then(|_| fs::rename(&temp_path, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;

        debug!(path = %self.path.display(), bytes = data.len(), "Report cached");
        Ok(())
    }

    /// Remove the report. A missing file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Report cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Hidden sibling of the report file, so the rename stays on one filesystem
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
