//! System metrics collection
//!
//! Gathers hardware and installation details into the JSON report document.
//! File-based readings are taken relative to a configurable system root so a
//! fake root can stand in for `/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sysinfo::{Disks, System};
use tracing::debug;

use crate::error::CollectError;
use crate::identity::read_os_release;

/// Field every collected report carries.
///
/// Verifiers look for it to tell a real report from the opt-out marker.
pub const EXPECTED_REPORT_ITEM: &str = "\"Version\":";

const DMI_DIR: &str = "sys/class/dmi/id";
const TIMEZONE_FILE: &str = "etc/timezone";
const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Source of the report payload.
pub trait Collector {
    /// Produce a serialized report document describing this machine.
    fn collect(&self) -> Result<Vec<u8>, CollectError>;
}

/// Complete metrics document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemMetrics {
    /// Release version (os-release VERSION_ID)
    pub version: String,

    /// Distribution id (os-release ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,

    #[serde(rename = "OEM", skip_serializing_if = "Option::is_none")]
    pub oem: Option<OemInfo>,

    #[serde(rename = "BIOS", skip_serializing_if = "Option::is_none")]
    pub bios: Option<BiosInfo>,

    #[serde(rename = "CPU", skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,

    /// CPU architecture (x86_64, aarch64)
    pub arch: String,

    /// Total memory in GB
    #[serde(rename = "RAM", skip_serializing_if = "Option::is_none")]
    pub ram: Option<f64>,

    /// Partition sizes in GB
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionInfo>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BiosInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CpuInfo {
    pub model: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionInfo {
    #[serde(rename = "DE", skip_serializing_if = "Option::is_none")]
    pub desktop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Collector reading the running system.
#[derive(Debug, Clone)]
pub struct SystemCollector {
    root: PathBuf,
}

impl SystemCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gather every metric. Only the release version is mandatory.
    pub fn metrics(&self) -> Result<SystemMetrics, CollectError> {
        debug!(root = %self.root.display(), "Collecting system metrics");

        let release = read_os_release(&self.root)?;
        let version = release
            .get("VERSION_ID")
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or(CollectError::MissingField("VERSION_ID"))?;

        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu();

        Ok(SystemMetrics {
            version,
            distribution: release.get("ID").cloned(),
            oem: self.oem(),
            bios: self.bios(),
            cpu: cpu_info(&sys),
            arch: std::env::consts::ARCH.to_string(),
            ram: ram_gb(&sys),
            partitions: partitions_gb(),
            timezone: read_trimmed(&self.root.join(TIMEZONE_FILE)),
            language: env_value("LANG"),
            session: session_info(),
        })
    }

    fn oem(&self) -> Option<OemInfo> {
        let oem = OemInfo {
            vendor: self.dmi("sys_vendor"),
            product: self.dmi("product_name"),
            family: self.dmi("product_family"),
        };
        if oem.vendor.is_none() && oem.product.is_none() && oem.family.is_none() {
            debug!("No OEM information available");
            return None;
        }
        Some(oem)
    }

    fn bios(&self) -> Option<BiosInfo> {
        let bios = BiosInfo {
            vendor: self.dmi("bios_vendor"),
            version: self.dmi("bios_version"),
        };
        if bios.vendor.is_none() && bios.version.is_none() {
            debug!("No BIOS information available");
            return None;
        }
        Some(bios)
    }

    fn dmi(&self, name: &str) -> Option<String> {
        read_trimmed(&self.root.join(DMI_DIR).join(name))
    }
}

impl Collector for SystemCollector {
    fn collect(&self) -> Result<Vec<u8>, CollectError> {
        let metrics = self.metrics()?;
        Ok(serde_json::to_vec_pretty(&metrics)?)
    }
}

fn cpu_info(sys: &System) -> Option<CpuInfo> {
    let cpus = sys.cpus();
    let model = cpus.first().map(|cpu| cpu.brand().trim().to_string())?;
    Some(CpuInfo {
        model,
        count: cpus.len(),
    })
}

fn ram_gb(sys: &System) -> Option<f64> {
    match sys.total_memory() {
        0 => {
            debug!("Total memory unavailable");
            None
        }
        bytes => Some(to_gb(bytes)),
    }
}

fn partitions_gb() -> Vec<f64> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .map(|disk| disk.total_space())
        .filter(|&size| size > 0)
        .map(to_gb)
        .collect()
}

fn session_info() -> Option<SessionInfo> {
    let desktop = env_value("XDG_CURRENT_DESKTOP");
    let kind = env_value("XDG_SESSION_TYPE");
    if desktop.is_none() && kind.is_none() {
        return None;
    }
    Some(SessionInfo { desktop, kind })
}

/// Bytes to GB, rounded to one decimal
fn to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 10.0).round() / 10.0
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn read_trimmed(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let value = raw.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping unreadable metric");
            None
        }
    }
}
