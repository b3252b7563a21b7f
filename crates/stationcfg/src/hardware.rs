//! # Hardware Facts
//!
//! Machine-detected, read-only hardware parameters: filesystem layout by
//! UUID, kernel module lists, swap devices, and the CPU vendor tag. The
//! record is regenerated by external detection tooling whenever hardware
//! changes and is never hand-edited; this layer treats it as immutable
//! input and copies it through into the resolved spec.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hardware facts error types
#[derive(thiserror::Error, Debug)]
pub enum HardwareError {
    #[error("Hardware facts file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid TOML syntax: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error reading hardware facts: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid hardware facts: {msg}")]
    Validation { msg: String },
}

/// CPU vendor tag as reported by the detection tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuVendor {
    Amd,
    Intel,
}

impl CpuVendor {
    /// Microcode update package for this vendor.
    pub fn microcode_package(&self) -> &'static str {
        match self {
            CpuVendor::Amd => "amd-microcode",
            CpuVendor::Intel => "intel-microcode",
        }
    }
}

/// A detected filesystem, identified by UUID rather than device node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemFact {
    /// Where the filesystem is mounted (e.g. "/", "/boot")
    pub mount_point: String,

    /// Stable device identifier (e.g. "/dev/disk/by-uuid/...")
    pub device: String,

    /// Filesystem kind (e.g. "ext4", "vfat")
    pub fs_type: String,

    /// Mount options
    #[serde(default)]
    pub options: Vec<String>,
}

/// Detected hardware parameters for one machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareFacts {
    /// CPU vendor ("amd" or "intel")
    pub cpu_vendor: CpuVendor,

    /// Kernel modules to load after boot
    #[serde(default)]
    pub kernel_modules: Vec<String>,

    /// Kernel modules required in the initial ramdisk
    #[serde(default)]
    pub initrd_modules: Vec<String>,

    /// Detected filesystems
    pub filesystems: Vec<FilesystemFact>,

    /// Swap devices by stable identifier
    #[serde(default)]
    pub swap_devices: Vec<String>,
}

impl HardwareFacts {
    /// Load hardware facts from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HardwareError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hardware facts: {}", path.display()))?;

        let facts: HardwareFacts = toml::from_str(&content)
            .with_context(|| format!("Failed to parse hardware facts: {}", path.display()))?;

        facts.validate()?;
        Ok(facts)
    }

    /// Validate the facts record.
    pub fn validate(&self) -> Result<()> {
        if !self.filesystems.iter().any(|fs| fs.mount_point == "/") {
            return Err(HardwareError::Validation {
                msg: "no root filesystem in hardware facts".to_string(),
            }
            .into());
        }

        for fs in &self.filesystems {
            if fs.device.is_empty() {
                return Err(HardwareError::Validation {
                    msg: format!("filesystem '{}' has an empty device", fs.mount_point),
                }
                .into());
            }

            if fs.fs_type.is_empty() {
                return Err(HardwareError::Validation {
                    msg: format!("filesystem '{}' has an empty fs_type", fs.mount_point),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Find the filesystem mounted at a given path.
    pub fn filesystem_at(&self, mount_point: &str) -> Option<&FilesystemFact> {
        self.filesystems
            .iter()
            .find(|fs| fs.mount_point == mount_point)
    }
}
