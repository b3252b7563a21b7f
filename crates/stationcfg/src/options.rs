//! # Machine Options
//!
//! Parsing and validation of the two operator-authored input files:
//! the per-machine option record (desktop choice, hostname, GPU flag)
//! and the confidential option record that is kept out of the shareable
//! template and spliced into the resolved spec unmodified.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Option parsing and validation error types
#[derive(thiserror::Error, Debug)]
pub enum OptionsError {
    #[error("Options file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid TOML syntax: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error reading options: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options: {msg}")]
    Validation { msg: String },
}

/// Desktop environment family for a machine.
///
/// This is a closed set: any other value in the options file is rejected
/// while the record is being constructed, before any composition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Desktop {
    Gnome,
    Kde,
}

impl Desktop {
    /// Desktop manager activated for this desktop family.
    pub fn desktop_manager(&self) -> &'static str {
        match self {
            Desktop::Gnome => "gnome",
            Desktop::Kde => "plasma6",
        }
    }

    /// Display manager paired with this desktop family.
    pub fn display_manager(&self) -> &'static str {
        match self {
            Desktop::Gnome => "gdm",
            Desktop::Kde => "sddm",
        }
    }
}

/// Per-machine, non-secret configuration choices.
///
/// Authored once per machine and edited manually over time. Safe to share;
/// everything private lives in [`ConfidentialOptions`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineOptions {
    /// System hostname
    pub hostname: String,

    /// Primary user account name
    pub username: String,

    /// Desktop environment family ("gnome" or "kde")
    pub desktop: Desktop,

    /// Whether the proprietary NVIDIA driver stack is required
    #[serde(default)]
    pub nvidia: bool,
}

impl MachineOptions {
    /// Load machine options from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OptionsError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read machine options: {}", path.display()))?;

        let options: MachineOptions = toml::from_str(&content)
            .with_context(|| format!("Failed to parse machine options: {}", path.display()))?;

        options.validate()?;
        Ok(options)
    }

    /// Validate the option record.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.is_empty() {
            return Err(OptionsError::Validation {
                msg: "hostname cannot be empty".to_string(),
            }
            .into());
        }

        if self.username.is_empty() {
            return Err(OptionsError::Validation {
                msg: "username cannot be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Private identity values kept out of the shareable machine options.
///
/// The sync-service settings are opaque to this layer: they are never
/// parsed, validated, or transformed, only spliced into the resolved spec
/// at a single named field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidentialOptions {
    /// Sync-service device identity and folder settings (pass-through)
    pub syncthing: toml::Value,
}

impl ConfidentialOptions {
    /// Load confidential options from a TOML file.
    ///
    /// A missing file is fatal. There is no default: silently omitting
    /// private device identity would be a correctness hazard.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OptionsError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read confidential options: {}", path.display()))?;

        let options: ConfidentialOptions = toml::from_str(&content)
            .with_context(|| format!("Failed to parse confidential options: {}", path.display()))?;

        options.validate()?;
        Ok(options)
    }

    /// Validate the record shape.
    ///
    /// Only the outer shape is checked so the resolved spec stays
    /// serializable; the contents remain opaque.
    pub fn validate(&self) -> Result<()> {
        if !self.syncthing.is_table() {
            return Err(OptionsError::Validation {
                msg: "syncthing settings must be a TOML table".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
