//! Station Configuration Composer
//!
//! A declarative workstation configuration composer: per-machine options,
//! detected hardware facts, and a confidential settings record are composed
//! into one fully resolved system spec for an external activation tool.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Input records
pub mod hardware;
pub mod options;

// Composition
pub mod compose;

// I/O helpers
pub mod util;

// Re-exports for convenience
pub use compose::{render, ResolvedSystemSpec};
pub use hardware::HardwareFacts;
pub use options::{ConfidentialOptions, Desktop, MachineOptions};

/// Composer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default input file locations
pub mod paths {
    use std::path::PathBuf;

    /// System configuration directory
    pub const SYSTEM_CONFIG_DIR: &str = "/etc/stationcfg";

    /// Machine options file name
    pub const MACHINE_OPTIONS_FILE: &str = "machine.toml";

    /// Confidential options file name
    pub const CONFIDENTIAL_FILE: &str = "confidential.toml";

    /// Hardware facts file name
    pub const HARDWARE_FACTS_FILE: &str = "hardware.toml";

    /// Default machine options path
    pub fn machine_options_file() -> PathBuf {
        PathBuf::from(SYSTEM_CONFIG_DIR).join(MACHINE_OPTIONS_FILE)
    }

    /// Default confidential options path
    pub fn confidential_file() -> PathBuf {
        PathBuf::from(SYSTEM_CONFIG_DIR).join(CONFIDENTIAL_FILE)
    }

    /// Default hardware facts path
    pub fn hardware_facts_file() -> PathBuf {
        PathBuf::from(SYSTEM_CONFIG_DIR).join(HARDWARE_FACTS_FILE)
    }
}
