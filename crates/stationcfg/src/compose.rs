//! # System Composition
//!
//! Turns the three machine inputs into one fully concrete system spec:
//! resolves the desktop/display manager pair from the desktop choice,
//! concatenates the base package/service set with the flag-gated segments,
//! copies the hardware facts through, and splices the confidential
//! sync-service settings in unmodified.
//!
//! Composition is a pure transformation: same inputs, same spec. It either
//! fully succeeds or fails before any partial spec exists.

use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::hardware::{FilesystemFact, HardwareFacts};
use crate::options::{ConfidentialOptions, Desktop, MachineOptions};

/// A named unit of packages, services, and udev rules.
///
/// Segments are the building blocks of the resolved package set: one base
/// segment that is always included, plus optional segments appended only
/// when their gating flag is true. Entries may overlap across segments;
/// duplicates are preserved deliberately so the spec stays traceable to
/// the segments that contributed them.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Segment name, used for logging
    pub name: &'static str,

    /// System packages contributed by this segment
    pub packages: &'static [&'static str],

    /// Services enabled by this segment
    pub services: &'static [&'static str],

    /// Udev rule files installed by this segment
    pub udev_rules: &'static [&'static str],
}

/// Packages and services every workstation gets.
pub const BASE_SEGMENT: Segment = Segment {
    name: "base",
    packages: &[
        "firefox", "git", "vim", "wget", "htop", "unzip", "vlc", "keepassxc",
    ],
    services: &["NetworkManager", "syncthing", "fwupd"],
    udev_rules: &[],
};

/// Proprietary NVIDIA driver stack and GPU monitoring, gated on `nvidia`.
pub const NVIDIA_SEGMENT: Segment = Segment {
    name: "nvidia",
    packages: &["nvidia-driver", "nvidia-settings", "nvtop"],
    services: &["nvidia-persistenced"],
    udev_rules: &["70-nvidia.rules"],
};

/// GNOME extras (software center, app-indicator extension), gated on the
/// desktop choice.
pub const GNOME_SEGMENT: Segment = Segment {
    name: "gnome",
    packages: &[
        "gnome-software",
        "gnome-shell-extension-appindicator",
        "gnome-tweaks",
    ],
    services: &[],
    udev_rules: &[],
};

/// KDE extras, gated on the desktop choice.
pub const KDE_SEGMENT: Segment = Segment {
    name: "kde",
    packages: &["plasma-discover", "kde-gtk-config"],
    services: &[],
    udev_rules: &[],
};

/// Builder for the conditional package/service set.
///
/// Starts from [`BASE_SEGMENT`] and appends optional segments only when
/// their guard is true. No segment is ever included with a false guard.
#[derive(Debug)]
pub struct SpecBuilder {
    packages: Vec<String>,
    services: Vec<String>,
    udev_rules: Vec<String>,
}

impl SpecBuilder {
    /// Start a new set from the base segment.
    pub fn new() -> Self {
        let mut builder = Self {
            packages: Vec::new(),
            services: Vec::new(),
            udev_rules: Vec::new(),
        };
        builder.push(&BASE_SEGMENT);
        builder
    }

    /// Append a segment when its guard is true.
    pub fn segment_if(mut self, guard: bool, segment: &Segment) -> Self {
        if guard {
            self.push(segment);
        } else {
            debug!("Skipping segment '{}'", segment.name);
        }
        self
    }

    fn push(&mut self, segment: &Segment) {
        debug!(
            "Including segment '{}' ({} packages, {} services)",
            segment.name,
            segment.packages.len(),
            segment.services.len()
        );
        self.packages
            .extend(segment.packages.iter().map(|s| s.to_string()));
        self.services
            .extend(segment.services.iter().map(|s| s.to_string()));
        self.udev_rules
            .extend(segment.udev_rules.iter().map(|s| s.to_string()));
    }

    /// Finish the set.
    pub fn finish(self) -> (Vec<String>, Vec<String>, Vec<String>) {
        (self.packages, self.services, self.udev_rules)
    }
}

impl Default for SpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary user account in the resolved spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedUser {
    /// Account name
    pub name: String,

    /// Supplementary groups
    pub groups: Vec<String>,
}

/// Boot and filesystem section of the resolved spec, derived from the
/// hardware facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootSpec {
    /// CPU microcode update package
    pub microcode_package: String,

    /// Kernel modules to load after boot
    pub kernel_modules: Vec<String>,

    /// Kernel modules required in the initial ramdisk
    pub initrd_modules: Vec<String>,

    /// Swap devices by stable identifier
    pub swap_devices: Vec<String>,

    /// Filesystems to mount
    pub filesystems: Vec<FilesystemFact>,
}

/// The fully concrete output of composition.
///
/// Every field is resolved before this value exists; it is derived fresh
/// on every render and never stored by this layer. The external activation
/// tool consumes its TOML serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSystemSpec {
    /// System hostname
    pub hostname: String,

    /// Desktop manager ("gnome" or "plasma6")
    pub desktop_manager: String,

    /// Display manager ("gdm" or "sddm")
    pub display_manager: String,

    /// X/Wayland video driver stack
    pub video_drivers: Vec<String>,

    /// Final package set (duplicates across segments preserved)
    pub packages: Vec<String>,

    /// Services to enable
    pub services: Vec<String>,

    /// Udev rule files to install
    pub udev_rules: Vec<String>,

    /// Primary user account
    pub user: ResolvedUser,

    /// Boot and filesystem layout
    pub boot: BootSpec,

    /// Sync-service settings, spliced through unmodified
    pub syncthing: toml::Value,
}

/// Compose a resolved system spec from the three machine inputs.
///
/// Inputs are re-validated first so composition fails fast on records that
/// were constructed by hand rather than loaded through the parsers; no
/// partial spec is ever produced.
pub fn render(
    options: &MachineOptions,
    confidential: &ConfidentialOptions,
    facts: &HardwareFacts,
) -> Result<ResolvedSystemSpec> {
    options.validate()?;
    confidential.validate()?;
    facts.validate()?;

    info!(
        "Composing system spec for '{}' ({} desktop, nvidia: {})",
        options.hostname,
        options.desktop.desktop_manager(),
        options.nvidia
    );

    let (packages, services, udev_rules) = SpecBuilder::new()
        .segment_if(options.nvidia, &NVIDIA_SEGMENT)
        .segment_if(options.desktop == Desktop::Gnome, &GNOME_SEGMENT)
        .segment_if(options.desktop == Desktop::Kde, &KDE_SEGMENT)
        .finish();

    let video_drivers = if options.nvidia {
        vec!["nvidia".to_string()]
    } else {
        vec!["modesetting".to_string()]
    };

    let user = ResolvedUser {
        name: options.username.clone(),
        groups: vec![
            "wheel".to_string(),
            "networkmanager".to_string(),
            "video".to_string(),
        ],
    };

    let boot = BootSpec {
        microcode_package: facts.cpu_vendor.microcode_package().to_string(),
        kernel_modules: facts.kernel_modules.clone(),
        initrd_modules: facts.initrd_modules.clone(),
        swap_devices: facts.swap_devices.clone(),
        filesystems: facts.filesystems.clone(),
    };

    Ok(ResolvedSystemSpec {
        hostname: options.hostname.clone(),
        desktop_manager: options.desktop.desktop_manager().to_string(),
        display_manager: options.desktop.display_manager().to_string(),
        video_drivers,
        packages,
        services,
        udev_rules,
        user,
        boot,
        syncthing: confidential.syncthing.clone(),
    })
}
