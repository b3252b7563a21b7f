//! End-to-end composition tests: load the three machine inputs from files
//! the way the CLI does, render, and check the resolved spec.

use std::fs;

use stationcfg::{render, ConfidentialOptions, HardwareFacts, MachineOptions};

const MACHINE_TOML: &str = r#"
hostname = "workbench"
username = "alice"
desktop = "gnome"
nvidia = true
"#;

const CONFIDENTIAL_TOML: &str = r#"
[syncthing]
device_id = "ABCDEF1-EXAMPLE-DEVICE"

[syncthing.folders.documents]
id = "docs"
path = "/home/alice/Documents"

[syncthing.folders.photos]
id = "photos"
path = "/home/alice/Pictures"
"#;

const HARDWARE_TOML: &str = r#"
cpu_vendor = "amd"
kernel_modules = ["kvm-amd"]
initrd_modules = ["nvme", "xhci_pci", "usbhid", "sd_mod"]
swap_devices = ["/dev/disk/by-uuid/0f3e2f9a-1b2c-4d5e-8f90-swap00000000"]

[[filesystems]]
mount_point = "/"
device = "/dev/disk/by-uuid/5c1d2e3f-4a5b-6c7d-8e9f-root00000000"
fs_type = "ext4"

[[filesystems]]
mount_point = "/boot"
device = "/dev/disk/by-uuid/ABCD-EF01"
fs_type = "vfat"
options = ["fmask=0022", "dmask=0022"]
"#;

fn load_fixture_inputs() -> (MachineOptions, ConfidentialOptions, HardwareFacts) {
    let dir = tempfile::tempdir().unwrap();

    let machine_path = dir.path().join("machine.toml");
    let confidential_path = dir.path().join("confidential.toml");
    let hardware_path = dir.path().join("hardware.toml");

    fs::write(&machine_path, MACHINE_TOML).unwrap();
    fs::write(&confidential_path, CONFIDENTIAL_TOML).unwrap();
    fs::write(&hardware_path, HARDWARE_TOML).unwrap();

    let options = MachineOptions::load(&machine_path).unwrap();
    let confidential = ConfidentialOptions::load(&confidential_path).unwrap();
    let facts = HardwareFacts::load(&hardware_path).unwrap();

    (options, confidential, facts)
}

#[test]
fn render_from_files_produces_concrete_spec() {
    let (options, confidential, facts) = load_fixture_inputs();
    let spec = render(&options, &confidential, &facts).unwrap();

    assert_eq!(spec.hostname, "workbench");
    assert_eq!(spec.desktop_manager, "gnome");
    assert_eq!(spec.display_manager, "gdm");
    assert_eq!(spec.video_drivers, vec!["nvidia"]);
    assert_eq!(spec.user.name, "alice");
    assert_eq!(spec.boot.microcode_package, "amd-microcode");
    assert_eq!(spec.boot.filesystems.len(), 2);
}

#[test]
fn render_twice_yields_byte_identical_output() {
    let (options, confidential, facts) = load_fixture_inputs();

    let first = toml::to_string_pretty(&render(&options, &confidential, &facts).unwrap()).unwrap();
    let second = toml::to_string_pretty(&render(&options, &confidential, &facts).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn syncthing_record_survives_serialization_unmodified() {
    let (options, confidential, facts) = load_fixture_inputs();
    let spec = render(&options, &confidential, &facts).unwrap();

    let rendered = toml::to_string_pretty(&spec).unwrap();
    let reparsed: toml::Value = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed["syncthing"], confidential.syncthing);
}

#[test]
fn missing_confidential_file_yields_no_spec() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("confidential.toml");

    assert!(ConfidentialOptions::load(&missing).is_err());
}

#[test]
fn unknown_desktop_in_file_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let machine_path = dir.path().join("machine.toml");
    fs::write(
        &machine_path,
        "hostname = \"workbench\"\nusername = \"alice\"\ndesktop = \"xfce\"\n",
    )
    .unwrap();

    assert!(MachineOptions::load(&machine_path).is_err());
}

#[test]
fn resolved_spec_round_trips_through_toml() {
    let (options, confidential, facts) = load_fixture_inputs();
    let spec = render(&options, &confidential, &facts).unwrap();

    let rendered = toml::to_string_pretty(&spec).unwrap();
    let reparsed: stationcfg::ResolvedSystemSpec = toml::from_str(&rendered).unwrap();

    assert_eq!(spec, reparsed);
}
