//! I/O utilities for emitting the resolved spec.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Atomic file write utility - write to temporary file then rename
pub fn atomic_write<P: AsRef<Path>, D: AsRef<[u8]>>(path: P, data: D) -> Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    // Write to temporary file
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    file.write_all(data.as_ref())
        .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

    file.sync_all()
        .with_context(|| format!("Failed to sync temp file: {}", temp_path.display()))?;

    // Atomic rename
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {} to {}", temp_path.display(), path.display()))?;

    Ok(())
}

/// Create directory recursively if it doesn't exist
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    std::fs::create_dir_all(path.as_ref())
        .with_context(|| format!("Failed to create directory: {}", path.as_ref().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() -> Result<()> {
        let temp_dir = tempdir()?;
        let file_path = temp_dir.path().join("spec.toml");

        atomic_write(&file_path, b"hostname = \"workbench\"")?;

        let content = fs::read_to_string(&file_path)?;
        assert_eq!(content, "hostname = \"workbench\"");

        Ok(())
    }

    #[test]
    fn test_atomic_write_replaces_existing() -> Result<()> {
        let temp_dir = tempdir()?;
        let file_path = temp_dir.path().join("spec.toml");

        atomic_write(&file_path, b"first")?;
        atomic_write(&file_path, b"second")?;

        let content = fs::read_to_string(&file_path)?;
        assert_eq!(content, "second");

        Ok(())
    }

    #[test]
    fn test_ensure_dir() -> Result<()> {
        let temp_dir = tempdir()?;
        let nested = temp_dir.path().join("a").join("b");

        ensure_dir(&nested)?;
        assert!(nested.is_dir());

        Ok(())
    }
}
