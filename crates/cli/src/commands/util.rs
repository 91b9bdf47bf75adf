use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Where a raw account payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Hex string, optionally `0x`-prefixed; whitespace is ignored.
    Hex(String),
    /// File holding the raw bytes.
    File(PathBuf),
}

/// Load the raw bytes of an account payload.
pub fn read_payload(source: &PayloadSource) -> Result<Vec<u8>> {
    match source {
        PayloadSource::Hex(text) => {
            let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            let digits = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
            hex::decode(digits).context("Failed to decode hex payload")
        }
        PayloadSource::File(path) => fs::read(path)
            .with_context(|| format!("Failed to read payload file {}", path.display())),
    }
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Open the scan database at `path`, creating parent directories as needed.
pub fn open_scan_db(path: &Path) -> Result<scout_core::db::ScanDb> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    scout_core::db::ScanDb::open(path)
        .with_context(|| format!("Failed to open scan database at {}", path.display()))
}
