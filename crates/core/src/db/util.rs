use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::db::ScanConfig;

/// Load scan settings from a `.json`, `.yaml` or `.yml` file.
pub fn load_scan_config(path: &Path) -> Result<ScanConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scan config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let config = match ext {
        "json" => serde_json::from_str(&body).context("Failed to parse scan config JSON")?,
        "yaml" | "yml" => serde_yaml::from_str(&body).context("Failed to parse scan config YAML")?,
        other => bail!("Unsupported scan config format '{other}' (expected json, yaml or yml)"),
    };
    Ok(config)
}
