use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::classify::DEFAULT_CLASSIFIER;

/// A required setting was not supplied by the config file, flags, or environment.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Missing required setting `{0}`")]
pub struct MissingSetting(pub &'static str);

/// Serializable scan settings.
///
/// Loaded from a JSON or YAML file and overlaid with command-line values.
/// Every field is optional here; required ones are checked after merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Repository the checkout was cloned from (attached to every report).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    /// On-chain program address the checkout builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    /// Workspace directory relative to the checkout. Defaults to `.`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<String>,
    /// Classifier name. Defaults to the pattern classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Report file path. Defaults to `<program_id>.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Optional SQLite database to record reports in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
}

impl ScanConfig {
    /// Values set in `overrides` win over values in `self`.
    pub fn overlay(self, overrides: ScanConfig) -> ScanConfig {
        ScanConfig {
            repo_url: overrides.repo_url.or(self.repo_url),
            program_id: overrides.program_id.or(self.program_id),
            workspace_root: overrides.workspace_root.or(self.workspace_root),
            classifier: overrides.classifier.or(self.classifier),
            output: overrides.output.or(self.output),
            db: overrides.db.or(self.db),
        }
    }

    pub fn repo_url(&self) -> Result<&str, MissingSetting> {
        self.repo_url.as_deref().ok_or(MissingSetting("repo_url"))
    }

    pub fn program_id(&self) -> Result<&str, MissingSetting> {
        self.program_id.as_deref().ok_or(MissingSetting("program_id"))
    }

    pub fn workspace_root(&self) -> &str {
        self.workspace_root.as_deref().unwrap_or(".")
    }

    pub fn classifier(&self) -> &str {
        self.classifier.as_deref().unwrap_or(DEFAULT_CLASSIFIER)
    }

    /// Report path, falling back to `<program_id>.json`.
    pub fn output_path(&self) -> Result<String, MissingSetting> {
        match &self.output {
            Some(path) => Ok(path.clone()),
            None => Ok(format!("{}.json", self.program_id()?)),
        }
    }
}
