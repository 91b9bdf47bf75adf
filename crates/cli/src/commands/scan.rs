use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use scout_core::db::{load_scan_config, ScanConfig};
use scout_core::extract::FunctionExtractor;
use scout_core::services::classify::default_classifier_registry;
use scout_core::services::scan::{ScanRequest, Scanner, SkippedFile};

use crate::canonicalize_or_current;
use crate::commands::{open_scan_db, write_json_file};

#[derive(Debug, Serialize)]
pub struct ScanSummary {
    pub program_id: String,
    pub repo_root: String,
    pub workspace_root: String,
    pub classifier: String,
    pub output: String,
    pub files_scanned: usize,
    pub functions_extracted: usize,
    pub reports: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Scan a local checkout and write its function reports.
///
/// Settings come from the optional config file, overlaid with `overrides`
/// (command-line flags and their environment fallbacks).
pub fn scan_command(
    root: &str,
    config_path: Option<&Path>,
    overrides: ScanConfig,
    json: bool,
) -> Result<()> {
    let repo_root = canonicalize_or_current(root)?;
    let base = match config_path {
        Some(path) => load_scan_config(path)?,
        None => ScanConfig::default(),
    };
    let config = base.overlay(overrides);

    let registry = default_classifier_registry();
    let classifier = registry.get(config.classifier()).ok_or_else(|| {
        anyhow!(
            "Unknown classifier '{}'. Available: {}",
            config.classifier(),
            registry.names().join(", ")
        )
    })?;

    let request = ScanRequest {
        repo_root: repo_root.clone(),
        workspace_root: PathBuf::from(config.workspace_root()),
        repo_url: config.repo_url()?.to_string(),
        program_id: config.program_id()?.to_string(),
    };
    let output = PathBuf::from(config.output_path()?);

    let extractor = FunctionExtractor::rust();
    let scanner = Scanner { extractor: &extractor, classifier };
    let outcome = scanner
        .scan(&request)
        .with_context(|| format!("Failed to scan {}", repo_root.display()))?;

    write_json_file(&output, &outcome.reports)?;

    if let Some(db_path) = &config.db {
        let db = open_scan_db(Path::new(db_path))?;
        db.insert_reports(&outcome.reports).context("Failed to store reports")?;
    }

    let summary = ScanSummary {
        program_id: request.program_id.clone(),
        repo_root: repo_root.display().to_string(),
        workspace_root: config.workspace_root().to_string(),
        classifier: classifier.name().to_string(),
        output: output.display().to_string(),
        files_scanned: outcome.files_scanned,
        functions_extracted: outcome.functions_extracted,
        reports: outcome.reports.len(),
        skipped: outcome.skipped,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Scan complete:");
    println!("  Program: {}", summary.program_id);
    println!("  Root: {}", summary.repo_root);
    println!("  Workspace: {}", summary.workspace_root);
    println!("  Classifier: {}", summary.classifier);
    println!("  Files scanned: {}", summary.files_scanned);
    println!("  Functions extracted: {}", summary.functions_extracted);
    println!("  Reports written: {} -> {}", summary.reports, summary.output);
    if !summary.skipped.is_empty() {
        println!("  Skipped files ({}):", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("    - {} ({})", skipped.path, skipped.reason);
        }
    }

    Ok(())
}
