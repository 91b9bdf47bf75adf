use std::path::Path;

use anyhow::{Context, Result};

use scout_core::model::Analysis;

use crate::commands::open_scan_db;

/// List function reports stored in a scan database.
pub fn history_command(db_path: &Path, program_id: Option<&str>, json: bool) -> Result<()> {
    let db = open_scan_db(db_path)?;
    let reports = db.list_reports(program_id).context("Failed to list stored reports")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("Stored reports ({}):", reports.len());
    if reports.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for stored in reports {
        let report = &stored.report;
        let verdict = match &report.analysis {
            Analysis::Analyzed { category, description } => {
                format!("{}: {}", category.as_str(), description)
            }
            Analysis::Skipped => "skipped".to_string(),
            Analysis::Error { message } => format!("error: {message}"),
        };
        println!(
            "  - [{}] {}:{} {} ({})",
            report.function.program_id,
            report.file,
            report.function.record.start_line,
            report.function.record.name,
            verdict
        );
    }

    Ok(())
}

/// List decoded accounts stored in a scan database.
pub fn list_accounts_command(db_path: &Path, address: Option<&str>, json: bool) -> Result<()> {
    let db = open_scan_db(db_path)?;
    let accounts = db.list_accounts(address).context("Failed to list stored accounts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    println!("Stored accounts ({}):", accounts.len());
    if accounts.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for stored in accounts {
        let record = &stored.record;
        println!(
            "  - {} {}@{} slot={} workspace={}",
            record.address,
            record.git_url,
            record.commit,
            record.deploy_slot,
            record.workspace_root().unwrap_or(".")
        );
    }

    Ok(())
}
