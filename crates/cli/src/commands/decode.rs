use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use scout_core::db::payload_hash;
use scout_core::decoder::{decode_account_record, strip_discriminator};
use scout_core::model::AccountRecord;

use crate::commands::{open_scan_db, read_payload, PayloadSource};

/// Decoded record plus the values derived from it.
#[derive(Debug, Serialize)]
pub struct DecodedAccount {
    #[serde(flatten)]
    pub record: AccountRecord,
    pub workspace_root: Option<String>,
    pub payload_hash: String,
}

/// Decode a build-provenance account payload and print it.
///
/// When `db` is set the record is also stored there.
pub fn decode_command(
    source: &PayloadSource,
    discriminator_len: usize,
    json: bool,
    db: Option<&Path>,
) -> Result<()> {
    let raw = read_payload(source)?;
    let payload =
        strip_discriminator(&raw, discriminator_len).context("Failed to strip discriminator")?;
    let record = decode_account_record(payload).context("Failed to decode account record")?;

    if let Some(db_path) = db {
        let db = open_scan_db(db_path)?;
        db.upsert_account(&record, payload).context("Failed to store account record")?;
        tracing::info!(db = %db_path.display(), address = %record.address, "stored account record");
    }

    let decoded = DecodedAccount {
        workspace_root: record.workspace_root().map(str::to_string),
        payload_hash: payload_hash(payload),
        record,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    let record = &decoded.record;
    println!("Account record:");
    println!("  Address: {}", record.address);
    println!("  Signer: {}", record.signer);
    println!("  Version: {}", record.version);
    println!("  Git URL: {}", record.git_url);
    println!("  Commit: {}", record.commit);
    let args = if record.args.is_empty() { "-".to_string() } else { record.args.join(" ") };
    println!("  Args: {args}");
    println!("  Deploy slot: {}", record.deploy_slot);
    println!("  Bump: {}", record.bump);
    println!("  Workspace root: {}", decoded.workspace_root.as_deref().unwrap_or("-"));
    println!("  Payload hash: {}", decoded.payload_hash);

    Ok(())
}
