use serde::{Deserialize, Serialize};

use crate::model::{AccountRecord, FunctionReport};

/// A decoded account as stored in the scan database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    /// SHA-256 of the decoded payload (hex); identifies the row.
    pub payload_hash: String,
    pub record: AccountRecord,
    /// RFC 3339 timestamp of the last write.
    pub recorded_at: String,
}

/// A function report as stored in the scan database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: i64,
    pub report: FunctionReport,
    pub recorded_at: String,
}
