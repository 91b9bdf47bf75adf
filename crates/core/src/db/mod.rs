//! Scan configuration and persistence.
//!
//! - `ScanConfig`: serializable scan settings (JSON/YAML file + CLI overlay).
//! - `ScanDb`: a small SQLite wrapper storing decoded accounts and function
//!   reports, with `user_version`-based migrations.
//! - `StoredAccount` / `StoredReport`: rows as read back from the database.

mod config;
mod models;
mod scan_db;
mod util;

pub use config::{MissingSetting, ScanConfig};
pub use models::{StoredAccount, StoredReport};
pub use scan_db::{payload_hash, DbError, DbResult, ScanDb, CURRENT_SCHEMA_VERSION};
pub use util::load_scan_config;
