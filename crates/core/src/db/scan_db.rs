use std::path::Path;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::{StoredAccount, StoredReport};
use crate::model::{AccountRecord, Analysis, FunctionReport};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for scan database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// JSON columns (args, report bodies) failed to encode.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SHA-256 of an account payload as lowercase hex.
pub fn payload_hash(payload: &[u8]) -> String {
    format!("{:x}", Sha256::digest(payload))
}

/// SQLite-backed store for decoded accounts and scan reports.
#[derive(Debug)]
pub struct ScanDb {
    conn: Connection,
}

impl ScanDb {
    /// Open (or create) a scan database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert or refresh a decoded account, keyed by the hash of its payload.
    /// Returns the payload hash.
    pub fn upsert_account(&self, record: &AccountRecord, payload: &[u8]) -> DbResult<String> {
        let hash = payload_hash(payload);
        let args = serde_json::to_string(&record.args)?;
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO accounts
                (payload_hash, address, signer, version, git_url, commit_hash, args,
                 deploy_slot, bump, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                hash,
                record.address.to_string(),
                record.signer.to_string(),
                record.version,
                record.git_url,
                record.commit,
                args,
                record.deploy_slot as i64, // bit-cast; read back with `as u64`
                record.bump,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(hash)
    }

    /// List stored accounts ordered by deploy slot, optionally filtered by program address.
    pub fn list_accounts(&self, address: Option<&str>) -> DbResult<Vec<StoredAccount>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE (?1 IS NULL OR address = ?1)
            "#
        ))?;
        let rows = stmt.query_map(params![address], account_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        // Slots are stored as i64 bit patterns; order on the u64 value.
        out.sort_by(|a, b| {
            (a.record.deploy_slot, &a.payload_hash).cmp(&(b.record.deploy_slot, &b.payload_hash))
        });
        Ok(out)
    }

    /// Look up one account by payload hash.
    pub fn get_account(&self, hash: &str) -> DbResult<Option<StoredAccount>> {
        let account = self
            .conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE payload_hash = ?1"),
                [hash],
                account_from_row,
            )
            .optional()?;
        Ok(account)
    }

    /// Persist a batch of reports in one transaction. Returns how many rows were written.
    pub fn insert_reports(&self, reports: &[FunctionReport]) -> DbResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO function_reports
                    (program_id, file, name, start_line, end_line, status, category, body,
                     recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;
            for report in reports {
                let (status, category) = match &report.analysis {
                    Analysis::Analyzed { category, .. } => ("analyzed", Some(category.as_str())),
                    Analysis::Skipped => ("skipped", None),
                    Analysis::Error { .. } => ("error", None),
                };
                let record = &report.function.record;
                stmt.execute(params![
                    report.function.program_id,
                    report.file,
                    record.name,
                    record.start_line as i64,
                    record.end_line as i64,
                    status,
                    category,
                    serde_json::to_string(report)?,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(reports.len())
    }

    /// List stored reports (ordered by id), optionally for one program.
    pub fn list_reports(&self, program_id: Option<&str>) -> DbResult<Vec<StoredReport>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, body, recorded_at
            FROM function_reports
            WHERE (?1 IS NULL OR program_id = ?1)
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![program_id], |row| {
            let body: String = row.get(1)?;
            Ok(StoredReport {
                id: row.get(0)?,
                report: serde_json::from_str(&body).map_err(|e| conversion_error(1, e))?,
                recorded_at: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

const ACCOUNT_COLUMNS: &str = "payload_hash, address, signer, version, git_url, commit_hash, \
                               args, deploy_slot, bump, recorded_at";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<StoredAccount> {
    let address: String = row.get(1)?;
    let signer: String = row.get(2)?;
    let args: String = row.get(6)?;
    let slot: i64 = row.get(7)?;
    Ok(StoredAccount {
        payload_hash: row.get(0)?,
        record: AccountRecord {
            address: address.parse().map_err(|e| conversion_error(1, e))?,
            signer: signer.parse().map_err(|e| conversion_error(2, e))?,
            version: row.get(3)?,
            git_url: row.get(4)?,
            commit: row.get(5)?,
            args: serde_json::from_str(&args).map_err(|e| conversion_error(6, e))?,
            deploy_slot: slot as u64,
            bump: row.get(8)?,
        },
        recorded_at: row.get(9)?,
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let mut current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        // Initial schema.
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS accounts (
                payload_hash TEXT PRIMARY KEY,
                address      TEXT NOT NULL,
                signer       TEXT NOT NULL,
                version      TEXT NOT NULL,
                git_url      TEXT NOT NULL,
                commit_hash  TEXT NOT NULL,
                args         TEXT NOT NULL,
                deploy_slot  INTEGER NOT NULL,
                bump         INTEGER NOT NULL,
                recorded_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_accounts_address ON accounts(address);

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
        current_version = 1;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS function_reports (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                program_id  TEXT NOT NULL,
                file        TEXT NOT NULL,
                name        TEXT NOT NULL,
                start_line  INTEGER NOT NULL,
                end_line    INTEGER NOT NULL,
                status      TEXT NOT NULL,
                category    TEXT,
                body        TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_function_reports_program ON function_reports(program_id);

            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}
