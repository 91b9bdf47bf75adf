//! Core data model shared by the extractor, the decoder, and the scan pipeline.
//!
//! All records here are plain values: once built they hold no references into
//! a syntax tree or an input buffer, and downstream code only reads them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A function definition lifted out of a source file.
///
/// The file path is attached by the caller (see [`FunctionReport`]); the
/// record itself only knows about the text it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// Verbatim source covering the whole function node.
    pub content: String,
    /// 1-based, inclusive.
    pub start_line: usize,
    /// 1-based, inclusive.
    pub end_line: usize,
    /// Outer attributes in source order, verbatim.
    pub attributes: Vec<String>,
    /// Line comments directly above the function, newline-joined.
    pub docstring: Option<String>,
}

/// Length of an ed25519 public key in bytes.
pub const PUBKEY_LEN: usize = 32;

/// Raw 32-byte public key, displayed in its base58 form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey(pub [u8; PUBKEY_LEN]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PubkeyError {
    #[error("invalid base58 public key: {0}")]
    Base58(String),
    #[error("public key must be {PUBKEY_LEN} bytes, got {0}")]
    Length(usize),
}

impl Pubkey {
    pub fn new(bytes: [u8; PUBKEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LEN] {
        &self.0
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl FromStr for Pubkey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s).into_vec().map_err(|e| PubkeyError::Base58(e.to_string()))?;
        let array: [u8; PUBKEY_LEN] =
            bytes.as_slice().try_into().map_err(|_| PubkeyError::Length(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Argument that precedes the workspace directory in a recorded build command.
pub const LIBRARY_NAME_FLAG: &str = "--library-name";

/// Build-provenance record for a deployed program, as stored on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: Pubkey,
    pub signer: Pubkey,
    pub version: String,
    pub git_url: String,
    pub commit: String,
    pub args: Vec<String>,
    pub deploy_slot: u64,
    pub bump: u8,
}

impl AccountRecord {
    /// Workspace directory named by the first `--library-name` argument, if any.
    pub fn workspace_root(&self) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == LIBRARY_NAME_FLAG)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

/// Function categories the classifier cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// PDA derivation or address validation.
    AccountDerivation,
    /// Cross-program invocation.
    Cpi,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::AccountDerivation => "account_derivation",
            Category::Cpi => "cpi",
        }
    }
}

/// Outcome of classifying one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis {
    Analyzed { category: Category, description: String },
    Skipped,
    Error { message: String },
}

impl Analysis {
    /// Skipped functions are left out of reports; errors are kept.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Analysis::Skipped)
    }
}

/// Function fields plus the scan context the orchestrator attaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    #[serde(flatten)]
    pub record: FunctionRecord,
    pub repo_url: String,
    pub program_id: String,
    /// `[dependencies]` table of the scanned workspace manifest.
    pub dependencies: serde_json::Value,
}

/// One row of scan output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionReport {
    /// Path relative to the scanned checkout, `/`-separated.
    pub file: String,
    pub function: FunctionEntry,
    pub analysis: Analysis,
}
