//! Decoder for the fixed-layout build-provenance account payload.
//!
//! Layout, little-endian, read front to back:
//!
//! ```text
//! address      [u8; 32]
//! signer       [u8; 32]
//! version      u32 len + UTF-8
//! git_url      u32 len + UTF-8
//! commit       u32 len + UTF-8
//! args         u32 count, then count x (u32 len + UTF-8)
//! deploy_slot  u64
//! bump         u8
//! ```
//!
//! Decoding is all-or-nothing: any short read or bad string fails the whole
//! record. Bytes after `bump` are ignored.

use std::str::Utf8Error;

use thiserror::Error;

use crate::model::{AccountRecord, Pubkey, PUBKEY_LEN};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error(
        "record truncated reading {field} at offset {offset}: \
         need {needed} bytes, {available} available"
    )]
    TruncatedRecord { field: &'static str, offset: usize, needed: usize, available: usize },

    #[error("field {field} is not valid UTF-8: {source}")]
    InvalidEncoding {
        field: &'static str,
        #[source]
        source: Utf8Error,
    },
}

/// Sequential reader over a borrowed payload.
struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.buf.len() - self.offset;
        let end = match self.offset.checked_add(len) {
            Some(end) if end <= self.buf.len() => end,
            _ => {
                return Err(DecodeError::TruncatedRecord {
                    field,
                    offset: self.offset,
                    needed: len,
                    available,
                })
            }
        };
        let bytes = &self.buf[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(field, N)?);
        Ok(out)
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.array::<1>(field)?[0])
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array(field)?))
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.array(field)?))
    }

    fn pubkey(&mut self, field: &'static str) -> Result<Pubkey, DecodeError> {
        Ok(Pubkey::new(self.array::<PUBKEY_LEN>(field)?))
    }

    fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.u32(field)? as usize;
        let bytes = self.take(field, len)?;
        let text = std::str::from_utf8(bytes)
            .map_err(|source| DecodeError::InvalidEncoding { field, source })?;
        Ok(text.to_string())
    }
}

/// Decode an account payload. Any leading discriminator must already be removed.
pub fn decode_account_record(buf: &[u8]) -> Result<AccountRecord, DecodeError> {
    let mut cur = Cursor::new(buf);

    let address = cur.pubkey("address")?;
    let signer = cur.pubkey("signer")?;
    let version = cur.string("version")?;
    let git_url = cur.string("git_url")?;
    let commit = cur.string("commit")?;

    let count = cur.u32("args_count")?;
    // Capacity is bounded by the remaining bytes: every arg costs at least its prefix.
    let mut args = Vec::with_capacity((count as usize).min((buf.len() - cur.offset) / 4));
    for _ in 0..count {
        args.push(cur.string("args")?);
    }

    let deploy_slot = cur.u64("deploy_slot")?;
    let bump = cur.u8("bump")?;

    Ok(AccountRecord { address, signer, version, git_url, commit, args, deploy_slot, bump })
}

/// A field too long for its `u32` length prefix.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("field {field} has length {len}, which does not fit a u32 prefix")]
pub struct EncodeError {
    pub field: &'static str,
    pub len: usize,
}

/// Little-endian `u32` prefix for a string or list of `len` elements.
pub fn length_prefix(field: &'static str, len: usize) -> Result<[u8; 4], EncodeError> {
    u32::try_from(len).map(u32::to_le_bytes).map_err(|_| EncodeError { field, len })
}

/// Encode a record in the on-chain layout.
pub fn encode_account_record(record: &AccountRecord) -> Result<Vec<u8>, EncodeError> {
    fn put_str(out: &mut Vec<u8>, field: &'static str, s: &str) -> Result<(), EncodeError> {
        out.extend_from_slice(&length_prefix(field, s.len())?);
        out.extend_from_slice(s.as_bytes());
        Ok(())
    }

    let mut out = Vec::new();
    out.extend_from_slice(record.address.as_bytes());
    out.extend_from_slice(record.signer.as_bytes());
    put_str(&mut out, "version", &record.version)?;
    put_str(&mut out, "git_url", &record.git_url)?;
    put_str(&mut out, "commit", &record.commit)?;
    out.extend_from_slice(&length_prefix("args_count", record.args.len())?);
    for arg in &record.args {
        put_str(&mut out, "args", arg)?;
    }
    out.extend_from_slice(&record.deploy_slot.to_le_bytes());
    out.push(record.bump);
    Ok(out)
}

/// Drop `len` leading tag bytes from a raw account buffer.
pub fn strip_discriminator(buf: &[u8], len: usize) -> Result<&[u8], DecodeError> {
    buf.get(len..).ok_or(DecodeError::TruncatedRecord {
        field: "discriminator",
        offset: 0,
        needed: len,
        available: buf.len(),
    })
}
