//! Binary artifact container.
//!
//! Layout (little-endian):
//!
//! ```text
//! magic "HUBX" | format version u32 | payload length u64 | crc32 u32 | payload
//! ```
//!
//! The payload is a named-field MessagePack encoding of [`IndexSnapshot`],
//! so it carries its own field names next to the schema it was built with.

use crate::error::LoadError;
use crate::index::types::{IndexedDocument, Schema};
use serde::{Deserialize, Serialize};

pub const MAGIC: &[u8; 4] = b"HUBX";
pub const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 8 + 4;

/// Postings of one term, delta + varint encoded doc ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPostings {
    pub term: String,
    #[serde(with = "serde_bytes")]
    pub postings: Vec<u8>,
}

/// Term dictionary of one text field, sorted by term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPostings {
    pub field: String,
    pub terms: Vec<TermPostings>,
}

/// Everything needed to restore a queryable index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub schema: Schema,
    pub documents: Vec<IndexedDocument>,
    pub text_fields: Vec<FieldPostings>,
}

/// Serialize a snapshot into a self-contained artifact
pub fn encode(snapshot: &IndexSnapshot) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    let payload = rmp_serde::to_vec_named(snapshot)?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);

    Ok(out)
}

/// Validate the container and decode its snapshot
pub fn decode(bytes: &[u8]) -> Result<IndexSnapshot, LoadError> {
    if bytes.len() < HEADER_LEN {
        return Err(if bytes.starts_with(MAGIC) || bytes.is_empty() {
            LoadError::Truncated
        } else {
            LoadError::BadMagic
        });
    }
    if &bytes[..4] != MAGIC {
        return Err(LoadError::BadMagic);
    }

    let version = u32::from_le_bytes(header_word(bytes, 4)?);
    if version != FORMAT_VERSION {
        return Err(LoadError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }
    let payload_len = u64::from_le_bytes(header_word(bytes, 8)?);
    let checksum = u32::from_le_bytes(header_word(bytes, 16)?);

    let payload = &bytes[HEADER_LEN..];
    if (payload.len() as u64) < payload_len {
        return Err(LoadError::Truncated);
    }
    if (payload.len() as u64) > payload_len {
        return Err(LoadError::Malformed(format!(
            "{} trailing bytes after payload",
            payload.len() as u64 - payload_len
        )));
    }
    if crc32fast::hash(payload) != checksum {
        return Err(LoadError::Checksum);
    }

    rmp_serde::from_slice(payload).map_err(|e| LoadError::Malformed(e.to_string()))
}

/// Fixed-size little-endian word at `offset` within the header
fn header_word<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], LoadError> {
    bytes
        .get(offset..offset + N)
        .and_then(|word| word.try_into().ok())
        .ok_or(LoadError::Truncated)
}
