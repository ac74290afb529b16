//! Error types for building, loading and querying the plugin index.
//!
//! Each stage has its own error so callers can tell a broken build from a
//! failed fetch from a degraded query.

use crate::index::types::DocId;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failure while turning raw records into an artifact. Always fatal.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("input is not a JSON array of records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("record {index} has invalid fields: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode artifact: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to write artifact {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while fetching or restoring the artifact.
///
/// One attempt's error is handed to every caller waiting on that attempt,
/// which is why loaders return it behind an `Arc`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch artifact from {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("not a plugin index artifact")]
    BadMagic,

    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("artifact is truncated")]
    Truncated,

    #[error("artifact checksum mismatch")]
    Checksum,

    #[error("artifact payload is malformed: {0}")]
    Malformed(String),

    #[error("artifact schema is incompatible: {0}")]
    IncompatibleSchema(String),
}

/// Unexpected failure while executing a query against a materialized index.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("posting references unknown document {0}")]
    DanglingDocument(DocId),
}

/// Anything that can make a search call fail.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Load(#[from] Arc<LoadError>),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Failure while building or reading the plugin-detail lookup table.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to walk catalog directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("plugin not found: {0}")]
    NotFound(String),

    #[error("plugin {id} has an unexpected shape: {source}")]
    InvalidDetail {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
