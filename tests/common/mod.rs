//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use hubindex::LoadError;
use hubindex::index::build::prepare_document;
use hubindex::index::{ArtifactSource, IndexWriter, SearchIndex};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Semaphore;

pub const PLUGINS_JSON: &str = include_str!("../fixtures/plugins.json");

pub fn sample_records() -> Vec<Value> {
    serde_json::from_str(PLUGINS_JSON).unwrap()
}

/// Artifact bytes for `records`, built in memory
pub fn artifact(records: &[Value]) -> Vec<u8> {
    let mut writer = IndexWriter::new();
    for (i, record) in records.iter().enumerate() {
        writer.add_document(prepare_document(i, record).unwrap());
    }
    writer.to_bytes().unwrap()
}

pub fn sample_index() -> SearchIndex {
    SearchIndex::restore(&artifact(&sample_records())).unwrap()
}

/// In-memory artifact source counting its fetches
pub struct MemorySource {
    bytes: Vec<u8>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            bytes,
            fetches: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArtifactSource for MemorySource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Let other callers pile up behind the in-flight load
        tokio::task::yield_now().await;

        if self.failing.load(Ordering::SeqCst) {
            return Err(LoadError::Fetch {
                location: self.location(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.bytes.clone())
    }

    fn location(&self) -> String {
        "memory://plugin-index.bin".to_string()
    }
}

/// Artifact source whose fetches wait until [`GatedSource::release`] lets them through,
/// in the order they started
pub struct GatedSource {
    bytes: Vec<u8>,
    gate: Semaphore,
    fetches: AtomicUsize,
}

impl GatedSource {
    pub fn new(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            bytes,
            gate: Semaphore::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn release(&self, fetches: usize) {
        self.gate.add_permits(fetches);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactSource for GatedSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let permit = self.gate.acquire().await.map_err(|e| LoadError::Fetch {
            location: self.location(),
            message: e.to_string(),
        })?;
        permit.forget();
        Ok(self.bytes.clone())
    }

    fn location(&self) -> String {
        "gated://plugin-index.bin".to_string()
    }
}
