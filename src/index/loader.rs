//! Artifact loading with at most one materialization in flight.
//!
//! [`IndexLoader`] is owned by whoever constructs it and shared by reference
//! (or `Arc`). Concurrent [`IndexLoader::load`] calls join the same pending
//! fetch+restore; once it resolves the handle is cached until
//! [`IndexLoader::reset`].

use crate::error::LoadError;
use crate::index::reader::SearchIndex;
use crate::utils::AppConfig;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info};

/// Route the static site serves the artifact from
pub const DEFAULT_ARTIFACT_PATH: &str = "/plugin-index.bin";

/// Shared, immutable handle to a materialized index
pub type IndexHandle = Arc<SearchIndex>;

type LoadResult = Result<IndexHandle, Arc<LoadError>>;
type LoadFuture = Shared<BoxFuture<'static, LoadResult>>;

/// Where artifact bytes come from
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;

    /// Human-readable location, for logs and errors
    fn location(&self) -> String;
}

/// Fetches the artifact over HTTP(S)
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ArtifactSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let fetch_err = |e: reqwest::Error| LoadError::Fetch {
            location: self.url.clone(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?;
        let bytes = response.bytes().await.map_err(fetch_err)?;

        Ok(bytes.to_vec())
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Reads the artifact from the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ArtifactSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| LoadError::Fetch {
                location: self.location(),
                message: e.to_string(),
            })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a source for `location`: http(s) URLs are fetched, anything else is a path
pub fn source_for(location: &str) -> Arc<dyn ArtifactSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(location))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Arc::new(FileSource::new(path))
    }
}

enum LoadState {
    Idle,
    Loading { attempt: u64, future: LoadFuture },
    Ready(IndexHandle),
}

pub struct IndexLoader {
    source: Arc<dyn ArtifactSource>,
    state: Mutex<LoadState>,
    attempts: AtomicU64,
}

impl IndexLoader {
    pub fn new(source: Arc<dyn ArtifactSource>) -> Self {
        Self {
            source,
            state: Mutex::new(LoadState::Idle),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn from_location(location: &str) -> Self {
        Self::new(source_for(location))
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_location(&config.artifact_location())
    }

    pub fn location(&self) -> String {
        self.source.location()
    }

    /// Get the materialized index, fetching and restoring it on first use.
    ///
    /// Callers arriving while a load is in flight await that same load. A
    /// failed attempt is reported to all of its waiters and leaves nothing
    /// cached, so the next call retries.
    pub async fn load(&self) -> LoadResult {
        let (attempt, future) = {
            let mut state = self.state.lock();
            match &*state {
                LoadState::Ready(handle) => return Ok(Arc::clone(handle)),
                LoadState::Loading { attempt, future } => (*attempt, future.clone()),
                LoadState::Idle => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    let future = materialize(Arc::clone(&self.source), attempt)
                        .boxed()
                        .shared();
                    *state = LoadState::Loading {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let result = future.await;
        self.settle(attempt, &result);
        result
    }

    /// Record the outcome of `attempt`, unless a reset superseded it
    fn settle(&self, attempt: u64, result: &LoadResult) {
        let mut state = self.state.lock();
        let current = matches!(&*state, LoadState::Loading { attempt: a, .. } if *a == attempt);
        if !current {
            return;
        }

        match result {
            Ok(handle) => *state = LoadState::Ready(Arc::clone(handle)),
            Err(e) => {
                error!(attempt, error = %e, "index load failed");
                *state = LoadState::Idle;
            }
        }
    }

    /// The cached handle, if a load has completed
    pub fn cached(&self) -> Option<IndexHandle> {
        match &*self.state.lock() {
            LoadState::Ready(handle) => Some(Arc::clone(handle)),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cached().is_some()
    }

    /// Drop the cached handle and forget any in-flight load.
    ///
    /// Callers already awaiting the old load still receive its result, but
    /// it is not cached.
    pub fn reset(&self) {
        debug!("index loader reset");
        *self.state.lock() = LoadState::Idle;
    }

    /// Number of fetches started so far
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

async fn materialize(source: Arc<dyn ArtifactSource>, attempt: u64) -> LoadResult {
    let location = source.location();
    debug!(attempt, %location, "fetching index artifact");

    let bytes = source.fetch().await.map_err(Arc::new)?;
    let index = SearchIndex::restore(&bytes).map_err(Arc::new)?;

    info!(
        attempt,
        documents = index.len(),
        bytes = bytes.len(),
        "index materialized"
    );
    Ok(Arc::new(index))
}
