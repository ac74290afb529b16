//! Index loader: single in-flight materialization, caching, reset and retry.

mod common;

use common::{MemorySource, artifact, sample_records};
use futures::future::join_all;
use hubindex::LoadError;
use hubindex::index::IndexLoader;
use std::sync::Arc;

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    let source = MemorySource::new(artifact(&sample_records()));
    let loader = IndexLoader::new(source.clone());

    let handles = join_all((0..8).map(|_| loader.load())).await;
    let handles: Vec<_> = handles.into_iter().map(Result::unwrap).collect();

    assert_eq!(source.fetches(), 1);
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));

    // Resolved: later calls hit the cache
    let again = loader.load().await.unwrap();
    assert!(Arc::ptr_eq(&again, &handles[0]));
    assert_eq!(source.fetches(), 1);
    assert_eq!(loader.attempts(), 1);
}

#[tokio::test]
async fn test_concurrent_loads_across_tasks() {
    let source = MemorySource::new(artifact(&sample_records()));
    let loader = Arc::new(IndexLoader::new(source.clone()));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load().await })
        })
        .collect();

    let mut handles = Vec::new();
    for task in tasks {
        handles.push(task.await.unwrap().unwrap());
    }

    assert_eq!(source.fetches(), 1);
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
}

#[tokio::test]
async fn test_reset_forces_fresh_fetch() {
    let source = MemorySource::new(artifact(&sample_records()));
    let loader = IndexLoader::new(source.clone());

    let first = loader.load().await.unwrap();
    assert!(loader.is_loaded());

    loader.reset();
    assert!(loader.cached().is_none());

    let second = loader.load().await.unwrap();
    assert_eq!(source.fetches(), 2);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn test_failure_reaches_every_waiter_then_retries() {
    let source = MemorySource::new(artifact(&sample_records()));
    source.set_failing(true);
    let loader = IndexLoader::new(source.clone());

    let results = join_all((0..3).map(|_| loader.load())).await;
    assert_eq!(source.fetches(), 1);
    for result in &results {
        let err = result.as_ref().unwrap_err();
        assert!(matches!(**err, LoadError::Fetch { .. }));
    }
    assert!(loader.cached().is_none());

    source.set_failing(false);
    let handle = loader.load().await.unwrap();
    assert_eq!(handle.len(), sample_records().len());
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_malformed_artifact_is_not_cached() {
    let source = MemorySource::new(b"<!doctype html>".to_vec());
    let loader = IndexLoader::new(source.clone());

    let err = loader.load().await.unwrap_err();
    assert!(matches!(*err, LoadError::BadMagic));

    let _ = loader.load().await;
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_reset_during_load_discards_result() {
    let source = MemorySource::new(artifact(&sample_records()));
    let loader = IndexLoader::new(source.clone());

    let pending = loader.load();
    let reset_then_load = async {
        tokio::task::yield_now().await;
        loader.reset();
        loader.load().await
    };
    let (old, new) = tokio::join!(pending, reset_then_load);

    // The superseded load still answers its own caller
    let old = old.unwrap();
    let new = new.unwrap();
    assert_eq!(source.fetches(), 2);
    assert!(!Arc::ptr_eq(&old, &new));
    assert!(Arc::ptr_eq(&loader.cached().unwrap(), &new));
}
