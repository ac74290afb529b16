//! Search orchestrator: convenience queries, projection and observable state.

mod common;

use common::{GatedSource, MemorySource, artifact, sample_records};
use hubindex::SearchError;
use hubindex::index::{IndexLoader, License};
use hubindex::query::SortBy;
use hubindex::search::{PageOptions, PluginFilters, PluginSearch, SHOWCASE_LIMIT, SearchClient};
use std::sync::Arc;

fn orchestrator(source: Arc<MemorySource>) -> PluginSearch {
    PluginSearch::new(SearchClient::new(Arc::new(IndexLoader::new(source))))
}

fn ids(summaries: &[hubindex::search::PluginSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.id.as_str()).collect()
}

#[tokio::test]
async fn test_search_projects_and_marks_loaded() {
    let search = orchestrator(MemorySource::new(artifact(&sample_records())));
    assert!(!search.is_index_loaded());

    let filters = PluginFilters {
        query: Some("  essentials ".to_string()),
        ..Default::default()
    };
    let results = search.search(&filters, &PageOptions::default()).await;

    assert_eq!(ids(&results), vec!["allay/essentials"]);
    let plugin = &results[0];
    assert_eq!(plugin.name, "Allay Essentials");
    assert_eq!(plugin.created_at, "2023-11-14T22:13:20.000Z");
    assert_eq!(
        plugin.icon_url.as_deref(),
        Some("https://cdn.example.org/essentials.png")
    );
    assert_eq!(plugin.gallery_image, None);

    let state = search.state();
    assert!(state.is_index_loaded);
    assert!(!state.is_searching);
    assert!(state.search_error.is_none());
}

#[tokio::test]
async fn test_failed_search_degrades_to_empty() {
    let source = MemorySource::new(artifact(&sample_records()));
    source.set_failing(true);
    let search = orchestrator(source.clone());

    let results = search
        .search(&PluginFilters::default(), &PageOptions::default())
        .await;
    assert!(results.is_empty());
    assert!(matches!(
        search.search_error().as_deref(),
        Some(SearchError::Load(_))
    ));
    assert!(!search.is_searching());
    assert!(!search.is_index_loaded());

    // The next attempt clears the error
    source.set_failing(false);
    let results = search
        .search(&PluginFilters::default(), &PageOptions::default())
        .await;
    assert_eq!(results.len(), sample_records().len());
    assert!(search.search_error().is_none());
}

#[tokio::test]
async fn test_no_matches_is_not_an_error() {
    let search = orchestrator(MemorySource::new(artifact(&sample_records())));
    let filters = PluginFilters {
        categories: Some(vec!["cursed".to_string()]),
        ..Default::default()
    };

    let results = search.search(&filters, &PageOptions::default()).await;
    assert!(results.is_empty());
    assert!(search.search_error().is_none());
}

#[tokio::test]
async fn test_paging() {
    let search = orchestrator(MemorySource::new(artifact(&sample_records())));
    let all = PluginFilters::default();

    let first = search
        .search(&all, &PageOptions::default().with_page(1, 3))
        .await;
    let third = search
        .search(&all, &PageOptions::default().with_page(3, 3))
        .await;
    assert_eq!(
        ids(&first),
        vec!["builder/worldedit", "allay/essentials", "tiny/allaylib"]
    );
    assert_eq!(ids(&third), vec!["worldedit/edithelper"]);
}

#[tokio::test]
async fn test_total_count_ignores_paging() {
    let search = orchestrator(MemorySource::new(artifact(&sample_records())));

    let count = search
        .get_total_count(&PluginFilters {
            license: Some(License::OpenSource),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(count, 4);

    let count = search
        .get_total_count(&PluginFilters::default())
        .await
        .unwrap();
    assert_eq!(count, sample_records().len());

    let count = search
        .get_total_count(&PluginFilters {
            query: Some("allay".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_total_count_propagates_errors() {
    let source = MemorySource::new(artifact(&sample_records()));
    source.set_failing(true);
    let search = orchestrator(source);

    assert!(search
        .get_total_count(&PluginFilters::default())
        .await
        .is_err());
}

#[tokio::test]
async fn test_convenience_queries() {
    let search = orchestrator(MemorySource::new(artifact(&sample_records())));

    let popular = search.get_popular(2).await;
    assert_eq!(ids(&popular), vec!["builder/worldedit", "allay/essentials"]);

    let featured = search.get_featured(SHOWCASE_LIMIT).await;
    assert_eq!(featured[0].id, "builder/worldedit");
    assert!(featured.windows(2).all(|w| w[0].stars >= w[1].stars));

    let recent = search.get_recently_updated(1).await;
    assert_eq!(ids(&recent), vec!["mini/bedwars"]);

    let utility = search
        .get_by_category("utility", &PageOptions::default())
        .await;
    assert_eq!(
        ids(&utility),
        vec!["builder/worldedit", "allay/essentials", "worldedit/edithelper"]
    );

    let newest_utility = search
        .get_by_category("utility", &PageOptions::sorted(SortBy::Newest))
        .await;
    assert_eq!(newest_utility[0].id, "worldedit/edithelper");
}

#[tokio::test]
async fn test_preload_swallows_errors() {
    let source = MemorySource::new(artifact(&sample_records()));
    source.set_failing(true);
    let search = orchestrator(source.clone());

    search.preload_index().await;
    assert!(!search.is_index_loaded());
    assert!(search.search_error().is_none());

    source.set_failing(false);
    search.preload_index().await;
    assert!(search.is_index_loaded());
    assert!(search.client().loader().is_loaded());
}

#[tokio::test]
async fn test_overlapping_searches_keep_searching_flag() {
    let source = GatedSource::new(artifact(&sample_records()));
    let search = PluginSearch::new(SearchClient::new(Arc::new(IndexLoader::new(source.clone()))));
    let all = PluginFilters::default();
    let options = PageOptions::default();

    let first = search.search(&all, &options);
    tokio::pin!(first);
    assert!(futures::poll!(first.as_mut()).is_pending());

    // A reset makes the second search start its own fetch
    search.client().reset();
    let second = search.search(&all, &options);
    tokio::pin!(second);
    assert!(futures::poll!(second.as_mut()).is_pending());
    assert!(search.is_searching());

    source.release(1);
    assert_eq!(first.await.len(), sample_records().len());
    assert!(search.is_searching());

    source.release(1);
    assert_eq!(second.await.len(), sample_records().len());
    assert!(!search.is_searching());
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_state_is_observable() {
    let search = orchestrator(MemorySource::new(artifact(&sample_records())));
    let mut updates = search.subscribe();
    assert!(!updates.borrow_and_update().is_searching);

    search.get_popular(1).await;
    assert!(updates.has_changed().unwrap());
    let state = updates.borrow_and_update().clone();
    assert!(state.is_index_loaded);
    assert!(!state.is_searching);
}
