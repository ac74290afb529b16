//! Convenience queries with observable loading and error state.
//!
//! [`PluginSearch::search`] never fails: an error is recorded in
//! [`SearchState::search_error`] and the call returns an empty list, so
//! "no matches" and "search degraded" are told apart only by that flag.

use crate::error::SearchError;
use crate::index::loader::IndexLoader;
use crate::index::types::License;
use crate::query::{SearchFilters, SearchOptions, SortBy};
use crate::search::client::SearchClient;
use crate::search::projector::{PluginSummary, to_summary};
use crate::utils::AppConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{error, warn};

/// Page size when paging without an explicit limit
pub const DEFAULT_PER_PAGE: usize = 20;
/// Result cap when neither a limit nor a page is given
pub const UNPAGED_LIMIT: usize = 100;
/// Size of the fixed showcase lists
pub const SHOWCASE_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// True while at least one `search` call is in flight
    pub is_searching: bool,
    /// Error of the most recent `search`, cleared when the next one starts
    pub search_error: Option<Arc<SearchError>>,
    /// Set once any query has succeeded
    pub is_index_loaded: bool,
}

/// User-facing filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginFilters {
    pub query: Option<String>,
    pub categories: Option<Vec<String>>,
    pub api_major: Option<i64>,
    pub license: Option<License>,
}

impl PluginFilters {
    pub fn category(id: impl Into<String>) -> Self {
        Self {
            categories: Some(vec![id.into()]),
            ..Default::default()
        }
    }

    fn term(&self) -> String {
        self.query.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    fn to_filters(&self) -> SearchFilters {
        SearchFilters {
            categories: self.categories.clone().filter(|c| !c.is_empty()),
            license: self.license,
            api_major: self.api_major,
        }
    }
}

/// Sorting and paging for a `search` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub sort: SortBy,
    pub limit: Option<usize>,
    /// 1-based; `Some(0)` behaves like `None`
    pub page: Option<usize>,
    pub per_page: usize,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            sort: SortBy::Downloads,
            limit: None,
            page: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageOptions {
    pub fn sorted(sort: SortBy) -> Self {
        Self {
            sort,
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = per_page;
        self
    }

    fn page(&self) -> Option<usize> {
        self.page.filter(|&p| p > 0)
    }

    /// Explicit limit, else one page when paging, else [`UNPAGED_LIMIT`]
    pub fn effective_limit(&self) -> usize {
        match (self.limit, self.page()) {
            (Some(limit), _) => limit,
            (None, Some(_)) => self.per_page,
            (None, None) => UNPAGED_LIMIT,
        }
    }

    pub fn effective_offset(&self) -> usize {
        self.page()
            .map_or(0, |page| (page - 1).saturating_mul(self.per_page))
    }
}

/// Number of pages needed for `total` items
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Counts one in-flight search; `is_searching` stays set until the last one ends.
///
/// The counter only changes inside `send_modify`, so it moves in step with
/// the published flag.
struct Searching<'a> {
    state: &'a watch::Sender<SearchState>,
    in_flight: &'a AtomicUsize,
}

impl<'a> Searching<'a> {
    fn start(state: &'a watch::Sender<SearchState>, in_flight: &'a AtomicUsize) -> Self {
        state.send_modify(|state| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            state.is_searching = true;
            state.search_error = None;
        });
        Self { state, in_flight }
    }
}

impl Drop for Searching<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_modify(|state| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            state.is_searching = remaining > 0;
        });
    }
}

pub struct PluginSearch {
    client: SearchClient,
    state: watch::Sender<SearchState>,
    in_flight: AtomicUsize,
}

impl PluginSearch {
    pub fn new(client: SearchClient) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            client,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let loader = Arc::new(IndexLoader::from_config(config));
        Self::new(SearchClient::new(loader).with_tolerance(config.tolerance as usize))
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    /// Search and project results; failures degrade to an empty list
    pub async fn search(&self, filters: &PluginFilters, options: &PageOptions) -> Vec<PluginSummary> {
        let _searching = Searching::start(&self.state, &self.in_flight);

        let request = SearchOptions::new(filters.term())
            .with_filters(filters.to_filters())
            .with_sort(options.sort)
            .with_limit(options.effective_limit())
            .with_offset(options.effective_offset());

        match self.client.search_plugins(&request).await {
            Ok(result) => {
                self.state.send_modify(|state| state.is_index_loaded = true);
                result.hits.iter().map(to_summary).collect()
            }
            Err(e) => {
                error!(error = %e, "search failed");
                let e = Arc::new(e);
                self.state.send_modify(|state| state.search_error = Some(e));
                Vec::new()
            }
        }
    }

    /// Number of plugins matching `filters`. Errors propagate.
    ///
    /// Counting happens before paging, so no hits are materialized.
    pub async fn get_total_count(&self, filters: &PluginFilters) -> Result<usize, SearchError> {
        let request = SearchOptions::new(filters.term())
            .with_filters(filters.to_filters())
            .with_limit(0);
        Ok(self.client.search_plugins(&request).await?.count)
    }

    pub async fn get_by_category(&self, category_id: &str, options: &PageOptions) -> Vec<PluginSummary> {
        self.search(&PluginFilters::category(category_id), options).await
    }

    pub async fn get_recently_updated(&self, limit: usize) -> Vec<PluginSummary> {
        self.search(&PluginFilters::default(), &PageOptions::sorted(SortBy::Updated).with_limit(limit))
            .await
    }

    pub async fn get_popular(&self, limit: usize) -> Vec<PluginSummary> {
        self.search(&PluginFilters::default(), &PageOptions::sorted(SortBy::Downloads).with_limit(limit))
            .await
    }

    pub async fn get_featured(&self, limit: usize) -> Vec<PluginSummary> {
        self.search(&PluginFilters::default(), &PageOptions::sorted(SortBy::Stars).with_limit(limit))
            .await
    }

    /// Materialize the index ahead of the first real query. Never fails.
    pub async fn preload_index(&self) {
        match self
            .client
            .get_all_plugins(SearchFilters::default(), SortBy::Downloads, 1)
            .await
        {
            Ok(_) => self.state.send_modify(|state| state.is_index_loaded = true),
            Err(e) => warn!(error = %e, "failed to preload search index"),
        }
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn is_searching(&self) -> bool {
        self.state.borrow().is_searching
    }

    pub fn search_error(&self) -> Option<Arc<SearchError>> {
        self.state.borrow().search_error.clone()
    }

    pub fn is_index_loaded(&self) -> bool {
        self.state.borrow().is_index_loaded
    }
}
