use crate::error::SearchError;
use crate::index::loader::IndexLoader;
use crate::query::{FieldBoosts, QueryExecutor, Scorer, SearchFilters, SearchOptions, SearchResult, SortBy};
use std::sync::Arc;

/// Default cap for listing queries
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Query entry point over a lazily loaded index
#[derive(Clone)]
pub struct SearchClient {
    loader: Arc<IndexLoader>,
    scorer: Scorer,
}

impl SearchClient {
    pub fn new(loader: Arc<IndexLoader>) -> Self {
        Self {
            loader,
            scorer: Scorer::with_defaults(),
        }
    }

    /// Use a different fuzzy-match tolerance
    pub fn with_tolerance(mut self, tolerance: usize) -> Self {
        self.scorer = Scorer::new(FieldBoosts::default(), tolerance);
        self
    }

    pub fn loader(&self) -> &Arc<IndexLoader> {
        &self.loader
    }

    /// Load the index if needed and run one query
    pub async fn search_plugins(&self, options: &SearchOptions) -> Result<SearchResult, SearchError> {
        let index = self.loader.load().await?;
        let result = QueryExecutor::with_scorer(&index, self.scorer.clone()).execute(options)?;
        Ok(result)
    }

    /// List plugins without a text term
    pub async fn get_all_plugins(
        &self,
        filters: SearchFilters,
        sort_by: SortBy,
        limit: usize,
    ) -> Result<SearchResult, SearchError> {
        let options = SearchOptions::default()
            .with_filters(filters)
            .with_sort(sort_by)
            .with_limit(limit);
        self.search_plugins(&options).await
    }

    /// Forget the loaded index so the next query fetches it again
    pub fn reset(&self) {
        self.loader.reset();
    }
}
