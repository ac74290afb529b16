use crate::error::QueryError;
use crate::index::reader::SearchIndex;
use crate::index::types::{DocId, IndexedDocument};
use crate::query::options::{SearchFilters, SearchOptions, SearchResult, SortBy};
use crate::query::scorer::Scorer;
use crate::utils::tokenize;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::trace;

/// Query executor
pub struct QueryExecutor<'a> {
    index: &'a SearchIndex,
    scorer: Scorer,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            scorer: Scorer::with_defaults(),
        }
    }

    pub fn with_scorer(index: &'a SearchIndex, scorer: Scorer) -> Self {
        Self { index, scorer }
    }

    /// Execute a query: match, filter, count, sort, then slice the page
    pub fn execute(&self, options: &SearchOptions) -> Result<SearchResult, QueryError> {
        let start = Instant::now();

        let tokens = tokenize(&options.term);
        let scores = (!tokens.is_empty()).then(|| self.scorer.score(self.index, &tokens));

        let mut candidates: RoaringBitmap = match &scores {
            Some(scores) => scores.keys().copied().collect(),
            None => self.index.all_docs().clone(),
        };
        self.apply_filters(&mut candidates, &options.filters);
        let count = candidates.len() as usize;

        let page: Vec<DocId> = match (&scores, self.index.sort_index()) {
            // Match-all queries page straight through the presorted order
            (None, Some(sorted)) => sorted
                .order(options.sort_by)
                .iter()
                .copied()
                .filter(|&id| candidates.contains(id))
                .skip(options.offset)
                .take(options.limit)
                .collect(),
            _ => {
                let mut ids: Vec<DocId> = candidates.iter().collect();
                self.sort_results(&mut ids, options.sort_by, scores.as_ref());
                ids.into_iter()
                    .skip(options.offset)
                    .take(options.limit)
                    .collect()
            }
        };

        let hits = page
            .into_iter()
            .map(|id| {
                self.index
                    .document(id)
                    .cloned()
                    .ok_or(QueryError::DanglingDocument(id))
            })
            .collect::<Result<Vec<IndexedDocument>, _>>()?;

        let elapsed = start.elapsed();
        trace!(
            term = %options.term,
            count,
            returned = hits.len(),
            ?elapsed,
            "query executed"
        );

        Ok(SearchResult {
            hits,
            count,
            elapsed,
        })
    }

    /// Narrow the candidate set by every active filter
    fn apply_filters(&self, candidates: &mut RoaringBitmap, filters: &SearchFilters) {
        if let Some(wanted) = filters.categories.as_ref().filter(|c| !c.is_empty()) {
            let mut any_of = RoaringBitmap::new();
            for category in wanted {
                if let Some(docs) = self.index.category_docs(category) {
                    any_of |= docs;
                }
            }
            *candidates &= &any_of;
        }

        if let Some(license) = filters.license {
            match self.index.license_docs(license) {
                Some(docs) => *candidates &= docs,
                None => candidates.clear(),
            }
        }

        if let Some(bound) = filters.api_major {
            if bound < 0 {
                candidates.clear();
            } else {
                let over: RoaringBitmap = candidates
                    .iter()
                    .filter(|&id| {
                        self.index
                            .document(id)
                            .is_some_and(|doc| doc.api_major > bound as u64)
                    })
                    .collect();
                *candidates -= over;
            }
        }
    }

    /// Sort key descending, then score descending, then doc id ascending
    fn sort_results(&self, ids: &mut [DocId], sort: SortBy, scores: Option<&FxHashMap<DocId, f32>>) {
        let key = |id: DocId| self.index.document(id).map_or(0, |doc| sort.key(doc));
        let score = |id: DocId| scores.and_then(|s| s.get(&id)).copied().unwrap_or(0.0);

        ids.sort_by(|&a, &b| {
            key(b)
                .cmp(&key(a))
                .then_with(|| score(b).total_cmp(&score(a)))
                .then_with(|| a.cmp(&b))
        });
    }
}

/// Compare two documents the way result lists are ordered, ignoring relevance
pub fn compare_for_sort(sort: SortBy, a: (DocId, &IndexedDocument), b: (DocId, &IndexedDocument)) -> Ordering {
    sort.key(b.1).cmp(&sort.key(a.1)).then(a.0.cmp(&b.0))
}
