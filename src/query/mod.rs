//! Query execution over a materialized [`SearchIndex`](crate::index::SearchIndex).

pub mod executor;
pub mod options;
pub mod scorer;

pub use executor::{QueryExecutor, compare_for_sort};
pub use options::{DEFAULT_LIMIT, SearchFilters, SearchOptions, SearchResult, SortBy};
pub use scorer::{DEFAULT_TOLERANCE, FieldBoosts, MatchKind, Scorer};
