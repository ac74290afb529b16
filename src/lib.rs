//! # hubindex - static plugin search index
//!
//! Builds a plugin catalog into a single binary artifact at deploy time and
//! serves filterable, sortable text search from it at runtime. There is no
//! query server: clients fetch the artifact once and query it in memory.
//!
//! ## Architecture
//!
//! - [`index`] - Record preparation, artifact writer/codec, materialized reader, loader
//! - [`query`] - Text scoring, filters, sorting and pagination
//! - [`search`] - Lazily loading client, display projection, stateful orchestrator
//! - [`catalog`] - Full plugin records keyed by `owner/name`
//! - [`output`] - Terminal formatting
//! - [`utils`] - Tokenizer, encoding, configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use hubindex::index::IndexLoader;
//! use hubindex::search::{PageOptions, PluginFilters, PluginSearch, SearchClient};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let loader = Arc::new(IndexLoader::from_location("https://hub.example.org/plugin-index.bin"));
//! let search = PluginSearch::new(SearchClient::new(loader));
//!
//! let filters = PluginFilters {
//!     query: Some("essentials".to_string()),
//!     ..Default::default()
//! };
//! for plugin in search.search(&filters, &PageOptions::default()).await {
//!     println!("{} ({} downloads)", plugin.id, plugin.downloads);
//! }
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod search;
pub mod utils;

pub use error::{BuildError, CatalogError, LoadError, QueryError, SearchError};
