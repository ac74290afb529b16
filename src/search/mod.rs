//! Search surface consumed by UI code: a client over the lazily loaded
//! index, the display projection, and the stateful orchestrator.

pub mod client;
pub mod orchestrator;
pub mod projector;

pub use client::{DEFAULT_LIST_LIMIT, SearchClient};
pub use orchestrator::{PageOptions, PluginFilters, PluginSearch, SHOWCASE_LIMIT, SearchState, total_pages};
pub use projector::{PluginSummary, to_iso_timestamp, to_summary};
