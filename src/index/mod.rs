pub mod artifact;
pub mod build;
pub mod loader;
pub mod normalize;
pub mod reader;
pub mod stats;
pub mod types;
pub mod writer;

pub use build::{BuildSummary, build_index, build_index_from_reader};
pub use loader::{ArtifactSource, FileSource, HttpSource, IndexHandle, IndexLoader};
pub use normalize::{RawRecord, api_major, derive_fields, is_version_outdated, normalize_record};
pub use reader::SearchIndex;
pub use types::*;
pub use writer::IndexWriter;
