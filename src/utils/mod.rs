//! Shared utilities.
//!
//! - [`app_data`] - Configuration file in the per-user app data directory
//! - [`encoding`] - Varint and delta encoding for posting lists
//! - [`progress`] - Optional progress spinner
//! - [`tokenizer`] - Name tokenization (camelCase aware, no stemming)
//!
//! ```
//! use hubindex::utils::tokenize;
//!
//! let tokens = tokenize("WorldEdit Plus");
//! assert_eq!(tokens, vec!["world", "edit", "worldedit", "plus", "worldeditplus"]);
//! ```

pub mod app_data;
pub mod encoding;
pub mod progress;
pub mod tokenizer;

pub use app_data::*;
pub use encoding::*;
pub use progress::spinner;
pub use tokenizer::*;
