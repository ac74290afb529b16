//! Plugin-detail lookup table, separate from the search index.
//!
//! Full records live as `<owner>/<name>.json` files. The catalog reads them
//! once, resolves shadow keys, and keys each record by `owner/name`.

pub mod categories;
pub mod detail;

pub use categories::{CATEGORIES, Category, category_by_id, category_ids, category_name};
pub use detail::{PluginDetail, ReleaseChannel, Version, VersionFile, format_file_size};

use crate::error::CatalogError;
use crate::index::normalize::{RawRecord, normalize_record};
use ignore::WalkBuilder;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct PluginCatalog {
    records: BTreeMap<String, RawRecord>,
}

impl PluginCatalog {
    /// Load every `*.json` record below `root`
    pub fn from_dir(root: &Path) -> Result<Self, CatalogError> {
        let mut records = BTreeMap::new();

        let walker = WalkBuilder::new(root).standard_filters(false).build();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = catalog_id(root, path) else {
                continue;
            };

            let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let value: Value = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            let Value::Object(raw) = value else {
                warn!(path = %path.display(), "skipping catalog file that is not an object");
                continue;
            };

            records.insert(id, normalize_record(&raw));
        }

        debug!(root = %root.display(), plugins = records.len(), "catalog loaded");
        Ok(Self { records })
    }

    /// Build from `(id, record)` pairs, normalizing each record
    pub fn from_records(records: impl IntoIterator<Item = (String, RawRecord)>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|(id, raw)| (id, normalize_record(&raw)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Exact lookup by `owner/name`
    pub fn get(&self, id: &str) -> Result<&RawRecord, CatalogError> {
        self.records
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Exact lookup, typed
    pub fn detail(&self, id: &str) -> Result<PluginDetail, CatalogError> {
        let record = self.get(id)?;
        serde_json::from_value(Value::Object(record.clone())).map_err(|source| {
            CatalogError::InvalidDetail {
                id: id.to_string(),
                source,
            }
        })
    }

    /// Resolve a bare plugin name to full `owner/name` ids.
    ///
    /// Ids are returned unchanged; otherwise every id ending in `/<name>`
    /// (case-insensitively) matches. With no match the input comes back as
    /// the single candidate.
    pub fn find_ids_by_name(&self, name: &str) -> Vec<String> {
        if name.contains('/') {
            return vec![name.to_string()];
        }

        let suffix = format!("/{}", name.to_lowercase());
        let found: Vec<String> = self
            .records
            .keys()
            .filter(|id| id.to_lowercase().ends_with(&suffix))
            .cloned()
            .collect();

        if found.is_empty() {
            vec![name.to_string()]
        } else {
            found
        }
    }
}

/// `owner/name` for `<root>/owner/name.json`
fn catalog_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(root: &Path, rel: &str, value: Value) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn catalog() -> (tempfile::TempDir, PluginCatalog) {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "allay/Essentials.json",
            json!({"id": "allay/Essentials", "name": "Essentials", "!summary": "Basics"}),
        );
        write(dir.path(), "someone/essentials.json", json!({"id": "someone/essentials", "name": "x"}));
        write(dir.path(), "someone/README.md", json!("ignored"));
        let catalog = PluginCatalog::from_dir(dir.path()).unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_exact_lookup_normalizes() {
        let (_dir, catalog) = catalog();
        assert_eq!(catalog.len(), 2);

        let record = catalog.get("allay/Essentials").unwrap();
        assert_eq!(record.get("summary"), Some(&json!("Basics")));
        assert!(!record.contains_key("!summary"));

        assert!(matches!(
            catalog.get("allay/essentials"),
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(catalog.detail("allay/Essentials").unwrap().name, "Essentials");
    }

    #[test]
    fn test_find_ids_by_name() {
        let (_dir, catalog) = catalog();
        assert_eq!(
            catalog.find_ids_by_name("ESSENTIALS"),
            vec!["allay/Essentials", "someone/essentials"]
        );
        assert_eq!(catalog.find_ids_by_name("a/b"), vec!["a/b"]);
        assert_eq!(catalog.find_ids_by_name("missing"), vec!["missing"]);
        assert_eq!(catalog.find_ids_by_name("sentials"), vec!["sentials"]);
    }

    #[test]
    fn test_invalid_detail() {
        let mut raw = RawRecord::new();
        raw.insert("id".to_string(), json!(5));
        let catalog = PluginCatalog::from_records([("x/y".to_string(), raw)]);
        assert!(matches!(
            catalog.detail("x/y"),
            Err(CatalogError::InvalidDetail { .. })
        ));
    }
}
