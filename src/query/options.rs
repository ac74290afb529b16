use crate::index::types::{IndexedDocument, License};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Page size when a caller does not ask for one
pub const DEFAULT_LIMIT: usize = 20;

/// Result ordering. Every order is descending on its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortBy {
    #[default]
    Downloads,
    Stars,
    Updated,
    Newest,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Downloads,
        SortBy::Stars,
        SortBy::Updated,
        SortBy::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Downloads => "downloads",
            SortBy::Stars => "stars",
            SortBy::Updated => "updated",
            SortBy::Newest => "newest",
        }
    }

    /// Parse a sort name. Unknown names fall back to the default order.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "stars" => SortBy::Stars,
            "updated" => SortBy::Updated,
            "newest" => SortBy::Newest,
            _ => SortBy::Downloads,
        }
    }

    /// Document field this order sorts on
    pub fn field(&self) -> &'static str {
        match self {
            SortBy::Downloads => "downloads",
            SortBy::Stars => "stars",
            SortBy::Updated => "updated_at",
            SortBy::Newest => "created_at",
        }
    }

    pub fn key(&self, doc: &IndexedDocument) -> u64 {
        match self {
            SortBy::Downloads => doc.downloads,
            SortBy::Stars => doc.stars,
            SortBy::Updated => doc.updated_at,
            SortBy::Newest => doc.created_at,
        }
    }
}

impl FromStr for SortBy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortBy::parse(s))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured filters, combined with AND. `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Any-of: a document matches if it carries at least one of these.
    /// An empty list imposes no constraint.
    pub categories: Option<Vec<String>>,
    /// Exact license class
    pub license: Option<License>,
    /// Inclusive upper bound on `api_major`. Negative bounds match nothing.
    pub api_major: Option<i64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.categories.as_ref().is_none_or(|c| c.is_empty())
            && self.license.is_none()
            && self.api_major.is_none()
    }

    /// Check a single document against every active filter
    pub fn matches(&self, doc: &IndexedDocument) -> bool {
        let category_ok = match &self.categories {
            Some(wanted) if !wanted.is_empty() => {
                wanted.iter().any(|c| doc.categories.contains(c))
            }
            _ => true,
        };
        let license_ok = self.license.is_none_or(|l| l == doc.license);
        let api_ok = self
            .api_major
            .is_none_or(|bound| bound >= 0 && doc.api_major <= bound as u64);

        category_ok && license_ok && api_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Free text; empty (or without any word characters) matches everything
    pub term: String,
    pub filters: SearchFilters,
    pub limit: usize,
    pub offset: usize,
    pub sort_by: SortBy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            term: String::new(),
            filters: SearchFilters::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortBy::default(),
        }
    }
}

impl SearchOptions {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub hits: Vec<IndexedDocument>,
    /// Matches before pagination
    pub count: usize,
    /// Advisory only
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_falls_back() {
        assert_eq!(SortBy::parse("stars"), SortBy::Stars);
        assert_eq!(SortBy::parse(" Newest "), SortBy::Newest);
        assert_eq!(SortBy::parse("relevance"), SortBy::Downloads);
        assert_eq!("".parse::<SortBy>().unwrap(), SortBy::Downloads);
        assert_eq!(SortBy::Updated.field(), "updated_at");
    }

    #[test]
    fn test_filter_predicates() {
        let doc = IndexedDocument {
            categories: vec!["utility".to_string()],
            license: License::OpenSource,
            api_major: 1,
            ..Default::default()
        };

        assert!(SearchFilters::default().matches(&doc));
        assert!(SearchFilters {
            categories: Some(vec![]),
            ..Default::default()
        }
        .matches(&doc));
        assert!(SearchFilters {
            categories: Some(vec!["economy".into(), "utility".into()]),
            license: Some(License::OpenSource),
            api_major: Some(1),
        }
        .matches(&doc));
        assert!(!SearchFilters {
            api_major: Some(0),
            ..Default::default()
        }
        .matches(&doc));
        assert!(!SearchFilters {
            api_major: Some(-1),
            ..Default::default()
        }
        .matches(&IndexedDocument::default()));
        assert!(!SearchFilters {
            license: Some(License::Unknown),
            ..Default::default()
        }
        .matches(&doc));
    }
}
