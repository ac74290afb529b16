use crate::error::{LoadError, QueryError};
use crate::index::artifact::{self, IndexSnapshot};
use crate::index::types::*;
use crate::query::{QueryExecutor, SearchOptions, SearchResult, SortBy, compare_for_sort};
use crate::utils::decode_postings;
use roaring::RoaringBitmap;
use std::collections::BTreeMap;

/// Term -> documents containing it, ordered by term
pub type TermDictionary = BTreeMap<String, RoaringBitmap>;

/// Document ids presorted for each sort order.
///
/// Each order is key descending, then doc id ascending, so a match-all query
/// can page through it directly.
#[derive(Debug)]
pub struct SortIndex {
    downloads: Vec<DocId>,
    stars: Vec<DocId>,
    updated: Vec<DocId>,
    newest: Vec<DocId>,
}

impl SortIndex {
    fn build(documents: &[IndexedDocument]) -> Self {
        let presort = |sort: SortBy| {
            let mut ids: Vec<DocId> = (0..documents.len() as DocId).collect();
            ids.sort_by(|&a, &b| {
                compare_for_sort(sort, (a, &documents[a as usize]), (b, &documents[b as usize]))
            });
            ids
        };

        Self {
            downloads: presort(SortBy::Downloads),
            stars: presort(SortBy::Stars),
            updated: presort(SortBy::Updated),
            newest: presort(SortBy::Newest),
        }
    }

    pub fn order(&self, sort: SortBy) -> &[DocId] {
        match sort {
            SortBy::Downloads => &self.downloads,
            SortBy::Stars => &self.stars,
            SortBy::Updated => &self.updated,
            SortBy::Newest => &self.newest,
        }
    }
}

/// Materialized, read-only plugin index
#[derive(Debug)]
pub struct SearchIndex {
    schema: Schema,
    documents: Vec<IndexedDocument>,
    name_terms: TermDictionary,
    owner_terms: TermDictionary,
    categories: BTreeMap<String, RoaringBitmap>,
    licenses: BTreeMap<License, RoaringBitmap>,
    all: RoaringBitmap,
    sort_index: Option<SortIndex>,
}

impl SearchIndex {
    /// Restore an index from artifact bytes
    pub fn restore(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::from_snapshot(artifact::decode(bytes)?)
    }

    /// Materialize a decoded snapshot, validating it against this build's schema.
    ///
    /// Sorting support follows the flag recorded in the artifact.
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Result<Self, LoadError> {
        Schema::plugins()
            .check_compatible(&snapshot.schema)
            .map_err(LoadError::IncompatibleSchema)?;

        let documents = snapshot.documents;
        let doc_count = u32::try_from(documents.len())
            .map_err(|_| LoadError::Malformed("too many documents".to_string()))?;

        let mut name_terms = TermDictionary::new();
        let mut owner_terms = TermDictionary::new();
        for field_postings in snapshot.text_fields {
            let field = TextField::from_name(&field_postings.field).ok_or_else(|| {
                LoadError::Malformed(format!("unknown text field `{}`", field_postings.field))
            })?;
            let dict = match field {
                TextField::Name => &mut name_terms,
                TextField::Owner => &mut owner_terms,
            };

            for term in field_postings.terms {
                let doc_ids = decode_postings(&term.postings).ok_or_else(|| {
                    LoadError::Malformed(format!("corrupt postings for term `{}`", term.term))
                })?;
                if let Some(&bad) = doc_ids.iter().find(|&&id| id >= doc_count) {
                    return Err(LoadError::Malformed(format!(
                        "term `{}` references document {} of {}",
                        term.term, bad, doc_count
                    )));
                }
                dict.insert(term.term, doc_ids.into_iter().collect());
            }
        }

        let mut categories: BTreeMap<String, RoaringBitmap> = BTreeMap::new();
        let mut licenses: BTreeMap<License, RoaringBitmap> = BTreeMap::new();
        for (doc_id, doc) in documents.iter().enumerate() {
            let doc_id = doc_id as DocId;
            for category in &doc.categories {
                categories.entry(category.clone()).or_default().insert(doc_id);
            }
            licenses.entry(doc.license).or_default().insert(doc_id);
        }

        let sort_index = snapshot
            .schema
            .sort_enabled
            .then(|| SortIndex::build(&documents));

        Ok(Self {
            schema: snapshot.schema,
            all: (0..doc_count).collect(),
            documents,
            name_terms,
            owner_terms,
            categories,
            licenses,
            sort_index,
        })
    }

    /// Run a query with default scoring
    pub fn search(&self, options: &SearchOptions) -> Result<SearchResult, QueryError> {
        QueryExecutor::new(self).execute(options)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn document(&self, doc_id: DocId) -> Option<&IndexedDocument> {
        self.documents.get(doc_id as usize)
    }

    pub fn all_docs(&self) -> &RoaringBitmap {
        &self.all
    }

    pub fn terms(&self, field: TextField) -> &TermDictionary {
        match field {
            TextField::Name => &self.name_terms,
            TextField::Owner => &self.owner_terms,
        }
    }

    pub fn category_docs(&self, category: &str) -> Option<&RoaringBitmap> {
        self.categories.get(category)
    }

    /// Categories present in the index with their document counts
    pub fn category_counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.categories
            .iter()
            .map(|(name, docs)| (name.as_str(), docs.len()))
    }

    pub fn license_docs(&self, license: License) -> Option<&RoaringBitmap> {
        self.licenses.get(&license)
    }

    pub fn sort_index(&self) -> Option<&SortIndex> {
        self.sort_index.as_ref()
    }
}
