use crate::error::BuildError;
use crate::index::artifact::{self, FieldPostings, IndexSnapshot, TermPostings};
use crate::index::types::*;
use crate::utils::{encode_postings, tokenize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Index writer accumulating documents and text postings for one build
pub struct IndexWriter {
    schema: Schema,
    documents: Vec<IndexedDocument>,
    /// Text field -> term -> doc ids (in insertion order, so already sorted)
    postings: BTreeMap<&'static str, BTreeMap<String, Vec<DocId>>>,
}

impl IndexWriter {
    /// Create a writer for the fixed plugin schema
    pub fn new() -> Self {
        Self {
            schema: Schema::plugins(),
            documents: Vec::new(),
            postings: BTreeMap::new(),
        }
    }

    /// Add a prepared document and index its text fields
    pub fn add_document(&mut self, doc: IndexedDocument) -> DocId {
        let doc_id = self.documents.len() as DocId;

        for field in TextField::ALL {
            let terms = self.postings.entry(field.as_str()).or_default();
            for token in tokenize(field.value(&doc)) {
                terms.entry(token).or_default().push(doc_id);
            }
        }

        self.documents.push(doc);
        doc_id
    }

    /// Get current document count
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    /// Freeze the accumulated state into a serializable snapshot
    pub fn snapshot(&self) -> IndexSnapshot {
        let text_fields = TextField::ALL
            .iter()
            .map(|field| {
                let terms = self
                    .postings
                    .get(field.as_str())
                    .map(|terms| {
                        terms
                            .iter()
                            .map(|(term, doc_ids)| TermPostings {
                                term: term.clone(),
                                postings: encode_postings(doc_ids),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                FieldPostings {
                    field: field.as_str().to_string(),
                    terms,
                }
            })
            .collect();

        IndexSnapshot {
            schema: self.schema.clone(),
            documents: self.documents.clone(),
            text_fields,
        }
    }

    /// Encode the index into artifact bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        Ok(artifact::encode(&self.snapshot())?)
    }

    /// Write the artifact to `path`, replacing any previous file atomically.
    ///
    /// Bytes go to a temporary file in the destination directory which is
    /// renamed over `path` only once fully written and synced.
    pub fn write(&self, path: &Path) -> Result<u64, BuildError> {
        let bytes = self.to_bytes()?;
        let write_err = |source| BuildError::Write {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        Ok(bytes.len() as u64)
    }
}

impl Default for IndexWriter {
    fn default() -> Self {
        Self::new()
    }
}
