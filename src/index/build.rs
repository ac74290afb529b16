use crate::error::BuildError;
use crate::index::normalize::{derive_fields, into_document, normalize_record};
use crate::index::types::IndexedDocument;
use crate::index::writer::IndexWriter;
use crate::utils::spinner;
use serde_json::Value;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, info_span};

/// Outcome of a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub documents: usize,
    pub bytes: u64,
}

/// Normalize, derive and type-check one raw record
pub fn prepare_document(index: usize, record: &Value) -> Result<IndexedDocument, BuildError> {
    let Value::Object(raw) = record else {
        return Err(BuildError::NotAnObject { index });
    };

    let prepared = derive_fields(normalize_record(raw));
    into_document(prepared).map_err(|source| BuildError::InvalidRecord { index, source })
}

/// Build an index from raw records and write it to `output`.
///
/// Every record is prepared before anything is written, so a bad record
/// leaves any previous artifact at `output` untouched.
pub fn build_index(records: &[Value], output: &Path) -> Result<BuildSummary, BuildError> {
    let span = info_span!("build", output = %output.display());
    let _enter = span.enter();

    let mut writer = IndexWriter::new();
    for (index, record) in records.iter().enumerate() {
        let doc = prepare_document(index, record)?;
        debug!(index, id = %doc.id, api_major = doc.api_major, "prepared record");
        writer.add_document(doc);
    }

    let bytes = writer.write(output)?;
    let documents = writer.doc_count();
    info!(documents, bytes, "index written");

    Ok(BuildSummary { documents, bytes })
}

/// Build from a JSON array of raw records read from `reader`
pub fn build_index_from_reader<R: Read>(
    reader: R,
    output: &Path,
    silent: bool,
) -> Result<BuildSummary, BuildError> {
    let progress = spinner("Reading records", silent);

    let records: Result<Vec<Value>, _> = serde_json::from_reader(BufReader::new(reader));
    let records = match records {
        Ok(records) => records,
        Err(e) if e.is_io() => return Err(BuildError::Input(e.into())),
        Err(e) => return Err(BuildError::Json(e)),
    };

    if let Some(progress) = &progress {
        progress.set_message("Indexing");
    }
    let result = build_index(&records, output);
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    result
}
