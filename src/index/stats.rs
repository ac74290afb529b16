use crate::index::reader::SearchIndex;
use crate::index::types::License;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Display statistics for an artifact on disk
pub fn show_stats(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let index = SearchIndex::restore(&bytes).context("Failed to restore index")?;

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Artifact:         {}", path.display());
    println!("Artifact size:    {}", format_size(bytes.len() as u64));
    println!("Document count:   {}", index.len());
    println!("Sortable:         {}", index.schema().sort_enabled);

    let licensed = |license| index.license_docs(license).map_or(0, |docs| docs.len());
    println!("Open source:      {}", licensed(License::OpenSource));
    println!("Closed source:    {}", licensed(License::ClosedSource));

    println!();
    println!("Plugins by category:");
    let mut sorted: Vec<_> = index.category_counts().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    for (category, count) in sorted.iter().take(15) {
        println!("  {:20} {}", category, count);
    }
    if sorted.len() > 15 {
        println!("  ... and {} more", sorted.len() - 15);
    }

    let docs = index.documents();
    if let Some(latest) = docs.iter().map(|d| d.updated_at).max() {
        println!();
        println!("Latest update:    {}", format_timestamp(latest));
    }
    if let Some(top) = docs.iter().max_by_key(|d| d.downloads) {
        println!("Most downloaded:  {} ({})", top.id, top.downloads);
    }

    Ok(())
}

fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map_or_else(|| "unknown".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
