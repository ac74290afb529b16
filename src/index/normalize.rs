//! Record preparation: shadow-key resolution and derived fields.
//!
//! Upstream records may carry `!k` next to `k`. The shadow value only fills
//! in when `k` is absent; either way no `!`-prefixed key survives.

use crate::index::types::{IndexedDocument, License};
use semver::Version;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One upstream plugin record, field name to value
pub type RawRecord = Map<String, Value>;

/// Prefix marking a shadow (override) key
pub const SHADOW_PREFIX: char = '!';

/// Resolve shadow keys into their canonical fields.
///
/// An existing canonical key always wins, including an explicit `null`.
/// Keys with several bangs (`!!k`) also target `k`, with fewer bangs taking
/// precedence, so the outcome never depends on key order.
pub fn normalize_record(record: &RawRecord) -> RawRecord {
    let mut result = RawRecord::new();
    let mut shadows: Vec<(usize, &str, &Value)> = Vec::new();

    for (key, value) in record {
        let target = key.trim_start_matches(SHADOW_PREFIX);
        let bangs = key.len() - target.len();
        if bangs == 0 {
            result.insert(key.clone(), value.clone());
        } else {
            shadows.push((bangs, target, value));
        }
    }

    shadows.sort_by_key(|&(bangs, target, _)| (bangs, target));
    for (_, target, value) in shadows {
        if !result.contains_key(target) {
            result.insert(target.to_string(), value.clone());
        }
    }

    result
}

/// Major component of a semantic version, or 0 when absent or unparseable.
///
/// Surrounding whitespace and a single lowercase `v` prefix are allowed.
/// Anything else (`=1.2.3`, `V1.2.3`, ranges such as `>=0.16.0`) is not a
/// version.
pub fn api_major(api_version: Option<&str>) -> u64 {
    api_version.and_then(parse_version).map(|v| v.major).unwrap_or(0)
}

fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}

/// Add derived fields to a normalized record
pub fn derive_fields(mut record: RawRecord) -> RawRecord {
    let major = api_major(record.get("api_version").and_then(Value::as_str));
    record.insert("api_major".to_string(), Value::from(major));
    record
}

/// True when a plugin targets an API newer than `latest`.
///
/// Unknown versions are never outdated, and nothing is outdated while the
/// latest API is still 0.x.
pub fn is_version_outdated(api_version: Option<&str>, latest: &str) -> bool {
    let Some(latest) = parse_version(latest) else {
        return false;
    };
    if latest.major == 0 {
        return false;
    }
    match api_version.and_then(parse_version) {
        Some(version) => version > latest,
        None => false,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LicenseField {
    Name(String),
    Spdx {
        #[serde(default)]
        id: Option<String>,
    },
}

/// Field view of a prepared record. Missing or null fields default.
#[derive(Deserialize)]
struct RecordFields {
    name: Option<String>,
    owner: Option<String>,
    categories: Option<OneOrMany>,
    license: Option<LicenseField>,
    api_major: Option<u64>,
    downloads: Option<u64>,
    stars: Option<u64>,
    created_at: Option<u64>,
    updated_at: Option<u64>,
    id: Option<String>,
    display_name: Option<String>,
    author: Option<String>,
    summary: Option<String>,
    icon_url: Option<String>,
    #[serde(alias = "gallery_url")]
    gallery_image: Option<String>,
    api_version: Option<Value>,
}

fn resolve_license(field: Option<LicenseField>) -> License {
    match field {
        Some(LicenseField::Name(name)) => match License::parse(&name) {
            License::Unknown => License::from_spdx(&name),
            license => license,
        },
        Some(LicenseField::Spdx { id }) => License::from_spdx(id.as_deref().unwrap_or("")),
        None => License::ClosedSource,
    }
}

/// Convert a normalized and derived record into an index document
pub fn into_document(record: RawRecord) -> Result<IndexedDocument, serde_json::Error> {
    let fields: RecordFields = serde_json::from_value(Value::Object(record))?;

    let categories = match fields.categories {
        Some(OneOrMany::One(category)) => vec![category],
        Some(OneOrMany::Many(categories)) => categories,
        None => Vec::new(),
    };

    Ok(IndexedDocument {
        name: fields.name.unwrap_or_default(),
        owner: fields.owner.unwrap_or_default(),
        categories,
        license: resolve_license(fields.license),
        api_major: fields.api_major.unwrap_or(0),
        downloads: fields.downloads.unwrap_or(0),
        stars: fields.stars.unwrap_or(0),
        created_at: fields.created_at.unwrap_or(0),
        updated_at: fields.updated_at.unwrap_or(0),
        id: fields.id.unwrap_or_default(),
        display_name: fields.display_name.unwrap_or_default(),
        author: fields.author.unwrap_or_default(),
        summary: fields.summary.unwrap_or_default(),
        icon_url: fields.icon_url.unwrap_or_default(),
        gallery_image: fields.gallery_image.unwrap_or_default(),
        api_version: match fields.api_version {
            Some(Value::String(version)) => version,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
    })
}
