use crate::index::types::{IndexedDocument, License};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Display shape of a plugin in result lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSummary {
    pub id: String,
    /// Display name, not the indexed name
    pub name: String,
    pub summary: String,
    pub author: String,
    pub categories: Vec<String>,
    pub api_version: String,
    pub license: License,
    pub downloads: u64,
    pub stars: u64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_image: Option<String>,
}

impl From<&IndexedDocument> for PluginSummary {
    fn from(doc: &IndexedDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.display_name.clone(),
            summary: doc.summary.clone(),
            author: doc.author.clone(),
            categories: doc.categories.clone(),
            api_version: doc.api_version.clone(),
            license: doc.license,
            downloads: doc.downloads,
            stars: doc.stars,
            created_at: to_iso_timestamp(doc.created_at),
            updated_at: to_iso_timestamp(doc.updated_at),
            icon_url: non_empty(&doc.icon_url),
            gallery_image: non_empty(&doc.gallery_image),
        }
    }
}

pub fn to_summary(doc: &IndexedDocument) -> PluginSummary {
    PluginSummary::from(doc)
}

/// Unix seconds as an ISO-8601 UTC timestamp with milliseconds.
/// Out-of-range values clamp to the epoch.
pub fn to_iso_timestamp(secs: u64) -> String {
    let time = i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(DateTime::UNIX_EPOCH);
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_shape() {
        let doc = IndexedDocument {
            id: "allay/essentials".to_string(),
            name: "essentials".to_string(),
            display_name: "Allay Essentials".to_string(),
            created_at: 1_700_000_000,
            updated_at: 0,
            icon_url: "icon.png".to_string(),
            ..Default::default()
        };

        let summary = to_summary(&doc);
        assert_eq!(summary.name, "Allay Essentials");
        assert_eq!(summary.created_at, "2023-11-14T22:13:20.000Z");
        assert_eq!(summary.updated_at, "1970-01-01T00:00:00.000Z");
        assert_eq!(summary.icon_url.as_deref(), Some("icon.png"));
        assert_eq!(summary.gallery_image, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("gallery_image").is_none());
        assert_eq!(json["license"], "closed-source");
    }
}
