use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Position of a document in build order; also its stable tie-breaker
pub type DocId = u32;

/// License class of a plugin.
///
/// Documents only ever carry `OpenSource` or `ClosedSource`. `Unknown` exists
/// so that an unrecognized filter value parses cleanly and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum License {
    OpenSource,
    #[default]
    ClosedSource,
    #[serde(other)]
    Unknown,
}

impl License {
    pub fn as_str(&self) -> &'static str {
        match self {
            License::OpenSource => "open-source",
            License::ClosedSource => "closed-source",
            License::Unknown => "unknown",
        }
    }

    /// Parse a canonical license name; anything else is `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "open-source" => License::OpenSource,
            "closed-source" => License::ClosedSource,
            _ => License::Unknown,
        }
    }

    /// Classify an SPDX license id: all-rights-reserved or missing is closed
    pub fn from_spdx(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() || id.eq_ignore_ascii_case("ARR") {
            License::ClosedSource
        } else {
            License::OpenSource
        }
    }
}

impl FromStr for License {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(License::parse(s))
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One plugin as stored in the index.
///
/// The first block of fields is the queryable schema; the rest are display
/// fields carried along unindexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IndexedDocument {
    pub name: String,
    pub owner: String,
    pub categories: Vec<String>,
    pub license: License,
    pub api_major: u64,
    pub downloads: u64,
    pub stars: u64,
    pub created_at: u64,
    pub updated_at: u64,

    pub id: String,
    pub display_name: String,
    pub author: String,
    pub summary: String,
    pub icon_url: String,
    pub gallery_image: String,
    pub api_version: String,
}

/// Full-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Owner,
}

impl TextField {
    pub const ALL: [TextField; 2] = [TextField::Name, TextField::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Owner => "owner",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(TextField::Name),
            "owner" => Some(TextField::Owner),
            _ => None,
        }
    }

    pub fn value<'a>(&self, doc: &'a IndexedDocument) -> &'a str {
        match self {
            TextField::Name => &doc.name,
            TextField::Owner => &doc.owner,
        }
    }
}

/// Storage class of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TagSet,
    Enum,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// Queryable fields of a plugin document, in schema order
pub const PLUGIN_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::Text),
    ("owner", FieldKind::Text),
    ("categories", FieldKind::TagSet),
    ("license", FieldKind::Enum),
    ("api_major", FieldKind::Number),
    ("downloads", FieldKind::Number),
    ("stars", FieldKind::Number),
    ("created_at", FieldKind::Number),
    ("updated_at", FieldKind::Number),
];

/// Schema recorded in every artifact. Field names and kinds are the contract
/// between the builder and the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldDef>,
    pub sort_enabled: bool,
    pub stemming: bool,
}

impl Schema {
    /// The fixed plugin schema, sortable and unstemmed
    pub fn plugins() -> Self {
        Self {
            fields: PLUGIN_FIELDS
                .iter()
                .map(|&(name, kind)| FieldDef {
                    name: name.to_string(),
                    kind,
                })
                .collect(),
            sort_enabled: true,
            stemming: false,
        }
    }

    /// Check that an artifact's schema can be served by this build
    pub fn check_compatible(&self, found: &Schema) -> Result<(), String> {
        for expected in &self.fields {
            match found.fields.iter().find(|f| f.name == expected.name) {
                None => return Err(format!("missing field `{}`", expected.name)),
                Some(f) if f.kind != expected.kind => {
                    return Err(format!(
                        "field `{}` is {:?}, expected {:?}",
                        expected.name, f.kind, expected.kind
                    ));
                }
                Some(_) => {}
            }
        }
        if found.stemming != self.stemming {
            return Err("tokenizer stemming setting differs".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_wire_names() {
        let json = serde_json::to_string(&License::OpenSource).unwrap();
        assert_eq!(json, "\"open-source\"");
        let parsed: License = serde_json::from_str("\"proprietary\"").unwrap();
        assert_eq!(parsed, License::Unknown);
    }

    #[test]
    fn test_license_from_spdx() {
        assert_eq!(License::from_spdx("MIT"), License::OpenSource);
        assert_eq!(License::from_spdx("ARR"), License::ClosedSource);
        assert_eq!(License::from_spdx(""), License::ClosedSource);
    }

    #[test]
    fn test_schema_compatibility() {
        let schema = Schema::plugins();
        assert!(schema.check_compatible(&Schema::plugins()).is_ok());

        let mut renamed = Schema::plugins();
        renamed.fields[0].name = "title".to_string();
        assert!(schema.check_compatible(&renamed).is_err());

        let mut retyped = Schema::plugins();
        retyped.fields[5].kind = FieldKind::Text;
        assert!(schema.check_compatible(&retyped).is_err());
    }
}
