//! Typed view of a full plugin record as stored in the catalog.

use crate::index::normalize::is_version_outdated;
use crate::index::types::License;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat `null` like a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDetail {
    pub id: String,
    pub name: String,
    /// Source repository URL
    #[serde(default, deserialize_with = "null_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_default")]
    pub summary: String,
    /// Markdown body
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub authors: Vec<Author>,
    #[serde(default, deserialize_with = "null_default")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub license: Option<LicenseInfo>,
    #[serde(default)]
    pub links: Option<PluginLinks>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub gallery: Vec<GalleryImage>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    /// Newest first
    #[serde(default, deserialize_with = "null_default")]
    pub versions: Vec<Version>,
    #[serde(default, deserialize_with = "null_default")]
    pub api_version: String,
    #[serde(default)]
    pub server_version: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// SPDX license info; `ARR` when the repository has no license file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginLinks {
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub wiki: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub changelog: String,
    #[serde(default, deserialize_with = "null_default")]
    pub files: Vec<VersionFile>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub published_at: u64,
}

impl Version {
    /// The file marked primary, else the first one
    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub plugin_id: String,
    #[serde(default)]
    pub version_range: Option<String>,
    pub dependency_type: DependencyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    Release,
    Beta,
}

impl PluginDetail {
    pub fn license_class(&self) -> License {
        License::from_spdx(self.license.as_ref().map_or("", |l| l.id.as_str()))
    }

    pub fn version(&self, version: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Newest version, optionally restricted to stable releases or prereleases
    pub fn latest_version(&self, channel: Option<ReleaseChannel>) -> Option<&Version> {
        self.versions.iter().find(|v| match channel {
            Some(ReleaseChannel::Release) => !v.prerelease,
            Some(ReleaseChannel::Beta) => v.prerelease,
            None => true,
        })
    }

    pub fn is_outdated(&self, latest_api: &str) -> bool {
        let api_version = (!self.api_version.is_empty()).then_some(self.api_version.as_str());
        is_version_outdated(api_version, latest_api)
    }
}

/// Human-readable size with one decimal
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
