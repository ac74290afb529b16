use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "hubindex";
const CONFIG_FILE: &str = "config.json";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the static site serving the artifact, or a local directory
    #[serde(default = "default_artifact_url")]
    pub artifact_url: String,

    /// Well-known route of the artifact below `artifact_url`
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    /// Page size used when a search does not ask for one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Maximum edit distance between a query token and an indexed token
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,
}

fn default_artifact_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_artifact_path() -> String {
    crate::index::loader::DEFAULT_ARTIFACT_PATH.to_string()
}

fn default_limit() -> usize {
    crate::query::DEFAULT_LIMIT
}

fn default_tolerance() -> u8 {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_url: default_artifact_url(),
            artifact_path: default_artifact_path(),
            default_limit: default_limit(),
            tolerance: default_tolerance(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Full artifact location: base URL (or directory) joined with the artifact route
    pub fn artifact_location(&self) -> String {
        let path = self.artifact_path.trim_start_matches('/');
        if path.is_empty() {
            return self.artifact_url.clone();
        }
        format!("{}/{}", self.artifact_url.trim_end_matches('/'), path)
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: XDG_CONFIG_HOME or ~/.config
        dirs::config_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    Ok(base.join(APP_NAME))
}
