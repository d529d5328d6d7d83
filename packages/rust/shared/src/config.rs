//! Application configuration for DocAtlas.
//!
//! User config lives at `~/.docatlas/docatlas.toml` and is optional.
//! CLI arguments override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocAtlasError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docatlas.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docatlas";

/// Name of the staging directory the consolidator owns under the working directory.
pub const STAGING_DIR_NAME: &str = "rag";

/// File name of the archive written to the destination directory.
pub const ARCHIVE_FILE_NAME: &str = "rag.zip";

/// Published site root that `_source_uri` values are built from.
pub const DEFAULT_BASE_URL: &str = "https://awslabs.github.io/generative-ai-atlas/topics";

/// Value of the `type` metadata attribute.
pub const DEFAULT_DOCUMENT_TYPE: &str = "Other code repo";

/// Header every markdown page must start with.
pub const DEFAULT_COPYRIGHT_NOTICE: &str = "<!-- \n Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.\n SPDX-License-Identifier: CC-BY-SA-4.0\n -->";

// ---------------------------------------------------------------------------
// Config structs (matching docatlas.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Corpus consolidation settings.
    #[serde(default)]
    pub rag: RagSection,

    /// Copyright header settings.
    #[serde(default)]
    pub copyright: CopyrightSection,
}

/// `[rag]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagSection {
    /// Base URL the published pages live under.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value written to the `type` attribute of every metadata sidecar.
    #[serde(default = "default_document_type")]
    pub document_type: String,
}

impl Default for RagSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            document_type: default_document_type(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_document_type() -> String {
    DEFAULT_DOCUMENT_TYPE.into()
}

/// `[copyright]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyrightSection {
    /// Full HTML comment inserted at the top of each page.
    #[serde(default = "default_notice")]
    pub notice: String,
}

impl Default for CopyrightSection {
    fn default() -> Self {
        Self {
            notice: default_notice(),
        }
    }
}

fn default_notice() -> String {
    DEFAULT_COPYRIGHT_NOTICE.into()
}

// ---------------------------------------------------------------------------
// Runtime configs (merged from config file + CLI inputs)
// ---------------------------------------------------------------------------

/// Runtime consolidation configuration.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Staging directory, fully owned and emptied on every run.
    pub staging_dir: PathBuf,
    /// Base URL for `_source_uri`.
    pub base_url: Url,
    /// Value of the `type` attribute.
    pub document_type: String,
}

impl RagConfig {
    /// Build the runtime config, staging under `work_dir/rag`.
    pub fn from_app(config: &AppConfig, work_dir: &Path) -> Result<Self> {
        let base_url = Url::parse(&config.rag.base_url).map_err(|e| {
            DocAtlasError::config(format!("invalid rag.base_url '{}': {e}", config.rag.base_url))
        })?;

        Ok(Self {
            staging_dir: work_dir.join(STAGING_DIR_NAME),
            base_url,
            document_type: config.rag.document_type.clone(),
        })
    }

    /// Base URL without a trailing slash, ready for path segments to be appended.
    pub fn base_url_str(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

/// Runtime copyright enforcement configuration.
#[derive(Debug, Clone)]
pub struct CopyrightConfig {
    /// Desired header.
    pub notice: String,
}

impl From<&AppConfig> for CopyrightConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            notice: config.copyright.notice.clone(),
        }
    }
}

impl Default for CopyrightConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docatlas/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocAtlasError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docatlas/docatlas.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocAtlasError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DocAtlasError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocAtlasError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocAtlasError::Serialization(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocAtlasError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("generative-ai-atlas"));
        assert!(toml_str.contains("SPDX-License-Identifier"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.rag.base_url, DEFAULT_BASE_URL);
        assert_eq!(parsed.rag.document_type, DEFAULT_DOCUMENT_TYPE);
        assert_eq!(parsed.copyright.notice, DEFAULT_COPYRIGHT_NOTICE);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[rag]
base_url = "https://docs.example.com/kb"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.rag.base_url, "https://docs.example.com/kb");
        assert_eq!(config.rag.document_type, DEFAULT_DOCUMENT_TYPE);
        assert_eq!(config.copyright.notice, DEFAULT_COPYRIGHT_NOTICE);
    }

    #[test]
    fn rag_config_from_app_config() {
        let app = AppConfig::default();
        let rag = RagConfig::from_app(&app, Path::new("/work")).expect("valid config");
        assert_eq!(rag.staging_dir, Path::new("/work").join("rag"));
        assert_eq!(rag.base_url_str(), DEFAULT_BASE_URL);
        assert_eq!(rag.document_type, "Other code repo");
    }

    #[test]
    fn rag_config_rejects_bad_base_url() {
        let mut app = AppConfig::default();
        app.rag.base_url = "not a url".into();
        let err = RagConfig::from_app(&app, Path::new("/work")).unwrap_err();
        assert!(err.to_string().contains("invalid rag.base_url"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("da-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("docatlas.toml");
        std::fs::write(&path, "[rag]\ndocument_type = \"Guide\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.rag.document_type, "Guide");

        std::fs::write(&path, "[rag\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.is_config());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
