//! Configuration loading.
//!
//! A single config file (TOML, YAML or JSON, picked by extension) with
//! environment overrides on top. Every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::BrowserEngineConfig;
use crate::discovery::DiscoveryConfig;
use crate::llm::LlmConfig;
use crate::repository::SqlitePool;

/// Application name used for config and data directories.
pub const APP_NAME: &str = "ua-media-scanner";

/// Default SQLite filename inside the data directory.
const DEFAULT_DATABASE_FILENAME: &str = "media.db";

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path (`~` expanded, relative to the config file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// User agent for search and page requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Search and classification settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// External analyzer settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Redirect-resolving browser settings.
    #[serde(default)]
    pub browser: BrowserEngineConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            user_agent: default_user_agent(),
            discovery: DiscoveryConfig::default(),
            llm: LlmConfig::default(),
            browser: BrowserEngineConfig::default().with_env_overrides(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, or a file `prefer` discovers, or fall back to defaults.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            return Self::load_from_path(path).await;
        }

        match prefer::load(APP_NAME).await {
            Ok(found) => match found.source_path() {
                Some(path) => {
                    debug!("Using config file {}", path.display());
                    Self::load_from_path(path).await
                }
                None => Ok(Self::default()),
            },
            Err(_) => {
                debug!("No config file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file path.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config text in the given format and apply environment overrides.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        let config: Config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            "json" => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
            _ => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
        };
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        self.llm = self.llm.with_env_overrides();
        self.browser = self.browser.with_env_overrides();
        self
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> PathBuf {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve a path that may be relative to the config file.
    pub fn resolve_path(&self, path_str: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Database URL: `DATABASE_URL`, then the configured path, then the user data directory.
    pub fn database_url(&self) -> String {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        self.database_path().display().to_string()
    }

    fn database_path(&self) -> PathBuf {
        match self.database {
            Some(ref db) => self.resolve_path(db),
            None => dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_NAME)
                .join(DEFAULT_DATABASE_FILENAME),
        }
    }

    /// Ensure the directory holding a file-backed database exists.
    pub fn ensure_database_dir(&self) -> std::io::Result<()> {
        let pool = SqlitePool::new(&self.database_url());
        match Path::new(pool.database_url()).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}
