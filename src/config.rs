// src/config.rs
//
// Runtime configuration
//
// Sources, highest priority first: command-line flags, environment
// variables, built-in defaults.

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::default_database_path;
use crate::error::AppResult;
use crate::integrations::gemini::DEFAULT_GEMINI_MODEL;
use crate::repositories::DEFAULT_STORAGE_KEY;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Items endpoint of the remote store; None means local-only
    pub remote_url: Option<String>,
    pub database_path: PathBuf,
    /// Key the collection blob is stored under in the local store
    pub storage_key: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            database_path: default_database_path().unwrap_or_else(|_| PathBuf::from("animanga.db")),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Configuration flags shared by every CLI subcommand
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Remote items endpoint, e.g. https://example.app/api/items
    #[arg(long, env = "ANIMANGA_REMOTE_URL", global = true)]
    pub remote_url: Option<String>,

    /// Local database file
    #[arg(long, env = "ANIMANGA_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Key of the collection inside the local database
    #[arg(long, env = "ANIMANGA_STORAGE_KEY", global = true)]
    pub storage_key: Option<String>,

    /// API key enabling AI enrichment and recommendations
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "ANIMANGA_GEMINI_MODEL", global = true)]
    pub gemini_model: Option<String>,

    /// HTTP timeout in seconds for remote and AI requests
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

impl ConfigArgs {
    pub fn into_config(self) -> AppResult<AppConfig> {
        let defaults = AppConfig::default();

        let database_path = match self.db_path {
            Some(path) => path,
            None => default_database_path()?,
        };

        Ok(AppConfig {
            remote_url: self
                .remote_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            database_path,
            storage_key: self.storage_key.unwrap_or(defaults.storage_key),
            gemini_api_key: self.gemini_api_key.filter(|key| !key.trim().is_empty()),
            gemini_model: self.gemini_model.unwrap_or(defaults.gemini_model),
            request_timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        })
    }
}
