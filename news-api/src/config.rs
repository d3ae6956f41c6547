use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Service configuration, loaded from a JSON file with fall-back to
/// defaults. Secrets can be supplied via `NEWS_API_KEY` and `JWT_SECRET`
/// instead of the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub listen_addr: String,
    /// Upstream search endpoint (NewsAPI-compatible `everything` route).
    pub news_endpoint: String,
    pub cache_ttl_seconds: u64,
    pub request_timeout_seconds: u64,
    /// JSON seed file for the user directory.
    pub users_file: PathBuf,
    /// JSON file backing the user/article state store.
    pub store_file: PathBuf,
    #[serde(default)]
    pub news_api_key: Option<String>,
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let data_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("news-aggregator");
        Self {
            listen_addr: "127.0.0.1:3000".into(),
            news_endpoint: "https://newsapi.org/v2/everything".into(),
            cache_ttl_seconds: 3600,
            request_timeout_seconds: 10,
            users_file: data_dir.join("users.json"),
            store_file: data_dir.join("user_news.json"),
            news_api_key: None,
            jwt_secret: None,
        }
    }
}

impl ServiceConfig {
    pub fn config_file_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("news-aggregator").join("config.json"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_file_path() else {
            warn!("no config directory on this platform; using defaults");
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "failed to parse config; using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn api_key(&self) -> String {
        std::env::var("NEWS_API_KEY")
            .ok()
            .or_else(|| self.news_api_key.clone())
            .unwrap_or_default()
    }

    pub fn jwt_secret(&self) -> String {
        std::env::var("JWT_SECRET")
            .ok()
            .or_else(|| self.jwt_secret.clone())
            .unwrap_or_default()
    }
}
