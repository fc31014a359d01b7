use crate::NodeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_NODE_URL: &str = "http://localhost:8081";

/// Environment variable that overrides the configured node URL.
pub const NODE_URL_ENV: &str = "GRASSDB_NODE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// Unset means the HTTP client's own default applies.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_node_url() -> String {
    DEFAULT_NODE_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            request_timeout_ms: None,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Resolve the starting node URL: explicit flag, then environment, then
    /// the config file.
    pub fn resolve_node_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        let non_blank = |url: &&str| !url.trim().is_empty();

        flag.filter(non_blank)
            .or(env.filter(non_blank))
            .unwrap_or(&self.node_url)
            .to_string()
    }
}

pub struct AppConfigStore {
    path: PathBuf,
}

impl AppConfigStore {
    pub fn new() -> Result<Self, NodeError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            NodeError::IoError(std::io::Error::other("Could not find config directory"))
        })?;

        let app_dir = config_dir.join("grassdb");
        fs::create_dir_all(&app_dir).map_err(NodeError::IoError)?;

        Ok(Self {
            path: app_dir.join("config.json"),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<AppConfig, NodeError> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(NodeError::IoError)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|e| NodeError::InvalidConfig(e.to_string()))?;

        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppConfigStore::at(dir.path().join("config.json"));

        let config = store.load().unwrap();

        assert_eq!(config.node_url, DEFAULT_NODE_URL);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"request_timeout_ms": 1500}"#).unwrap();

        let config = AppConfigStore::at(&path).load().unwrap();

        assert_eq!(config.node_url, DEFAULT_NODE_URL);
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn malformed_file_is_an_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "node_url = 'toml?'").unwrap();

        let err = AppConfigStore::at(&path).load().unwrap_err();

        assert!(matches!(err, NodeError::InvalidConfig(_)));
    }

    #[test]
    fn node_url_precedence() {
        let config = AppConfig {
            node_url: "http://from-file:8081".to_string(),
            request_timeout_ms: None,
        };

        assert_eq!(
            config.resolve_node_url(Some("http://flag:1"), Some("http://env:2")),
            "http://flag:1"
        );
        assert_eq!(
            config.resolve_node_url(None, Some("http://env:2")),
            "http://env:2"
        );
        assert_eq!(
            config.resolve_node_url(None, Some("  ")),
            "http://from-file:8081"
        );
        assert_eq!(
            config.resolve_node_url(None, None),
            "http://from-file:8081"
        );
    }
}
