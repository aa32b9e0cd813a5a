use std::net::SocketAddr;
use std::path::PathBuf;

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::youtube::DEFAULT_API_BASE;

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Environment variable holding the YouTube Data API key
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub bind: Option<String>,
    pub api_base_url: Option<String>,
}

/// Where the API key in use came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    Environment,
    ConfigFile,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Flag => write!(f, "--api-key"),
            KeySource::Environment => write!(f, "{API_KEY_ENV}"),
            KeySource::ConfigFile => write!(f, "config file"),
        }
    }
}

impl Config {
    /// Load config from ~/.config/vidprobe/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Pick the API key: flag, then environment, then config file
    pub fn resolve_api_key(&self, flag: Option<&str>, env: Option<&str>) -> Option<(String, KeySource)> {
        let non_empty = |s: &&str| !s.trim().is_empty();

        flag.filter(non_empty)
            .map(|k| (k.to_string(), KeySource::Flag))
            .or_else(|| env.filter(non_empty).map(|k| (k.to_string(), KeySource::Environment)))
            .or_else(|| {
                self.api_key
                    .as_deref()
                    .filter(non_empty)
                    .map(|k| (k.to_string(), KeySource::ConfigFile))
            })
    }

    pub fn bind_addr(&self, flag: Option<&str>) -> Result<SocketAddr> {
        let addr = flag.or(self.bind.as_deref()).unwrap_or(DEFAULT_BIND);
        addr.parse()
            .wrap_err_with(|| format!("invalid bind address: {addr}"))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("vidprobe")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
api_key = "AIzaConfigKey"
bind = "0.0.0.0:9000"
api_base_url = "http://localhost:3000/youtube/v3"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("AIzaConfigKey"));
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.api_base_url(), "http://localhost:3000/youtube/v3");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api_key.is_none());
        assert!(config.bind.is_none());
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_api_key_precedence() {
        let config = Config {
            api_key: Some("from-file".into()),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_api_key(Some("from-flag"), Some("from-env")),
            Some(("from-flag".to_string(), KeySource::Flag))
        );
        assert_eq!(
            config.resolve_api_key(None, Some("from-env")),
            Some(("from-env".to_string(), KeySource::Environment))
        );
        assert_eq!(
            config.resolve_api_key(None, Some("  ")),
            Some(("from-file".to_string(), KeySource::ConfigFile))
        );
        assert_eq!(Config::default().resolve_api_key(None, None), None);
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(None).unwrap().to_string(), DEFAULT_BIND);
        assert_eq!(config.bind_addr(Some("0.0.0.0:80")).unwrap().port(), 80);

        let config = Config {
            bind: Some("127.0.0.1:9999".into()),
            ..Config::default()
        };
        assert_eq!(config.bind_addr(None).unwrap().port(), 9999);
        assert!(config.bind_addr(Some("localhost")).is_err());
    }
}
