//! Client configuration: backend URL, timeouts, session file and log filter.
//!
//! Values come from an optional TOML file and are then overridden by the
//! `CLOZZET_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "CLOZZET_API_URL";
pub const ENV_SESSION_FILE: &str = "CLOZZET_SESSION_FILE";
pub const ENV_LOG: &str = "CLOZZET_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Where the CLI keeps tokens between runs. `None` keeps them in memory.
    pub session_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            session_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize()?;
        Ok(config)
    }

    /// Loads the file if given, then applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(file) = lookup(ENV_SESSION_FILE) {
            self.session_file = Some(PathBuf::from(file));
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        self.normalize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
            key: "api_url",
            message: e.to_string(),
        })?;
        self.api_url = trimmed.to_string();
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_file_then_env_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"https://api.example.test/\"\nrequest_timeout_secs = 5").unwrap();

        let mut config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api_url, "https://api.example.test");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, "info");

        config
            .apply_overrides(|key| match key {
                ENV_LOG => Some("debug".to_string()),
                ENV_SESSION_FILE => Some("/tmp/session.json".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml("api_url = \"not a url\""),
            Err(ConfigError::InvalidValue { key: "api_url", .. })
        ));
        assert!(matches!(
            Config::from_toml("request_timeout_secs = 0"),
            Err(ConfigError::InvalidValue { key: "request_timeout_secs", .. })
        ));
        assert!(matches!(Config::from_toml("api_url = ["), Err(ConfigError::Parse(_))));
    }
}
