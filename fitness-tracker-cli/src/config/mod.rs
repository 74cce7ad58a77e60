use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::User;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub ui: UiConfig,

    /// File this config was loaded from; `None` keeps it in memory only
    #[serde(skip)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout is applied unless one is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// Persisted session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.fitness-tracker/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".fitness-tracker"))
    }

    /// Get config file path (~/.fitness-tracker/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from a specific file, falling back to defaults
    /// when the file does not exist yet
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Default configuration that will be saved to `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Save configuration to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            tracing::debug!("In-memory config, nothing to save");
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check if a session was persisted
    pub fn is_authenticated(&self) -> bool {
        !self.auth.token.is_empty() && self.auth.user.is_some()
    }

    /// Persist a session
    pub fn set_session(&mut self, token: String, user: User) {
        self.auth.token = token;
        self.auth.user = Some(user);
    }

    /// Forget the persisted session
    pub fn clear_session(&mut self) {
        self.auth.token.clear();
        self.auth.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::tempdir;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout_seconds, None);
        assert_eq!(config.ui.date_format, "%Y-%m-%d");
        assert!(!config.is_authenticated());
        assert!(config.path().is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults_with_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");

        let config = Config::load_from(&file).unwrap();
        assert_eq!(config.path(), Some(file.as_path()));
        assert!(!file.exists());
    }

    #[test]
    fn test_session_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&file).unwrap();
        config.set_session("tok-123".to_string(), sample_user());
        config.save().unwrap();

        let reloaded = Config::load_from(&file).unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.auth.token, "tok-123");
        assert_eq!(reloaded.auth.user, Some(sample_user()));

        let mut cleared = reloaded;
        cleared.clear_session();
        cleared.save().unwrap();
        assert!(!Config::load_from(&file).unwrap().is_authenticated());
    }

    #[test]
    fn test_in_memory_config_is_not_written() {
        let mut config = Config::default();
        config.set_session("tok".to_string(), sample_user());
        assert!(config.save().is_ok());
    }
}
