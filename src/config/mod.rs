//! Configuration management for Finport

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// API host used when neither the flag, the env var nor the config sets one
pub const DEFAULT_API_HOST: &str = "http://localhost:8000";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Finport backend base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Email of the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Onboarding has been completed
    #[serde(default)]
    pub onboarded: bool,

    /// At least one bank statement has been uploaded
    #[serde(default)]
    pub statement_uploaded: bool,

    /// Where access/refresh tokens are kept
    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Secure storage backend for the token pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// OS keychain
    #[default]
    Keyring,
    /// JSON file next to the config file (0600)
    File,
}

/// User preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".finport").join("config.yaml"))
    }

    /// Resolve the config path from an optional override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// API host with the override applied: flag/env > config > default
    pub fn api_host_with(&self, override_host: Option<&str>) -> String {
        override_host
            .map(str::to_string)
            .or_else(|| self.api_host.clone())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Path of the token file used by [`TokenStoreKind::File`]
    pub fn token_file_path(config_path: &Path) -> PathBuf {
        config_path.with_file_name("tokens.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_host.is_none());
        assert!(config.email.is_none());
        assert!(!config.onboarded);
        assert!(!config.statement_uploaded);
        assert_eq!(config.token_store, TokenStoreKind::Keyring);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.yaml")).unwrap();
        assert!(config.email.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let config = Config {
            api_host: Some("https://finance.example.com".to_string()),
            email: Some("ann@example.com".to_string()),
            onboarded: true,
            statement_uploaded: false,
            token_store: TokenStoreKind::File,
            preferences: Preferences::default(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.email.as_deref(), Some("ann@example.com"));
        assert_eq!(loaded.token_store, TokenStoreKind::File);
        assert!(loaded.onboarded);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "email: [unterminated").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_api_host_precedence() {
        let mut config = Config::default();
        assert_eq!(config.api_host_with(None), DEFAULT_API_HOST);

        config.api_host = Some("https://configured.example.com/".to_string());
        assert_eq!(config.api_host_with(None), "https://configured.example.com");
        assert_eq!(
            config.api_host_with(Some("http://127.0.0.1:9000")),
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn test_token_file_sits_next_to_config() {
        let path = Config::token_file_path(Path::new("/tmp/finport/config.yaml"));
        assert_eq!(path, PathBuf::from("/tmp/finport/tokens.json"));
    }
}
