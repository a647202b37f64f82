//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! abaplink runs without any configuration: the bridge endpoint is
//! auto-discovered and every setting has a default. A config file can pin
//! the bridge URL (skipping auto-discovery) and tune upsert behavior.
//!
//! # Locations
//!
//! Searched in order (first hit wins):
//! 1. `$ABAPLINK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/abaplink/config.toml`
//! 3. `~/.abaplink/config.toml` (canonical write location)
//!
//! The `$BRIDGE_URL` environment variable overrides the file-level
//! `bridge_url` regardless of which file was loaded.
//!
//! # Example
//!
//! ```toml
//! bridge_url = "http://172.28.0.1:19456"
//! already_exists_marker = "AlreadyExists"
//! default_package = "$TMP"
//! language = "EN"
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// On-disk configuration schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Explicit bridge base URL; skips auto-discovery when it answers the
    /// health check. Probe failure falls back to auto-discovery.
    pub bridge_url: Option<String>,

    /// Substring of an error body that identifies an "already exists"
    /// rejection. The remote wording is an external contract we do not
    /// own, so it is configurable.
    pub already_exists_marker: Option<String>,

    /// Package used for objects created without a transport request.
    pub default_package: Option<String>,

    /// Language key for created objects.
    pub language: Option<String>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.bridge_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "bridge_url must start with http:// or https://, got '{}'",
                    url
                )));
            }
        }
        if let Some(marker) = &self.already_exists_marker {
            if marker.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "already_exists_marker cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults when no file was found).
    pub file: ConfigFile,
    /// Path the config was loaded from, if any.
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Missing config files are not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated.
    pub fn load() -> Result<Config, ConfigError> {
        let (file, loaded_from) = Self::load_file()?;
        file.validate()?;
        Ok(Config { file, loaded_from })
    }

    /// Locate and parse the config file.
    fn load_file() -> Result<(ConfigFile, Option<PathBuf>), ConfigError> {
        // 1. $ABAPLINK_CONFIG
        if let Ok(path) = std::env::var("ABAPLINK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let file = Self::read_file(&path)?;
                return Ok((file, Some(path)));
            }
        }

        // 2. $XDG_CONFIG_HOME/abaplink/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("abaplink/config.toml");
            if path.exists() {
                let file = Self::read_file(&path)?;
                return Ok((file, Some(path)));
            }
        }

        // 3. ~/.abaplink/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".abaplink/config.toml");
            if path.exists() {
                let file = Self::read_file(&path)?;
                return Ok((file, Some(path)));
            }
        }

        Ok((ConfigFile::default(), None))
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical config file path (`~/.abaplink/config.toml`).
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".abaplink/config.toml"))
    }

    /// Write the config file atomically to the canonical location.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames, to prevent corruption.
    pub fn write(file: &ConfigFile) -> Result<PathBuf, ConfigError> {
        let path = Self::canonical_path()?;
        Self::write_atomic(&path, file)?;
        Ok(path)
    }

    fn write_atomic(path: &Path, file: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(file).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut f = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        f.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        f.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Explicit bridge URL override, if any.
    ///
    /// `$BRIDGE_URL` takes precedence over the config file. Trailing
    /// slashes are stripped so path concatenation stays uniform.
    pub fn bridge_url(&self) -> Option<String> {
        std::env::var("BRIDGE_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| self.file.bridge_url.clone())
            .map(|u| u.trim_end_matches('/').to_string())
    }

    /// Marker identifying an "already exists" rejection body.
    pub fn already_exists_marker(&self) -> &str {
        self.file
            .already_exists_marker
            .as_deref()
            .unwrap_or("AlreadyExists")
    }

    /// Package for objects created without a transport request.
    pub fn default_package(&self) -> &str {
        self.file.default_package.as_deref().unwrap_or("$TMP")
    }

    /// Language key for created objects.
    pub fn language(&self) -> &str {
        self.file.language.as_deref().unwrap_or("EN")
    }

    /// Path the config was loaded from, if a file was found.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// Set a config value by key name (for `abap config set`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownKey` for unrecognized keys and
    /// `ConfigError::InvalidValue` if the resulting config is invalid.
    pub fn set_key(file: &mut ConfigFile, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "bridge_url" => file.bridge_url = Some(value.to_string()),
            "already_exists_marker" => file.already_exists_marker = Some(value.to_string()),
            "default_package" => file.default_package = Some(value.to_string()),
            "language" => file.language = Some(value.to_string()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        file.validate()
    }

    /// Get a config value by key name (for `abap config get`).
    pub fn get_key(file: &ConfigFile, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "bridge_url" => file.bridge_url.clone(),
            "already_exists_marker" => file.already_exists_marker.clone(),
            "default_package" => file.default_package.clone(),
            "language" => file.language.clone(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// All known config keys, for `abap config list`.
    pub fn known_keys() -> &'static [&'static str] {
        &[
            "bridge_url",
            "already_exists_marker",
            "default_package",
            "language",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.already_exists_marker(), "AlreadyExists");
        assert_eq!(config.default_package(), "$TMP");
        assert_eq!(config.language(), "EN");
    }

    #[test]
    fn load_from_env_path() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            bridge_url = "http://10.0.0.5:19456/"
            default_package = "ZDEV"
            "#,
        )
        .unwrap();

        std::env::set_var("ABAPLINK_CONFIG", config_path.to_str().unwrap());
        std::env::remove_var("BRIDGE_URL");

        let config = Config::load().unwrap();
        // trailing slash stripped
        assert_eq!(config.bridge_url().as_deref(), Some("http://10.0.0.5:19456"));
        assert_eq!(config.default_package(), "ZDEV");
        assert!(config.loaded_from().is_some());

        std::env::remove_var("ABAPLINK_CONFIG");
    }

    #[test]
    fn env_bridge_url_overrides_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "bridge_url = \"http://file:19456\"").unwrap();

        std::env::set_var("ABAPLINK_CONFIG", config_path.to_str().unwrap());
        std::env::set_var("BRIDGE_URL", "http://env:19456");

        let config = Config::load().unwrap();
        assert_eq!(config.bridge_url().as_deref(), Some("http://env:19456"));

        std::env::remove_var("ABAPLINK_CONFIG");
        std::env::remove_var("BRIDGE_URL");
    }

    #[test]
    fn invalid_bridge_url_rejected() {
        let file = ConfigFile {
            bridge_url: Some("ftp://nope".to_string()),
            ..Default::default()
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let parsed: Result<ConfigFile, _> = toml::from_str("unknown_field = true");
        assert!(parsed.is_err());
    }

    #[test]
    fn set_and_get_keys() {
        let mut file = ConfigFile::default();
        Config::set_key(&mut file, "language", "DE").unwrap();
        assert_eq!(
            Config::get_key(&file, "language").unwrap().as_deref(),
            Some("DE")
        );
        assert!(Config::set_key(&mut file, "nope", "x").is_err());
        assert!(Config::get_key(&file, "nope").is_err());
    }

    #[test]
    fn set_key_validates() {
        let mut file = ConfigFile::default();
        let err = Config::set_key(&mut file, "bridge_url", "not-a-url");
        assert!(err.is_err());
    }
}
