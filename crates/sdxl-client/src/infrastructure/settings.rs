//! TOML settings file for the client.
//!
//! Every field has a serde default, so an empty file (or no file at all) gives
//! a working configuration for the hosted demo endpoint.  Example:
//!
//! ```toml
//! [service]
//! ws_url = "wss://google-sdxl.hf.space/queue/join"
//! timeout_secs = 60
//! max_size = 10485760
//! max_queue = 2048
//! fn_index = 2
//!
//! [translation]
//! enabled = true
//! source = "ru"
//! target = "en"
//! ```
//!
//! The file is only a source of values; the URL invariant is enforced when the
//! settings are turned into a [`ClientConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sdxl_core::domain::config::{
    DEFAULT_FN_INDEX, DEFAULT_MAX_QUEUE, DEFAULT_MAX_SIZE, DEFAULT_TIMEOUT,
    DEFAULT_TRANSLATE_FROM, DEFAULT_TRANSLATE_TO, DEFAULT_WS_URL,
};
use sdxl_core::{ClientConfig, ConfigError};

use crate::infrastructure::google_translate::DEFAULT_TRANSLATE_ENDPOINT;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but do not form a valid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub translation: TranslationSettings,
}

/// Queue endpoint and transport limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettings {
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Per-read timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum message size in bytes.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Depth of the incoming-frame queue.
    #[serde(default = "default_max_queue")]
    pub max_queue: usize,
    /// Index of the remote generation function.
    #[serde(default = "default_fn_index")]
    pub fn_index: u32,
}

/// Prompt translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_target")]
    pub target: String,
    /// Translation backend URL.
    #[serde(default = "default_translate_endpoint")]
    pub endpoint: String,
}

fn default_ws_url() -> String {
    DEFAULT_WS_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}
fn default_max_queue() -> usize {
    DEFAULT_MAX_QUEUE
}
fn default_fn_index() -> u32 {
    DEFAULT_FN_INDEX
}
fn default_true() -> bool {
    true
}
fn default_source() -> String {
    DEFAULT_TRANSLATE_FROM.to_string()
}
fn default_target() -> String {
    DEFAULT_TRANSLATE_TO.to_string()
}
fn default_translate_endpoint() -> String {
    DEFAULT_TRANSLATE_ENDPOINT.to_string()
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            timeout_secs: default_timeout_secs(),
            max_size: default_max_size(),
            max_queue: default_max_queue(),
            fn_index: default_fn_index(),
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            source: default_source(),
            target: default_target(),
            endpoint: default_translate_endpoint(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl Settings {
    /// Reads and parses the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read and
    /// [`SettingsError::Parse`] if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] on invalid TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the immutable client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Config`] if `service.ws_url` is not an
    /// absolute URL with a host.
    pub fn to_client_config(&self) -> Result<ClientConfig, SettingsError> {
        let config = ClientConfig::new(&self.service.ws_url)?
            .with_timeout(Duration::from_secs(self.service.timeout_secs))
            .with_max_size(self.service.max_size)
            .with_max_queue(self.service.max_queue)
            .with_fn_index(self.service.fn_index)
            .with_languages(&self.translation.source, &self.translation.target)
            .with_translation(self.translation.enabled);
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.service.ws_url, DEFAULT_WS_URL);
        assert_eq!(settings.service.timeout_secs, 60);
        assert!(settings.translation.enabled);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Arrange
        let text = r#"
            [service]
            ws_url = "ws://127.0.0.1:7860/queue/join"
            fn_index = 5

            [translation]
            enabled = false
        "#;

        // Act
        let settings = Settings::from_toml_str(text).unwrap();

        // Assert
        assert_eq!(settings.service.ws_url, "ws://127.0.0.1:7860/queue/join");
        assert_eq!(settings.service.fn_index, 5);
        assert_eq!(settings.service.max_queue, DEFAULT_MAX_QUEUE);
        assert!(!settings.translation.enabled);
        assert_eq!(settings.translation.source, "ru");
    }

    #[test]
    fn test_to_client_config_carries_every_field() {
        let mut settings = Settings::default();
        settings.service.ws_url = "ws://localhost:9000/join".to_string();
        settings.service.timeout_secs = 5;
        settings.service.max_size = 4096;
        settings.service.max_queue = 8;
        settings.service.fn_index = 3;
        settings.translation.source = "de".to_string();
        settings.translation.target = "en".to_string();
        settings.translation.enabled = false;

        let cfg = settings.to_client_config().unwrap();

        assert_eq!(cfg.ws_url().as_str(), "ws://localhost:9000/join");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.max_size(), 4096);
        assert_eq!(cfg.max_queue(), 8);
        assert_eq!(cfg.fn_index(), 3);
        assert_eq!(cfg.translate_from(), "de");
        assert!(!cfg.translation_enabled());
    }

    #[test]
    fn test_invalid_url_fails_before_any_connection() {
        let mut settings = Settings::default();
        settings.service.ws_url = "not a url".to_string();

        let err = settings.to_client_config().unwrap_err();

        assert!(matches!(err, SettingsError::Config(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Settings::from_toml_str("[service\nws_url = ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load(Path::new("/definitely/not/here/sdxl.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
