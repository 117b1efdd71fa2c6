//! Client configuration.
//!
//! [`ClientConfig`] is built once by whoever owns the client and never changes
//! afterwards.  The only field that can be *invalid* is the endpoint URL, so it
//! is checked in [`ClientConfig::new`]; every other setting is adjusted with a
//! consuming `with_*` method that cannot break the invariant.
//!
//! Reading settings from files, environment variables or CLI flags happens in
//! `sdxl-client`; this module only holds the validated result.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default queue endpoint of the hosted SDXL demo.
pub const DEFAULT_WS_URL: &str = "wss://google-sdxl.hf.space/queue/join";

/// Default per-read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default maximum WebSocket message/frame size (10 MiB).
pub const DEFAULT_MAX_SIZE: usize = 10 * 1024 * 1024;

/// Default depth of the incoming-message queue.
pub const DEFAULT_MAX_QUEUE: usize = 2048;

/// Default index of the remote generation function.
pub const DEFAULT_FN_INDEX: u32 = 2;

/// Default translation source language.
pub const DEFAULT_TRANSLATE_FROM: &str = "ru";

/// Default translation target language.
pub const DEFAULT_TRANSLATE_TO: &str = "en";

/// Errors raised while building a [`ClientConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The endpoint string is not a URL at all (e.g. missing scheme).
    #[error("invalid WebSocket URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The endpoint parsed but has no host component.
    #[error("WebSocket URL '{0}' has no host")]
    MissingHost(String),
}

/// Immutable settings for one generation client.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use sdxl_core::ClientConfig;
///
/// let cfg = ClientConfig::new("ws://127.0.0.1:7860/queue/join")
///     .unwrap()
///     .with_timeout(Duration::from_secs(5))
///     .with_translation(false);
/// assert_eq!(cfg.fn_index(), 2);
/// assert!(!cfg.translation_enabled());
///
/// assert!(ClientConfig::new("queue/join").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    ws_url: Url,
    timeout: Duration,
    max_size: usize,
    max_queue: usize,
    fn_index: u32,
    translate_from: String,
    translate_to: String,
    translate: bool,
}

impl ClientConfig {
    /// Creates a configuration for `ws_url` with every other field at its
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `ws_url` does not parse as an absolute URL
    /// with both a scheme and a host.
    pub fn new(ws_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(ws_url).map_err(|e| ConfigError::InvalidUrl {
            url: ws_url.to_string(),
            reason: e.to_string(),
        })?;

        // `Url::parse` accepts host-less URLs such as `mailto:x` or `file:///x`.
        match parsed.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(ConfigError::MissingHost(ws_url.to_string())),
        }

        Ok(Self {
            ws_url: parsed,
            timeout: DEFAULT_TIMEOUT,
            max_size: DEFAULT_MAX_SIZE,
            max_queue: DEFAULT_MAX_QUEUE,
            fn_index: DEFAULT_FN_INDEX,
            translate_from: DEFAULT_TRANSLATE_FROM.to_string(),
            translate_to: DEFAULT_TRANSLATE_TO.to_string(),
            translate: true,
        })
    }

    /// Configuration pointing at the hosted demo endpoint.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors [`ClientConfig::new`].
    pub fn hosted() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_WS_URL)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the incoming-message queue depth.  Zero is bumped to one because a
    /// bounded channel needs at least one slot.
    pub fn with_max_queue(mut self, max_queue: usize) -> Self {
        self.max_queue = max_queue.max(1);
        self
    }

    pub fn with_fn_index(mut self, fn_index: u32) -> Self {
        self.fn_index = fn_index;
        self
    }

    /// Sets the translation language pair (`source` → `target`).
    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.translate_from = source.into();
        self.translate_to = target.into();
        self
    }

    pub fn with_translation(mut self, enabled: bool) -> Self {
        self.translate = enabled;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn ws_url(&self) -> &Url {
        &self.ws_url
    }

    /// Timeout applied to the connect attempt and, independently, to every
    /// single read.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn max_queue(&self) -> usize {
        self.max_queue
    }

    pub fn fn_index(&self) -> u32 {
        self.fn_index
    }

    pub fn translate_from(&self) -> &str {
        &self.translate_from
    }

    pub fn translate_to(&self) -> &str {
        &self.translate_to
    }

    pub fn translation_enabled(&self) -> bool {
        self.translate
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_defaults() {
        // Arrange / Act
        let cfg = ClientConfig::new("wss://example.org/queue/join").unwrap();

        // Assert
        assert_eq!(cfg.timeout(), Duration::from_secs(60));
        assert_eq!(cfg.max_size(), 10 * 1024 * 1024);
        assert_eq!(cfg.max_queue(), 2048);
        assert_eq!(cfg.fn_index(), 2);
        assert_eq!(cfg.translate_from(), "ru");
        assert_eq!(cfg.translate_to(), "en");
        assert!(cfg.translation_enabled());
    }

    #[test]
    fn test_hosted_points_at_default_endpoint() {
        let cfg = ClientConfig::hosted().unwrap();
        assert_eq!(cfg.ws_url().as_str(), DEFAULT_WS_URL);
        assert_eq!(cfg.ws_url().host_str(), Some("google-sdxl.hf.space"));
    }

    #[test]
    fn test_url_without_scheme_is_rejected() {
        for url in ["google-sdxl.hf.space/queue/join", "/queue/join", "", "   "] {
            let err = ClientConfig::new(url).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidUrl { .. }),
                "{url:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_url_without_host_is_rejected() {
        for url in ["mailto:someone", "data:text/plain,hi", "file:///tmp/sock"] {
            let err = ClientConfig::new(url).unwrap_err();
            assert_eq!(err, ConfigError::MissingHost(url.to_string()));
        }
    }

    #[test]
    fn test_with_setters_override_fields() {
        let cfg = ClientConfig::new("ws://127.0.0.1:9000/")
            .unwrap()
            .with_timeout(Duration::from_millis(250))
            .with_max_size(1024)
            .with_max_queue(16)
            .with_fn_index(7)
            .with_languages("de", "fr")
            .with_translation(false);

        assert_eq!(cfg.timeout(), Duration::from_millis(250));
        assert_eq!(cfg.max_size(), 1024);
        assert_eq!(cfg.max_queue(), 16);
        assert_eq!(cfg.fn_index(), 7);
        assert_eq!(cfg.translate_from(), "de");
        assert_eq!(cfg.translate_to(), "fr");
        assert!(!cfg.translation_enabled());
    }

    #[test]
    fn test_zero_queue_depth_is_bumped_to_one() {
        let cfg = ClientConfig::new("ws://localhost/").unwrap().with_max_queue(0);
        assert_eq!(cfg.max_queue(), 1);
    }
}
