//! Optional prompt translation.
//!
//! The remote generator understands English best, so prompts can be machine
//! translated before submission.  [`TextTranslator`] is the backend seam (the
//! production implementation calls Google Translate; tests inject recording
//! doubles) and [`PromptTranslator`] adds the rules every backend shares:
//!
//! - translation disabled → input returned unchanged
//! - empty input → returned unchanged, the backend is never called
//! - backend failure → [`TranslateError`], never a silent fallback

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a translation backend.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The HTTP request itself failed (DNS, connect, TLS, body read).
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("translation service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// The backend answered, but not in the expected format.
    #[error("unexpected translation response: {0}")]
    Response(String),

    /// The backend rejected the language pair.
    #[error("unsupported language pair {source_lang} -> {target_lang}")]
    UnsupportedLanguage {
        source_lang: String,
        target_lang: String,
    },
}

/// A translation backend for one configured language pair.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translates non-empty `text`.
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

/// Applies the enable flag and the empty-input rule around a backend.
#[derive(Clone)]
pub struct PromptTranslator {
    backend: Option<Arc<dyn TextTranslator>>,
}

impl PromptTranslator {
    /// An adapter that forwards non-empty text to `backend`.
    pub fn enabled(backend: Arc<dyn TextTranslator>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// An adapter that always returns its input unchanged.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Translates `text`, or returns it byte-for-byte when translation is off
    /// or `text` is empty.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`TranslateError`] unchanged.
    pub async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        match &self.backend {
            Some(backend) if !text.is_empty() => backend.translate(text).await,
            _ => Ok(text.to_string()),
        }
    }
}

impl std::fmt::Debug for PromptTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTranslator")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingTranslator {
        calls: Mutex<Vec<String>>,
        should_fail: bool,
    }

    #[async_trait]
    impl TextTranslator for RecordingTranslator {
        async fn translate(&self, text: &str) -> Result<String, TranslateError> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.should_fail {
                return Err(TranslateError::Response("injected failure".to_string()));
            }
            Ok(format!("en({text})"))
        }
    }

    #[tokio::test]
    async fn test_enabled_translates_non_empty_text() {
        // Arrange
        let backend = Arc::new(RecordingTranslator::default());
        let translator = PromptTranslator::enabled(backend.clone());

        // Act
        let out = translator.translate("кот").await.unwrap();

        // Assert
        assert_eq!(out, "en(кот)");
        assert_eq!(*backend.calls.lock().unwrap(), vec!["кот".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_text_skips_backend() {
        let backend = Arc::new(RecordingTranslator {
            should_fail: true,
            ..Default::default()
        });
        let translator = PromptTranslator::enabled(backend.clone());

        let out = translator.translate("").await.unwrap();

        assert_eq!(out, "");
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_returns_input_unchanged() {
        let translator = PromptTranslator::disabled();
        for input in ["", "  spaced  ", "привет мир", "emoji 🎨\n\ttabs", "\u{0}nul"] {
            let out = translator.translate(input).await.unwrap();
            assert_eq!(out.as_bytes(), input.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let backend = Arc::new(RecordingTranslator {
            should_fail: true,
            ..Default::default()
        });
        let translator = PromptTranslator::enabled(backend);

        let err = translator.translate("кот").await.unwrap_err();

        assert!(matches!(err, TranslateError::Response(_)));
    }

    #[test]
    fn test_is_enabled_reflects_construction() {
        assert!(!PromptTranslator::disabled().is_enabled());
        let backend: Arc<dyn TextTranslator> = Arc::new(RecordingTranslator::default());
        assert!(PromptTranslator::enabled(backend).is_enabled());
    }
}
