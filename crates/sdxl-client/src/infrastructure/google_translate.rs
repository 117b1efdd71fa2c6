//! Google Translate backend for [`TextTranslator`].
//!
//! Uses the keyless web endpoint (`translate_a/single?client=gtx`) that the
//! public translate widget talks to.  The response is a nested JSON array; the
//! translated text is the concatenation of the first string in every element
//! of the outer array's first element:
//!
//! ```json
//! [[["Hello, ","Привет, ",null,null,10],["world","мир",null,null,10]],null,"ru"]
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::application::{TextTranslator, TranslateError};

/// Public web endpoint used when no other endpoint is configured.
pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Translates between one fixed language pair.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    http: Client,
    endpoint: String,
    source: String,
    target: String,
    timeout: Duration,
}

impl GoogleTranslator {
    /// A translator for `source` → `target` against the public endpoint.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_TRANSLATE_ENDPOINT, source, target)
    }

    /// A translator against a custom endpoint (proxies, tests).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            source: source.into(),
            target: target.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Bounds each translation request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn is_identity(&self) -> bool {
        self.source.eq_ignore_ascii_case(&self.target)
    }
}

#[async_trait]
impl TextTranslator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() || self.is_identity() {
            return Ok(text.to_string());
        }

        debug!(
            "translating {} chars {} -> {}",
            text.chars().count(),
            self.source,
            self.target
        );

        let response = self
            .http
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::BAD_REQUEST {
            // The endpoint answers 400 for language codes it does not know.
            return Err(TranslateError::UnsupportedLanguage {
                source_lang: self.source.clone(),
                target_lang: self.target.clone(),
            });
        }
        if !status.is_success() {
            return Err(TranslateError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| TranslateError::Response(format!("body is not JSON: {e}")))?;
        let translated = join_segments(&value)?;

        // Non-blank input must come back as non-blank text.
        if translated.trim().is_empty() {
            return Err(TranslateError::Response("no translated segments".to_string()));
        }
        Ok(translated)
    }
}

/// Concatenates the translated segments of a `translate_a/single` response.
///
/// A `null` or empty segment list is an empty translation; the endpoint
/// answers that way for blank queries.
fn join_segments(value: &Value) -> Result<String, TranslateError> {
    match value.get(0) {
        Some(Value::Null) => Ok(String::new()),
        Some(Value::Array(segments)) => Ok(segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect()),
        _ => Err(TranslateError::Response("missing segment list".to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
