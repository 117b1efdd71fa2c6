//! The generation protocol client.
//!
//! [`GenerationClient::generate`] runs one complete queue exchange on a fresh
//! connection:
//!
//! 1. connect
//! 2. wait for `send_hash`; anything else is an error
//! 3. send `{fn_index, session_hash}` with a freshly minted handle
//! 4. wait for `send_data`, skipping every other control frame
//! 5. translate the prompts, send the parameter frame
//! 6. read one progress frame (discarded), then the result frame
//! 7. validate the result and return the surviving images
//!
//! Each read is bounded by the configured timeout on its own.  Step 4 has no
//! iteration cap: a server that keeps sending unrelated control frames faster
//! than the timeout can hold the caller indefinitely.  A caller that needs a
//! hard deadline wraps `generate` in `tokio::time::timeout`; expiry drops the
//! future and with it the connection.
//!
//! Exactly one attempt is made per call: no retry, no reconnect.

use std::sync::Arc;

use tracing::debug;

use sdxl_core::protocol::messages::{MSG_SEND_DATA, MSG_SEND_HASH};
use sdxl_core::protocol::{
    decode_control, decode_result, encode_data_submission, encode_hash_submission, QueueEvent,
};
use sdxl_core::{ClientConfig, GeneratedImages, GenerationRequest, SessionHash};

use crate::application::{ClientError, PromptTranslator, TextTranslator};
use crate::infrastructure::google_translate::GoogleTranslator;
use crate::infrastructure::queue_conn::QueueConnection;

/// Client for a queue-based SDXL generation service.
///
/// Holds only immutable state, so one client can serve many overlapping
/// `generate` calls; each call opens its own connection and session handle.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    config: ClientConfig,
    translator: PromptTranslator,
}

impl GenerationClient {
    /// A client that translates with Google Translate when `config` enables
    /// translation.
    pub fn new(config: ClientConfig) -> Self {
        let backend = Arc::new(
            GoogleTranslator::new(config.translate_from(), config.translate_to())
                .with_timeout(config.timeout()),
        );
        Self::with_translator(config, backend)
    }

    /// A client using `backend` for translation.  `backend` is ignored when
    /// `config` disables translation.
    pub fn with_translator(config: ClientConfig, backend: Arc<dyn TextTranslator>) -> Self {
        let translator = if config.translation_enabled() {
            PromptTranslator::enabled(backend)
        } else {
            PromptTranslator::disabled()
        };
        Self { config, translator }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Generates images for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] describing the first step that failed.  The
    /// connection is closed on every path before this returns.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImages, ClientError> {
        let mut conn = QueueConnection::open(&self.config).await?;
        let session = SessionHash::generate();

        let outcome = self.exchange(&mut conn, &session, request).await;

        match &outcome {
            // Nothing left to close.
            Err(ClientError::ConnectionClosed(_)) => {}
            _ => conn.close().await,
        }

        match &outcome {
            Ok(images) => debug!("session {session}: received {} image(s)", images.len()),
            Err(e) => debug!("session {session}: generation failed: {e}"),
        }
        outcome
    }

    async fn exchange(
        &self,
        conn: &mut QueueConnection,
        session: &SessionHash,
        request: &GenerationRequest,
    ) -> Result<GeneratedImages, ClientError> {
        let fn_index = self.config.fn_index();

        // ── Handshake ─────────────────────────────────────────────────────────
        let frame = conn.recv_text(MSG_SEND_HASH).await?;
        match decode_control(&frame, MSG_SEND_HASH)? {
            QueueEvent::SendHash => {}
            other => {
                return Err(ClientError::UnexpectedMessage {
                    expected: MSG_SEND_HASH.to_string(),
                    actual: other.to_string(),
                })
            }
        }

        debug!("session {session}: joining queue for fn_index {fn_index}");
        conn.send_text(encode_hash_submission(fn_index, session)?).await?;

        loop {
            let frame = conn.recv_text(MSG_SEND_DATA).await?;
            match decode_control(&frame, MSG_SEND_DATA)? {
                QueueEvent::SendData => break,
                other => debug!("session {session}: ignoring `{other}` while waiting for send_data"),
            }
        }

        // ── Parameters ────────────────────────────────────────────────────────
        let prompt = self.translator.translate(&request.prompt).await?;
        let negative_prompt = self.translator.translate(&request.negative_prompt).await?;

        debug!(
            "session {session}: submitting parameters (cfg_scale={}, style={})",
            request.cfg_scale, request.style
        );
        let frame = encode_data_submission(
            fn_index,
            session,
            &prompt,
            &negative_prompt,
            request.cfg_scale,
            request.style,
        )?;
        conn.send_text(frame).await?;

        // ── Result ────────────────────────────────────────────────────────────
        let _progress = conn.recv_text("progress").await?;
        let result = conn.recv_text("result").await?;

        Ok(decode_result(&result)?)
    }
}
