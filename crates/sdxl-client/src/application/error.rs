//! The error taxonomy returned by a generation call.
//!
//! Every domain-specific failure has its own variant and reaches the caller
//! as-is.  Only failures nobody anticipated (TLS or HTTP errors after the
//! handshake, a panicked reader task, an encoding bug) are wrapped in
//! [`ClientError::Other`].

use std::time::Duration;

use thiserror::Error;

use sdxl_core::ProtocolError;

use crate::application::translate_prompt::TranslateError;

/// Failure of one generation attempt.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The prompt or negative prompt could not be translated.
    #[error("translation failed: {0}")]
    TranslationFailed(#[from] TranslateError),

    /// The WebSocket connection could not be opened (refused, DNS, TLS,
    /// handshake rejected, or connect timeout).
    #[error("connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// A read did not complete within the configured timeout.
    #[error("connection timeout after {timeout:?} while waiting for {stage}")]
    ConnectionTimeout {
        stage: &'static str,
        timeout: Duration,
    },

    /// The server closed the connection, or it dropped, mid-exchange.
    #[error("connection closed unexpectedly: {0}")]
    ConnectionClosed(String),

    /// A control frame other than the one the protocol requires.
    #[error("unexpected message: expected {expected}, got {actual}")]
    UnexpectedMessage { expected: String, actual: String },

    /// The result frame lacks the `output.data[0]` array.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The result frame held no valid JPEG data URI.
    #[error("no valid images in response")]
    EmptyResult,

    /// Anything else, with the original cause attached.
    #[error("unexpected error: {0:#}")]
    Other(#[source] anyhow::Error),
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::UnexpectedMessage { expected, actual } => {
                ClientError::UnexpectedMessage { expected, actual }
            }
            ProtocolError::MalformedResponse(reason) => ClientError::MalformedResponse(reason),
            ProtocolError::EmptyResult => ClientError::EmptyResult,
            other @ ProtocolError::Encode(_) => ClientError::Other(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_map_one_to_one() {
        let err: ClientError = ProtocolError::UnexpectedMessage {
            expected: "send_hash".into(),
            actual: "estimation".into(),
        }
        .into();
        assert!(matches!(
            err,
            ClientError::UnexpectedMessage { ref expected, ref actual }
                if expected == "send_hash" && actual == "estimation"
        ));

        let err: ClientError = ProtocolError::MalformedResponse("x".into()).into();
        assert!(matches!(err, ClientError::MalformedResponse(ref r) if r == "x"));

        let err: ClientError = ProtocolError::EmptyResult.into();
        assert!(matches!(err, ClientError::EmptyResult));
    }

    #[test]
    fn test_encode_failure_is_wrapped() {
        let err: ClientError = ProtocolError::Encode("boom".into()).into();
        assert!(matches!(err, ClientError::Other(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_timeout_message_names_stage() {
        let err = ClientError::ConnectionTimeout {
            stage: "send_hash",
            timeout: Duration::from_secs(3),
        };
        assert_eq!(
            err.to_string(),
            "connection timeout after 3s while waiting for send_hash"
        );
    }
}
