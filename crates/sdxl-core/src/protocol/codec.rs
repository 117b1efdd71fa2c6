//! JSON codec for queue protocol frames.
//!
//! Decoding is strict about the parts of a frame the client acts on and
//! indifferent to everything else:
//!
//! - control frames must be JSON objects; only their `msg` field is read
//! - result frames must contain `output.data[0]` as an array; each entry in it
//!   is kept only if it is a valid JPEG data URI

use serde_json::Value;
use thiserror::Error;

use crate::domain::image::{GeneratedImages, ImageDataUri};
use crate::domain::session::SessionHash;
use crate::domain::style::Style;
use crate::protocol::messages::{DataSubmission, HashSubmission, QueueEvent};

/// Errors raised while encoding or decoding queue frames.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// A control frame was not the one the current protocol step requires, or
    /// was not a JSON object at all.
    #[error("unexpected message: expected {expected}, got {actual}")]
    UnexpectedMessage { expected: String, actual: String },

    /// The result frame does not have the `output.data[0]` array shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The result frame was well-formed but no entry was a valid JPEG data URI.
    #[error("no valid images in response")]
    EmptyResult,

    /// An outgoing frame could not be serialized.
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

// ── Incoming frames ───────────────────────────────────────────────────────────

/// Reads the control value of an incoming frame.
///
/// `expected` names the control value the caller is waiting for and is only
/// used to build the error message when `text` is not a JSON object.
///
/// # Errors
///
/// Returns [`ProtocolError::UnexpectedMessage`] if `text` is not valid JSON or
/// is valid JSON but not an object.
///
/// ```rust
/// use sdxl_core::protocol::{decode_control, QueueEvent};
///
/// let event = decode_control(r#"{"msg":"send_hash"}"#, "send_hash").unwrap();
/// assert_eq!(event, QueueEvent::SendHash);
/// assert!(decode_control("not json", "send_hash").is_err());
/// ```
pub fn decode_control(text: &str, expected: &str) -> Result<QueueEvent, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::UnexpectedMessage {
            expected: expected.to_string(),
            actual: format!("malformed JSON ({e})"),
        })?;

    let Some(object) = value.as_object() else {
        return Err(ProtocolError::UnexpectedMessage {
            expected: expected.to_string(),
            actual: format!("non-object JSON frame ({})", json_kind(&value)),
        });
    };

    Ok(QueueEvent::from_msg(object.get("msg").and_then(Value::as_str)))
}

/// Parses the final result frame into the images it carries.
///
/// # Errors
///
/// - [`ProtocolError::MalformedResponse`] if `text` is not JSON or lacks an
///   `output` object whose `data` array starts with an array.
/// - [`ProtocolError::EmptyResult`] if no candidate survives filtering.
pub fn decode_result(text: &str) -> Result<GeneratedImages, ProtocolError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProtocolError::MalformedResponse(format!("result is not JSON: {e}")))?;

    let output = value
        .get("output")
        .and_then(Value::as_object)
        .ok_or_else(|| ProtocolError::MalformedResponse("missing `output` object".into()))?;

    let data = output
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ProtocolError::MalformedResponse("missing `output.data` array".into()))?;

    let candidates = data
        .first()
        .ok_or_else(|| ProtocolError::MalformedResponse("`output.data` is empty".into()))?
        .as_array()
        .ok_or_else(|| {
            ProtocolError::MalformedResponse("`output.data[0]` is not an array".into())
        })?;

    GeneratedImages::new(retain_valid_images(candidates)).ok_or(ProtocolError::EmptyResult)
}

/// Keeps, in order, the candidates that are strings holding a valid JPEG data
/// URI.  Everything else is dropped without error.
pub fn retain_valid_images(candidates: &[Value]) -> Vec<ImageDataUri> {
    candidates
        .iter()
        .filter_map(Value::as_str)
        .filter_map(ImageDataUri::parse)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Outgoing frames ───────────────────────────────────────────────────────────

/// Encodes the session-handle submission frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_hash_submission(fn_index: u32, session: &SessionHash) -> Result<String, ProtocolError> {
    let frame = HashSubmission {
        fn_index,
        session_hash: session.as_str(),
    };
    serde_json::to_string(&frame).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Encodes the generation-parameter frame.
///
/// `prompt` and `negative_prompt` are expected to be already translated.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_data_submission(
    fn_index: u32,
    session: &SessionHash,
    prompt: &str,
    negative_prompt: &str,
    cfg_scale: f64,
    style: Style,
) -> Result<String, ProtocolError> {
    let frame = DataSubmission {
        data: (prompt, negative_prompt, cfg_scale, style.token()),
        event_data: None,
        fn_index,
        session_hash: session.as_str(),
    };
    serde_json::to_string(&frame).map_err(|e| ProtocolError::Encode(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::JPEG_DATA_URI_PREFIX;
    use serde_json::json;

    fn jpeg(body: &str) -> String {
        format!("{JPEG_DATA_URI_PREFIX}{body}")
    }

    // ── decode_control ────────────────────────────────────────────────────────

    #[test]
    fn test_decode_control_ignores_extra_fields() {
        let event = decode_control(r#"{"msg":"send_data","rank":3,"queue_size":9}"#, "x").unwrap();
        assert_eq!(event, QueueEvent::SendData);
    }

    #[test]
    fn test_decode_control_without_msg_is_missing() {
        let event = decode_control(r#"{"rank":3}"#, "send_hash").unwrap();
        assert_eq!(event, QueueEvent::Missing);
    }

    #[test]
    fn test_decode_control_non_string_msg_is_missing() {
        let event = decode_control(r#"{"msg":42}"#, "send_hash").unwrap();
        assert_eq!(event, QueueEvent::Missing);
    }

    #[test]
    fn test_decode_control_malformed_json_is_unexpected_message() {
        let err = decode_control("{not json", "send_hash").unwrap_err();
        assert!(
            matches!(&err, ProtocolError::UnexpectedMessage { expected, .. } if expected == "send_hash"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_decode_control_array_is_unexpected_message() {
        let err = decode_control(r#"["send_hash"]"#, "send_hash").unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedMessage { .. }));
    }

    // ── decode_result ─────────────────────────────────────────────────────────

    #[test]
    fn test_decode_result_keeps_only_valid_jpegs_in_order() {
        // Arrange: valid, wrong mime, bad base64, non-string, valid
        let frame = json!({
            "msg": "process_completed",
            "output": {
                "data": [[
                    jpeg("AAAA"),
                    "data:image/png;base64,AAAA",
                    jpeg("%%%"),
                    17,
                    jpeg("BBBB"),
                ], "ignored"],
                "is_generating": false
            }
        });

        // Act
        let images = decode_result(&frame.to_string()).unwrap();

        // Assert
        let got: Vec<String> = images.into_iter().map(ImageDataUri::into_string).collect();
        assert_eq!(got, vec![jpeg("AAAA"), jpeg("BBBB")]);
    }

    #[test]
    fn test_decode_result_empty_candidate_list_is_empty_result() {
        let frame = json!({"output": {"data": [[]]}});
        assert_eq!(decode_result(&frame.to_string()), Err(ProtocolError::EmptyResult));
    }

    #[test]
    fn test_decode_result_all_nonconforming_is_empty_result() {
        let frame = json!({"output": {"data": [["nope", null, {"url": "x"}]]}});
        assert_eq!(decode_result(&frame.to_string()), Err(ProtocolError::EmptyResult));
    }

    #[test]
    fn test_decode_result_shape_violations_are_malformed() {
        let cases = [
            "not json".to_string(),
            json!({}).to_string(),
            json!({"output": null}).to_string(),
            json!({"output": {}}).to_string(),
            json!({"output": {"data": "x"}}).to_string(),
            json!({"output": {"data": []}}).to_string(),
            json!({"output": {"data": [jpeg("AAAA")]}}).to_string(),
        ];
        for text in cases {
            let result = decode_result(&text);
            assert!(
                matches!(result, Err(ProtocolError::MalformedResponse(_))),
                "{text} gave {result:?}"
            );
        }
    }

    // ── encode_* ──────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_hash_submission_shape() {
        let session = SessionHash::generate();
        let text = encode_hash_submission(2, &session).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"fn_index": 2, "session_hash": session.as_str()}));
    }

    #[test]
    fn test_encode_data_submission_shape() {
        let session = SessionHash::generate();

        let text =
            encode_data_submission(2, &session, "a red fox", "blurry", 7.5, Style::PixelArt).unwrap();

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "data": ["a red fox", "blurry", 7.5, "Pixel art"],
                "event_data": null,
                "fn_index": 2,
                "session_hash": session.as_str(),
            })
        );
    }
}
