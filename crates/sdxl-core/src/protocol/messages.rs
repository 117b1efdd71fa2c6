//! Serde types for the frames exchanged with the queue.
//!
//! Outgoing frames are plain structs whose field order matches the order the
//! service documents; `serde_json` preserves declaration order.  Incoming
//! frames are inspected as [`serde_json::Value`] by the codec because the
//! server attaches many fields the client never reads.

use std::fmt;

use serde::Serialize;

/// `msg` value announcing that the server wants the session handle.
pub const MSG_SEND_HASH: &str = "send_hash";

/// `msg` value announcing that the server wants the generation parameters.
pub const MSG_SEND_DATA: &str = "send_data";

/// The control value carried in an incoming frame's `msg` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    SendHash,
    SendData,
    /// Any other control value (`estimation`, `process_starts`, ...).
    Other(String),
    /// The frame is a JSON object without a string `msg` field.
    Missing,
}

impl QueueEvent {
    /// Classifies a raw `msg` value.
    pub fn from_msg(msg: Option<&str>) -> Self {
        match msg {
            Some(MSG_SEND_HASH) => QueueEvent::SendHash,
            Some(MSG_SEND_DATA) => QueueEvent::SendData,
            Some(other) => QueueEvent::Other(other.to_string()),
            None => QueueEvent::Missing,
        }
    }
}

impl fmt::Display for QueueEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueEvent::SendHash => f.write_str(MSG_SEND_HASH),
            QueueEvent::SendData => f.write_str(MSG_SEND_DATA),
            QueueEvent::Other(msg) => f.write_str(msg),
            QueueEvent::Missing => f.write_str("<no msg field>"),
        }
    }
}

/// Client → server: joins the queue for `fn_index` under `session_hash`.
///
/// ```json
/// {"fn_index":2,"session_hash":"k3x9q0a1bz"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashSubmission<'a> {
    pub fn_index: u32,
    pub session_hash: &'a str,
}

/// Client → server: the generation parameters.
///
/// `data` serializes as a four-element JSON array in the fixed order
/// prompt, negative prompt, guidance scale, style token.  `event_data` is
/// always `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSubmission<'a> {
    pub data: (&'a str, &'a str, f64, &'a str),
    pub event_data: Option<serde_json::Value>,
    pub fn_index: u32,
    pub session_hash: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_msg_classifies_known_values() {
        assert_eq!(QueueEvent::from_msg(Some("send_hash")), QueueEvent::SendHash);
        assert_eq!(QueueEvent::from_msg(Some("send_data")), QueueEvent::SendData);
        assert_eq!(
            QueueEvent::from_msg(Some("estimation")),
            QueueEvent::Other("estimation".to_string())
        );
        assert_eq!(QueueEvent::from_msg(None), QueueEvent::Missing);
    }

    #[test]
    fn test_data_submission_serializes_in_documented_order() {
        let frame = DataSubmission {
            data: ("a cat", "", 7.5, "Anime"),
            event_data: None,
            fn_index: 2,
            session_hash: "abcdefghij",
        };

        let text = serde_json::to_string(&frame).unwrap();

        assert_eq!(
            text,
            r#"{"data":["a cat","",7.5,"Anime"],"event_data":null,"fn_index":2,"session_hash":"abcdefghij"}"#
        );
    }

    #[test]
    fn test_hash_submission_has_exactly_two_fields() {
        let frame = HashSubmission {
            fn_index: 4,
            session_hash: "0123456789",
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value, json!({"fn_index": 4, "session_hash": "0123456789"}));
    }
}
