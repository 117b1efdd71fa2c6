//! Queue protocol: frame types and the JSON codec.
//!
//! One generation attempt is a fixed exchange of JSON text frames on a single
//! WebSocket connection:
//!
//! ```text
//! server → client  {"msg":"send_hash", ...}
//! client → server  {"fn_index":2,"session_hash":"k3x9q0a1bz"}
//! server → client  {"msg":"estimation", ...}      (zero or more, ignored)
//! server → client  {"msg":"send_data", ...}
//! client → server  {"data":[prompt,negative,cfg,style],"event_data":null,
//!                   "fn_index":2,"session_hash":"k3x9q0a1bz"}
//! server → client  progress frame                 (ignored)
//! server → client  {"output":{"data":[["data:image/jpeg;base64,..."]]}}
//! ```

pub mod codec;
pub mod messages;

pub use codec::{
    decode_control, decode_result, encode_data_submission, encode_hash_submission,
    retain_valid_images, ProtocolError,
};
pub use messages::{DataSubmission, HashSubmission, QueueEvent};
