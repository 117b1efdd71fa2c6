//! Application layer for sdxl-client.
//!
//! Knows *what* a generation attempt needs (translated prompts, a typed error
//! taxonomy) but not *how* the bytes move.  Sockets and HTTP live in the
//! infrastructure layer.

pub mod error;
pub mod translate_prompt;

pub use error::ClientError;
pub use translate_prompt::{PromptTranslator, TextTranslator, TranslateError};
