//! # sdxl-core
//!
//! Shared foundation for the SDXL queue client: domain types and the JSON
//! codec for the queue/session protocol spoken by the remote generation
//! service.
//!
//! This crate has no sockets, no async runtime and no HTTP client.  Everything
//! here is a pure function of its inputs (apart from the random source used to
//! mint session handles), which keeps the protocol rules testable without a
//! server.
//!
//! - **`domain`** – What a generation request *is*: the immutable
//!   [`ClientConfig`], the closed [`Style`] enumeration, the per-request
//!   [`SessionHash`], the [`GenerationRequest`] itself and the validated
//!   [`ImageDataUri`] results.
//!
//! - **`protocol`** – How those values travel over the wire: serde frame
//!   types and the encode/decode functions that enforce the expected shape of
//!   every frame.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `sdxl_core::Style` instead of `sdxl_core::domain::style::Style`.
pub use domain::config::{ClientConfig, ConfigError};
pub use domain::image::{is_valid_jpeg_data_uri, GeneratedImages, ImageDataUri, JPEG_DATA_URI_PREFIX};
pub use domain::request::GenerationRequest;
pub use domain::session::SessionHash;
pub use domain::style::{Style, UnknownStyle};
pub use protocol::codec::ProtocolError;
