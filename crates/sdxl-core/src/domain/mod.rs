//! Domain layer: pure value types describing one generation attempt.
//!
//! Nothing in here performs I/O.  The infrastructure layer of `sdxl-client`
//! owns the socket; these types only describe what goes over it.

pub mod config;
pub mod image;
pub mod request;
pub mod session;
pub mod style;
