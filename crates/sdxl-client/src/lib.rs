//! sdxl-client library crate.
//!
//! Submits a text prompt to a remote, queue-based SDXL image-generation
//! service over WebSocket, optionally machine-translating the prompt first,
//! and returns the generated JPEG images as data URIs.
//!
//! # Architecture
//!
//! ```text
//! caller (CLI, web handler, ...)
//!         ↓  GenerationRequest
//! [sdxl-client]
//!   ├── application/      PromptTranslator, TextTranslator seam, ClientError
//!   └── infrastructure/
//!         ├── generation_client/  queue exchange state machine
//!         ├── queue_conn/         WebSocket connection (tokio-tungstenite)
//!         ├── google_translate/   translation backend (reqwest)
//!         └── settings/           TOML settings file
//!         ↓  JSON text frames
//! remote queue  (wss://.../queue/join)
//! ```
//!
//! Frame shapes, validation rules and domain types live in `sdxl-core`.
//!
//! # Example
//!
//! ```no_run
//! use sdxl_client::GenerationClient;
//! use sdxl_core::{ClientConfig, GenerationRequest, Style};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GenerationClient::new(ClientConfig::hosted()?);
//! let request = GenerationRequest::new("маяк на закате").with_style(Style::Cinematic);
//! let images = client.generate(&request).await?;
//! println!("{}", images.first().as_str());
//! # Ok(())
//! # }
//! ```

/// Application layer: translation adapter and the error taxonomy.
pub mod application;

/// Infrastructure layer: WebSocket client, translation backend, settings.
pub mod infrastructure;

pub use application::{ClientError, PromptTranslator, TextTranslator, TranslateError};
pub use infrastructure::{GenerationClient, GoogleTranslator, Settings, SettingsError};
