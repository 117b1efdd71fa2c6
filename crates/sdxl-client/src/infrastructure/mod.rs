//! Infrastructure layer for sdxl-client.
//!
//! Everything that touches the network or the file system:
//!
//! - `queue_conn`        – one WebSocket connection (tokio-tungstenite)
//! - `generation_client` – the queue exchange run over that connection
//! - `google_translate`  – HTTP translation backend (reqwest)
//! - `settings`          – TOML settings file

pub mod generation_client;
pub mod google_translate;
pub mod queue_conn;
pub mod settings;

pub use generation_client::GenerationClient;
pub use google_translate::GoogleTranslator;
pub use settings::{Settings, SettingsError};
