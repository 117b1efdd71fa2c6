//! sdxl-gen: generate one image from the command line.
//!
//! A thin caller of [`GenerationClient`]: it builds a configuration, submits a
//! prompt, and either writes the first returned JPEG to a file or prints its
//! data URI.
//!
//! # Usage
//!
//! ```text
//! sdxl-gen [OPTIONS] <PROMPT>
//!
//! Options:
//!   --negative <TEXT>         Negative prompt [default: ""]
//!   --cfg-scale <F>           Guidance scale [default: 7.5]
//!   --style-index <N>         Style ordinal, see --list-styles [default: 0]
//!   --config <PATH>           TOML settings file
//!   --ws-url <URL>            Queue endpoint
//!   --timeout-secs <SECS>     Per-read timeout
//!   --fn-index <N>            Remote function index
//!   --translate-from <LANG>   Translation source language
//!   --translate-to <LANG>     Translation target language
//!   --no-translate            Submit the prompt untranslated
//!   --output <PATH>           Write the decoded JPEG here
//!   --list-styles             Print the style list and exit
//! ```
//!
//! # Precedence
//!
//! Built-in defaults < `--config` file < environment variables / CLI flags.
//!
//! | Variable              | Flag               |
//! |-----------------------|--------------------|
//! | `SDXL_WS_URL`         | `--ws-url`         |
//! | `SDXL_TIMEOUT_SECS`   | `--timeout-secs`   |
//! | `SDXL_FN_INDEX`       | `--fn-index`       |
//! | `SDXL_CONFIG`         | `--config`         |

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sdxl_client::{ClientError, GenerationClient, GoogleTranslator, Settings};
use sdxl_core::{GeneratedImages, GenerationRequest, Style};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Generate an image with a queue-based SDXL service.
#[derive(Debug, Parser)]
#[command(name = "sdxl-gen", about = "Generate an image with a queue-based SDXL service", version)]
struct Cli {
    /// Text prompt (translated first unless --no-translate).
    #[arg(required_unless_present = "list_styles")]
    prompt: Option<String>,

    /// Things the image should not contain.
    #[arg(long, default_value = "")]
    negative: String,

    /// How strictly generation follows the prompt.
    #[arg(long, default_value_t = 7.5)]
    cfg_scale: f64,

    /// Style ordinal; out-of-range values mean "(No style)".
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    style_index: i64,

    /// TOML settings file.
    #[arg(long, env = "SDXL_CONFIG")]
    config: Option<PathBuf>,

    /// Queue endpoint, e.g. `wss://host/queue/join`.
    #[arg(long, env = "SDXL_WS_URL")]
    ws_url: Option<String>,

    /// Per-read timeout in seconds.
    #[arg(long, env = "SDXL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Index of the remote generation function.
    #[arg(long, env = "SDXL_FN_INDEX")]
    fn_index: Option<u32>,

    #[arg(long)]
    translate_from: Option<String>,

    #[arg(long)]
    translate_to: Option<String>,

    /// Submit prompts untranslated.
    #[arg(long)]
    no_translate: bool,

    /// Write the decoded JPEG to this path instead of printing the data URI.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the available styles and exit.
    #[arg(long)]
    list_styles: bool,
}

impl Cli {
    /// Layers CLI/env values over `settings`.
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(url) = &self.ws_url {
            settings.service.ws_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.service.timeout_secs = secs;
        }
        if let Some(fn_index) = self.fn_index {
            settings.service.fn_index = fn_index;
        }
        if let Some(lang) = &self.translate_from {
            settings.translation.source = lang.clone();
        }
        if let Some(lang) = &self.translate_to {
            settings.translation.target = lang.clone();
        }
        if self.no_translate {
            settings.translation.enabled = false;
        }
    }

    fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.prompt.clone().unwrap_or_default())
            .with_negative_prompt(self.negative.clone())
            .with_cfg_scale(self.cfg_scale)
            .with_style(Style::from_index(self.style_index))
    }
}

fn print_styles() {
    for (index, style) in Style::ALL.iter().enumerate() {
        println!("{index:>2}  {style}");
    }
}

/// Races a generation against `interrupt`.
///
/// An interrupt drops the generation future, which closes the connection, and
/// is reported as an error so the process exits non-zero.
async fn generate_or_interrupt<G, I>(generation: G, interrupt: I) -> anyhow::Result<GeneratedImages>
where
    G: Future<Output = Result<GeneratedImages, ClientError>>,
    I: Future,
{
    tokio::select! {
        result = generation => result.context("image generation failed"),
        _ = interrupt => anyhow::bail!("interrupted; generation cancelled"),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls verbosity; fall back to `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_styles {
        print_styles();
        return Ok(());
    }

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    cli.apply_overrides(&mut settings);

    let config = settings
        .to_client_config()
        .context("invalid client configuration")?;
    let translator = GoogleTranslator::with_endpoint(
        settings.translation.endpoint.clone(),
        config.translate_from(),
        config.translate_to(),
    )
    .with_timeout(config.timeout());
    let client = GenerationClient::with_translator(config, Arc::new(translator));
    let request = cli.request();

    info!(
        "requesting image from {} (style: {})",
        client.config().ws_url(),
        request.style
    );

    let images = generate_or_interrupt(client.generate(&request), tokio::signal::ctrl_c()).await?;

    let image = images.first();
    match &cli.output {
        Some(path) => {
            let bytes = image
                .decode_bytes()
                .context("returned image is not valid base64")?;
            tokio::fs::write(path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => println!("{}", image.as_str()),
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
