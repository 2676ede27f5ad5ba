//! CLI binary for ocr-text-server.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to `ServerConfig` and runs the HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use ocr_text_server::config::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_REQUEST_BYTES, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL,
};
use ocr_text_server::{api, ServerConfig};
use std::io;
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start on 0.0.0.0:5000 with the key from .env
  ocr-server

  # Custom port, 8 MiB upload ceiling
  ocr-server --port 8080 --max-upload-bytes 8388608

  # No upload ceiling
  ocr-server --max-upload-bytes 0

ENDPOINTS:
  POST /api/ocr        multipart field `file` (png, jpg, jpeg, pdf)
  POST /api/download   form field `text` → extracted_text.txt
  GET  /health         liveness check

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY        Mistral API key (also read from .env)
  MISTRAL_OCR_MODEL      Override the OCR model
  MISTRAL_API_BASE_URL   Override the API base URL
  OCR_HOST / OCR_PORT    Bind address
  RUST_LOG               Log filter, e.g. ocr_text_server=debug,tower_http=debug
"#;

/// Serve OCR text extraction over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "ocr-server",
    version,
    about = "Extract clean text from images and PDFs via Mistral OCR",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "OCR_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind.
    #[arg(short, long, env = "OCR_PORT", default_value_t = 5000)]
    port: u16,

    /// Upload size ceiling in bytes (0 disables the check).
    #[arg(long, env = "OCR_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Ceiling for the whole request body in bytes.
    #[arg(long, env = "OCR_MAX_REQUEST_BYTES", default_value_t = DEFAULT_MAX_REQUEST_BYTES)]
    max_request_bytes: usize,

    /// Mistral API key.
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OCR API base URL.
    #[arg(long, env = "MISTRAL_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// OCR model ID.
    #[arg(long, env = "MISTRAL_OCR_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "ocr_text_server=debug,tower_http=debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    tracing::info!("Starting ocr-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("{:?}", config);

    api::serve(config).await.context("Server failed")?;
    Ok(())
}

/// Map CLI args to `ServerConfig`.
fn build_config(cli: &Cli) -> Result<ServerConfig> {
    let mut builder = ServerConfig::builder()
        .host(cli.host)
        .port(cli.port)
        .max_upload_bytes(Some(cli.max_upload_bytes))
        .max_request_bytes(cli.max_request_bytes)
        .api_base_url(cli.api_base_url.clone())
        .model(cli.model.clone());

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }

    builder.build().context("Invalid configuration")
}
