//! # ocr-text-server
//!
//! A small HTTP service that extracts clean text from images and PDFs using
//! the Mistral OCR API.
//!
//! The recognition itself happens at the provider. This crate validates the
//! upload, encodes it as a data URI, makes one API call, and strips the
//! returned markdown down to plain running text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (png / jpg / jpeg / pdf, ≤ 4 MiB)
//!  │
//!  ├─ 1. Validate  extension whitelist + size guard
//!  ├─ 2. Encode    bytes → data:<mime>;base64,…
//!  ├─ 3. OCR       POST /v1/ocr (image_url or document_url)
//!  ├─ 4. Clean     strip tags, images, headings, emphasis; flatten whitespace
//!  └─ 5. Classify  {"text"} | {"text", "warning", "debug"} | {"text", "debug"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr_text_server::{api::serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::builder()
//!         .api_key(std::env::var("MISTRAL_API_KEY").unwrap_or_default())
//!         .build()
//!         .expect("valid config");
//!     serve(config).await
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr-server` binary (clap + anyhow + tracing-subscriber + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::OcrError;
pub use extract::extract_text;
pub use pipeline::classify::ExtractionOutcome;
pub use pipeline::ocr::{DocumentRef, MistralOcr, OcrPage, OcrProvider, OcrResponse};
pub use pipeline::postprocess::clean_text;
pub use pipeline::upload::{allowed_file, FileKind, Upload};
