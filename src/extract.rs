//! Library entry point: run one upload through the whole pipeline.
//!
//! The HTTP handler is a thin shim over [`extract_text`]; anything that can
//! produce an [`Upload`] (a CLI, a queue consumer, a test) can call it
//! directly.

use crate::config::ServerConfig;
use crate::error::OcrError;
use crate::pipeline::classify::{classify, ExtractionOutcome};
use crate::pipeline::encode::encode_document;
use crate::pipeline::ocr::{DocumentRef, OcrProvider};
use crate::pipeline::upload::{validate_upload, Upload};
use std::time::Instant;
use tracing::info;

/// Validate, encode, recognise and clean one upload.
///
/// # Errors
/// - input errors (bad filename, oversized payload) before any encoding
/// - [`OcrError::EncodingFailed`] if no data URI can be built
/// - any error reported by `provider`
pub async fn extract_text(
    upload: &Upload,
    provider: &dyn OcrProvider,
    config: &ServerConfig,
) -> Result<ExtractionOutcome, OcrError> {
    let start = Instant::now();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let kind = validate_upload(upload, config.max_upload_bytes)?;

    // ── Step 2: Encode ───────────────────────────────────────────────────
    let data_uri = encode_document(&upload.bytes, kind.extension()).ok_or_else(|| {
        OcrError::EncodingFailed {
            extension: kind.extension().to_string(),
        }
    })?;
    let document = DocumentRef::for_kind(kind, data_uri);

    // ── Step 3: Recognise ────────────────────────────────────────────────
    info!(
        "Sending '{}' to {} as {}",
        upload.filename,
        provider.name(),
        document.kind_name()
    );
    let response = provider.process(&document).await?;

    // ── Step 4: Clean and classify ───────────────────────────────────────
    let outcome = classify(&response, kind);
    info!(
        "Processed '{}' in {}ms",
        upload.filename,
        start.elapsed().as_millis()
    );
    Ok(outcome)
}
