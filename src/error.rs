//! Error type for the ocr-text-server library.
//!
//! Every failure is request-scoped: nothing is retried and nothing is left
//! behind. [`OcrError`] groups failures into the three classes a caller of
//! `POST /api/ocr` can observe:
//!
//! * **Input errors** (400): the upload is missing, unnamed, of the wrong
//!   type, too large, or the form body is malformed.
//! * **Encoding errors** (500): the upload could not be turned into a
//!   data URI. Unreachable after validation.
//! * **Processing errors** (500): anything the OCR provider or the network
//!   reports. Their message is prefixed with `Error processing file:` so the
//!   underlying error string reaches the client unchanged.

use axum::http::StatusCode;
use thiserror::Error;

/// All errors returned by the ocr-text-server library.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The multipart body has no `file` field.
    #[error("No file part")]
    NoFilePart,

    /// The `file` field is present but carries an empty filename.
    #[error("No selected file")]
    NoSelectedFile,

    /// The filename has no dot or its extension is not accepted.
    #[error("Unsupported file format")]
    UnsupportedFormat { filename: String },

    /// The upload exceeds the configured byte ceiling.
    #[error(
        "File too large: {size} bytes exceeds the maximum allowed size of {limit} bytes ({:.1} MiB)",
        mib(.limit)
    )]
    FileTooLarge { size: usize, limit: usize },

    /// The request body could not be read as form data.
    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    // ── Encoding errors ───────────────────────────────────────────────────
    /// No data-URI MIME marker exists for the extension.
    #[error("Failed to encode file")]
    EncodingFailed { extension: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// The OCR provider cannot be called (missing API key etc.).
    #[error("Error processing file: OCR provider '{provider}' is not configured. {hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The OCR provider answered with a non-success status.
    #[error("Error processing file: OCR API returned {status}: {message}")]
    ProviderApi { status: u16, message: String },

    /// The request to the provider failed at the transport level or its
    /// response could not be decoded.
    #[error("Error processing file: {0}")]
    Http(#[from] reqwest::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn mib(bytes: &usize) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

impl OcrError {
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            OcrError::NoFilePart
            | OcrError::NoSelectedFile
            | OcrError::UnsupportedFormat { .. }
            | OcrError::FileTooLarge { .. }
            | OcrError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            OcrError::EncodingFailed { .. }
            | OcrError::ProviderNotConfigured { .. }
            | OcrError::ProviderApi { .. }
            | OcrError::Http(_)
            | OcrError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `true` for errors caused by the client's input.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
