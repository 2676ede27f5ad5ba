//! API request handlers.

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};

use crate::{
    error::OcrError,
    extract::extract_text,
    pipeline::{classify::ExtractionOutcome, upload::Upload},
};

use super::types::{ApiState, HealthResponse, DOWNLOAD_FILENAME};

/// OCR endpoint handler.
///
/// POST /api/ocr
///
/// Accepts multipart form data with a `file` field (png, jpg, jpeg or pdf)
/// and returns `{"text": ...}`, or a warning payload when the provider found
/// nothing readable.
///
/// # Errors
///
/// - 400 when the `file` part is missing, has an empty filename, has an
///   unsupported extension, or exceeds the upload ceiling
/// - 500 when encoding fails or the provider call fails
pub async fn ocr_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionOutcome>, OcrError> {
    let upload = read_file_part(&mut multipart).await?;
    let provider = state.provider.as_ref();
    let outcome = extract_text(&upload, provider, &state.config).await?;
    Ok(Json(outcome))
}

/// Read the first multipart file part named `file`.
///
/// A `file` field sent without a filename is a plain form value, not an
/// upload, and is skipped. Browsers submit an empty filename when no file
/// was chosen.
async fn read_file_part(multipart: &mut Multipart) -> Result<Upload, OcrError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidForm(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(OcrError::NoSelectedFile);
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| OcrError::InvalidForm(e.to_string()))?;
        return Ok(Upload::new(filename, bytes.to_vec()));
    }
    Err(OcrError::NoFilePart)
}

/// Download endpoint handler.
///
/// POST /api/download
///
/// Echoes the `text` form field (urlencoded or multipart) back as a
/// plain-text attachment. Always answers 200: a missing field, a repeated
/// field's later values, or an unreadable body all fall back to the first
/// value or an empty file.
pub async fn download_handler(request: Request) -> Response {
    let text = match FormKind::of(request.headers()) {
        FormKind::Multipart => match Multipart::from_request(request, &()).await {
            Ok(mut multipart) => read_text_field(&mut multipart).await,
            Err(e) => {
                tracing::debug!("Unreadable multipart body on download: {}", e.body_text());
                String::new()
            }
        },
        FormKind::UrlEncoded => {
            match Form::<Vec<(String, String)>>::from_request(request, &()).await {
                Ok(Form(pairs)) => first_text_value(pairs),
                Err(e) => {
                    tracing::debug!("Unreadable form body on download: {}", e.body_text());
                    String::new()
                }
            }
        }
        FormKind::Other => String::new(),
    };

    let disposition = format!("attachment; filename={DOWNLOAD_FILENAME}");
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
        (header::CONTENT_DISPOSITION, disposition.as_str()),
    ];
    (headers, text).into_response()
}

/// First non-file multipart field named `text`, or `""`.
async fn read_text_field(multipart: &mut Multipart) -> String {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return String::new(),
            Err(e) => {
                tracing::debug!("Stopped reading download form: {}", e);
                return String::new();
            }
        };
        if field.name() == Some("text") && field.file_name().is_none() {
            return field.text().await.unwrap_or_default();
        }
    }
}

fn first_text_value(pairs: Vec<(String, String)>) -> String {
    pairs
        .into_iter()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value)
        .unwrap_or_default()
}

enum FormKind {
    Multipart,
    UrlEncoded,
    Other,
}

impl FormKind {
    fn of(headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if content_type.starts_with("multipart/form-data") {
            FormKind::Multipart
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            FormKind::UrlEncoded
        } else {
            FormKind::Other
        }
    }
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
