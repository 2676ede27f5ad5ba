//! HTTP rendering of [`OcrError`].

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::error::OcrError;

use super::types::ErrorResponse;

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_client_error() {
            tracing::debug!("Rejected request: {}", self);
        } else {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
