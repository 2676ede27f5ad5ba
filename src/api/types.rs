//! API request/response types and shared router state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{config::ServerConfig, pipeline::ocr::OcrProvider};

/// Filename of the `POST /api/download` attachment.
pub const DOWNLOAD_FILENAME: &str = "extracted_text.txt";

/// State shared by every handler. Holds no per-request data.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<ServerConfig>,
    pub provider: Arc<dyn OcrProvider>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
