//! OCR delegation: send an encoded document to the recognition provider.
//!
//! This is the only stage with network I/O. The call is made once per
//! request with no retry and no timeout of its own; any failure surfaces
//! to the caller as a processing error.
//!
//! The [`OcrProvider`] trait is the seam between the pipeline and the
//! network. [`MistralOcr`] is the production implementation; tests plug in
//! an in-process provider instead.

use crate::config::ServerConfig;
use crate::error::OcrError;
use crate::pipeline::upload::FileKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A typed document reference, serialised in the provider's wire shape.
///
/// ```text
/// {"type": "image_url",    "image_url":    "data:image/png;base64,..."}
/// {"type": "document_url", "document_url": "data:application/pdf;base64,..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentRef {
    ImageUrl { image_url: String },
    DocumentUrl { document_url: String },
}

impl DocumentRef {
    /// Pick the request shape for `kind`: images go as `image_url`,
    /// everything else as `document_url`.
    pub fn for_kind(kind: FileKind, data_uri: String) -> Self {
        if kind.is_image() {
            DocumentRef::ImageUrl {
                image_url: data_uri,
            }
        } else {
            DocumentRef::DocumentUrl {
                document_url: data_uri,
            }
        }
    }

    /// The wire `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DocumentRef::ImageUrl { .. } => "image_url",
            DocumentRef::DocumentUrl { .. } => "document_url",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            DocumentRef::ImageUrl { image_url } => image_url,
            DocumentRef::DocumentUrl { document_url } => document_url,
        }
    }
}

/// One page of an OCR response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub markdown: Option<String>,
}

impl OcrPage {
    pub fn new(index: usize, markdown: impl Into<String>) -> Self {
        Self {
            index,
            markdown: Some(markdown.into()),
        }
    }
}

/// The provider's response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_info: Option<serde_json::Value>,
}

impl OcrResponse {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, md)| OcrPage::new(i, md))
                .collect(),
            ..Default::default()
        }
    }
}

/// A recognition backend.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Run recognition on one document.
    async fn process(&self, document: &DocumentRef) -> Result<OcrResponse, OcrError>;
}

#[derive(Serialize)]
struct OcrRequest<'a> {
    model: &'a str,
    document: &'a DocumentRef,
}

/// Mistral OCR (`POST /v1/ocr`).
#[derive(Clone)]
pub struct MistralOcr {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl MistralOcr {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        if config.api_key.is_none() {
            warn!("MISTRAL_API_KEY is not set; OCR requests will fail");
        }
        Self::new(
            config.api_key.clone(),
            config.api_base_url.clone(),
            config.model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/ocr", self.base_url)
    }
}

#[async_trait]
impl OcrProvider for MistralOcr {
    fn name(&self) -> &str {
        "mistral"
    }

    async fn process(&self, document: &DocumentRef) -> Result<OcrResponse, OcrError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| OcrError::ProviderNotConfigured {
                provider: self.name().to_string(),
                hint: "Set MISTRAL_API_KEY in the environment or .env file.".to_string(),
            })?;

        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&OcrRequest {
                model: &self.model,
                document,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("OCR API returned {}: {}", status, message);
            return Err(OcrError::ProviderApi {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OcrResponse = response.json().await?;
        info!(
            "OCR complete: {} pages in {}ms",
            parsed.pages.len(),
            start.elapsed().as_millis()
        );
        debug!("OCR model: {:?}", parsed.model);
        Ok(parsed)
    }
}
