//! Result classification: turn a provider response into the JSON payload
//! returned by `POST /api/ocr`.
//!
//! An unreadable document is not an error. The caller still gets 200 with a
//! placeholder text, a warning, and a dump of the provider response to help
//! diagnose what the provider saw.

use crate::pipeline::ocr::OcrResponse;
use crate::pipeline::postprocess::{clean_text, is_image_reference, join_pages};
use crate::pipeline::upload::FileKind;
use serde::Serialize;
use tracing::{info, warn};

pub const NO_READABLE_TEXT: &str = "No readable text found.";
pub const NO_TEXT_EXTRACTED: &str = "No text extracted";

/// Body of a successful `POST /api/ocr` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    /// Cleaned text was recovered.
    Text { text: String },
    /// Pages came back but held no usable text.
    NoReadableText {
        text: String,
        warning: String,
        debug: String,
    },
    /// The provider returned no pages at all.
    NoPages { text: String, debug: String },
}

impl ExtractionOutcome {
    /// The `text` field, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            ExtractionOutcome::Text { text }
            | ExtractionOutcome::NoReadableText { text, .. }
            | ExtractionOutcome::NoPages { text, .. } => text,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ExtractionOutcome::Text { .. })
    }
}

/// Classify a provider response for an upload of the given kind.
pub fn classify(response: &OcrResponse, kind: FileKind) -> ExtractionOutcome {
    if response.pages.is_empty() {
        warn!("OCR returned no pages for {}", kind.label());
        return ExtractionOutcome::NoPages {
            text: NO_TEXT_EXTRACTED.to_string(),
            debug: format!("{response:?}"),
        };
    }

    let cleaned = clean_text(&join_pages(&response.pages));
    let only_images = response
        .pages
        .iter()
        .all(|p| p.markdown.as_deref().is_some_and(is_image_reference));

    if cleaned.is_empty() || only_images {
        warn!(
            "No readable text in {} ({} pages)",
            kind.label(),
            response.pages.len()
        );
        return ExtractionOutcome::NoReadableText {
            text: NO_READABLE_TEXT.to_string(),
            warning: format!("OCR failed to extract text from the {}", kind.label()),
            debug: format!("{response:?}"),
        };
    }

    info!("Extracted {} chars from {}", cleaned.len(), kind.label());
    ExtractionOutcome::Text { text: cleaned }
}
