//! Document encoding: raw upload bytes → base64 data URI.
//!
//! The OCR API accepts documents inline as data URIs, so no upload or
//! hosting step is needed. The MIME marker is chosen from the extension.

use crate::pipeline::upload::FileKind;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Encode `bytes` as a data URI for the given lower-case extension.
///
/// Returns `None` for extensions without a MIME marker. Validation rejects
/// those before this point, so the handler treats `None` as a server error.
pub fn encode_document(bytes: &[u8], extension: &str) -> Option<String> {
    let kind = FileKind::from_extension(extension)?;
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} → {} bytes base64", extension, b64.len());
    Some(format!("data:{};base64,{}", kind.mime_type(), b64))
}
