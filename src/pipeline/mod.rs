//! Pipeline stages for upload-to-text extraction.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable without HTTP or network access.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ encode ──▶ ocr ──▶ postprocess ──▶ classify
//! (checks)   (base64)   (API)   (cleanup)       (JSON body)
//! ```
//!
//! 1. [`upload`]: filename and size checks; nothing is encoded or sent
//!    for a rejected upload
//! 2. [`encode`]: wrap the bytes in a base64 data URI
//! 3. [`ocr`]: the provider call; the only stage with network I/O
//! 4. [`postprocess`]: regex rules that strip markdown down to plain text
//! 5. [`classify`]: pick the response payload (text, warning, or empty)

pub mod classify;
pub mod encode;
pub mod ocr;
pub mod postprocess;
pub mod upload;
