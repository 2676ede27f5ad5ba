//! HTTP API for OCR text extraction.
//!
//! # Endpoints
//!
//! - `POST /api/ocr` - Extract cleaned text from an uploaded image or PDF
//!   (multipart field `file`)
//! - `POST /api/download` - Echo the `text` form field back as
//!   `extracted_text.txt`
//! - `GET /health` - Health check endpoint
//!
//! # cURL Examples
//!
//! ```bash
//! # Extract text from a scan
//! curl -F "file=@invoice.pdf" http://localhost:5000/api/ocr
//!
//! # Save text as a file
//! curl -d "text=Hello" -OJ http://localhost:5000/api/download
//!
//! # Health check
//! curl http://localhost:5000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use handlers::{download_handler, health_handler, ocr_handler};
pub use server::{create_router, serve, serve_with_provider};
pub use types::{ApiState, ErrorResponse, HealthResponse, DOWNLOAD_FILENAME};
