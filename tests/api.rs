//! Integration tests for the HTTP API.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` and a
//! scripted OCR provider, so no network access or API key is needed.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use ocr_text_server::{
    api::create_router, DocumentRef, OcrError, OcrProvider, OcrResponse, ServerConfig,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ── Test helpers ─────────────────────────────────────────────────────────────

const BOUNDARY: &str = "X-OCR-BOUNDARY";

/// What the scripted provider answers with.
enum Script {
    Respond(OcrResponse),
    Fail(u16, &'static str),
}

struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
    last_document: Mutex<Option<DocumentRef>>,
}

impl ScriptedProvider {
    fn pages(pages: &[&str]) -> Arc<Self> {
        let response = OcrResponse::from_pages(pages.iter().copied());
        Self::with(Script::Respond(response))
    }

    fn with(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            last_document: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn process(&self, document: &DocumentRef) -> Result<OcrResponse, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_document.lock().unwrap() = Some(document.clone());
        match &self.script {
            Script::Respond(response) => Ok(response.clone()),
            Script::Fail(status, message) => Err(OcrError::ProviderApi {
                status: *status,
                message: message.to_string(),
            }),
        }
    }
}

fn router(provider: Arc<ScriptedProvider>) -> Router {
    create_router(ServerConfig::default(), provider)
}

/// One multipart part: field name, optional filename, content.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("Failed to build request")
}

fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    multipart_request(
        "/api/ocr",
        multipart_body(&[("file", Some(filename), content)]),
    )
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1_000_000)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Response JSON parse failed")
}

// ── POST /api/ocr ────────────────────────────────────────────────────────────

#[tokio::test]
async fn ocr_returns_cleaned_text() {
    let provider = ScriptedProvider::pages(&["# Hello", "**World**"]);
    let response = router(provider.clone())
        .oneshot(upload_request("scan.png", b"\x89PNG"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"text": "Hello World"})
    );
    assert_eq!(provider.calls(), 1);

    let doc = provider.last_document.lock().unwrap().clone().unwrap();
    assert_eq!(
        doc,
        DocumentRef::ImageUrl {
            image_url: "data:image/png;base64,iVBORw==".to_string()
        }
    );
}

#[tokio::test]
async fn ocr_sends_pdf_as_document() {
    let provider = ScriptedProvider::pages(&["Quarterly report"]);
    let response = router(provider.clone())
        .oneshot(upload_request("Report.PDF", b"%PDF-1.7"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = provider.last_document.lock().unwrap().clone().unwrap();
    assert_eq!(doc.kind_name(), "document_url");
    assert!(
        doc.url().starts_with("data:application/pdf;base64,"),
        "got {doc:?}"
    );
}

#[tokio::test]
async fn ocr_without_file_part_is_400() {
    let provider = ScriptedProvider::pages(&["unused"]);
    let body = multipart_body(&[("other", None, b"value")]);
    let response = router(provider.clone())
        .oneshot(multipart_request("/api/ocr", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file part");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn ocr_file_field_without_filename_is_no_file_part() {
    let provider = ScriptedProvider::pages(&["unused"]);
    let body = multipart_body(&[("file", None, b"not an upload")]);
    let response = router(provider.clone())
        .oneshot(multipart_request("/api/ocr", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file part");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn ocr_with_empty_filename_is_400() {
    let provider = ScriptedProvider::pages(&["unused"]);
    let response = router(provider.clone())
        .oneshot(upload_request("", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No selected file");
}

#[tokio::test]
async fn ocr_with_unsupported_extension_is_400() {
    let provider = ScriptedProvider::pages(&["unused"]);
    for name in ["notes.txt", "README", "animation.gif"] {
        let response = router(provider.clone())
            .oneshot(upload_request(name, b"data"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");
        let body = json_body(response).await;
        assert_eq!(body["error"], "Unsupported file format");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn ocr_oversized_upload_is_400_before_provider_call() {
    let provider = ScriptedProvider::pages(&["unused"]);
    let content = vec![b'a'; 4 * 1024 * 1024 + 1];
    let response = router(provider.clone())
        .oneshot(upload_request("huge.pdf", &content))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("4194305"), "got: {error}");
    assert!(error.contains("4194304"), "got: {error}");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn ocr_upload_at_limit_is_accepted() {
    let provider = ScriptedProvider::pages(&["fits"]);
    let content = vec![b'a'; 4 * 1024 * 1024];
    let response = router(provider.clone())
        .oneshot(upload_request("exact.pdf", &content))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn ocr_image_only_pages_warn() {
    let provider = ScriptedProvider::pages(&["![img-0.jpeg](img-0.jpeg)"]);
    let response = router(provider)
        .oneshot(upload_request("photo.jpg", b"jpeg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["text"], "No readable text found.");
    assert_eq!(body["warning"], "OCR failed to extract text from the image");
    assert!(body["debug"].is_string());
}

#[tokio::test]
async fn ocr_zero_pages_is_no_text_extracted() {
    let provider = ScriptedProvider::with(Script::Respond(OcrResponse::default()));
    let response = router(provider)
        .oneshot(upload_request("blank.pdf", b"%PDF"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["text"], "No text extracted");
    assert!(body["debug"].is_string());
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn ocr_provider_failure_is_500() {
    let provider = ScriptedProvider::with(Script::Fail(401, "Unauthorized"));
    let response = router(provider)
        .oneshot(upload_request("scan.jpeg", b"jpeg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Error processing file:"), "got: {error}");
    assert!(error.contains("Unauthorized"), "got: {error}");
}

#[tokio::test]
async fn ocr_disabled_size_guard_accepts_large_upload() {
    let provider = ScriptedProvider::pages(&["big"]);
    let config = ServerConfig::builder()
        .max_upload_bytes(None)
        .build()
        .unwrap();
    let content = vec![b'a'; 5 * 1024 * 1024];
    let response = create_router(config, provider.clone())
        .oneshot(upload_request("big.png", &content))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 1);
}

// ── POST /api/download ───────────────────────────────────────────────────────

#[tokio::test]
async fn download_echoes_urlencoded_text() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/download")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("text=Hello"))
        .unwrap();
    let response = router(ScriptedProvider::pages(&[]))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=extracted_text.txt"
    );
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"Hello");
}

#[tokio::test]
async fn download_echoes_multipart_text_verbatim() {
    let text = "Line one\n  **not cleaned**";
    let body = multipart_body(&[("text", None, text.as_bytes())]);
    let response = router(ScriptedProvider::pages(&[]))
        .oneshot(multipart_request("/api/download", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), text);
}

#[tokio::test]
async fn download_without_text_is_empty_file() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/download")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap();
    let response = router(ScriptedProvider::pages(&[]))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn download_repeated_text_field_keeps_first_value() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/download")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("text=a&text=b"))
        .unwrap();
    let response = router(ScriptedProvider::pages(&[]))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"a");
}

#[tokio::test]
async fn download_unreadable_multipart_is_empty_file() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/download")
        .header(header::CONTENT_TYPE, "multipart/form-data")
        .body(Body::from("text=Hello"))
        .unwrap();
    let response = router(ScriptedProvider::pages(&[]))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=extracted_text.txt"
    );
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert!(bytes.is_empty());
}

// ── GET /health ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_version() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router(ScriptedProvider::pages(&[]))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
