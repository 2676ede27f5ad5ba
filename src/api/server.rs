//! API server setup and configuration.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    pipeline::ocr::{MistralOcr, OcrProvider},
};

use super::{
    handlers::{download_handler, health_handler, ocr_handler},
    types::ApiState,
};

/// Create the API router with all routes configured.
///
/// The provider is injected so callers (and tests) can substitute their own
/// backend for Mistral OCR.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ocr_text_server::{ServerConfig, MistralOcr, api::create_router};
///
/// let config = ServerConfig::default();
/// let provider = Arc::new(MistralOcr::from_config(&config));
/// let router = create_router(config, provider);
/// ```
pub fn create_router(config: ServerConfig, provider: Arc<dyn OcrProvider>) -> Router {
    let body_limit = config.max_request_bytes;
    let state = ApiState {
        config: Arc::new(config),
        provider,
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ocr", post(ocr_handler))
        .route("/api/download", post(download_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server with the Mistral OCR provider and run until Ctrl-C or
/// SIGTERM.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let provider: Arc<dyn OcrProvider> = Arc::new(MistralOcr::from_config(&config));
    serve_with_provider(config, provider).await
}

/// Start the server with a caller-supplied provider.
pub async fn serve_with_provider(
    config: ServerConfig,
    provider: Arc<dyn OcrProvider>,
) -> std::io::Result<()> {
    let addr = config.socket_addr();
    tracing::info!(
        "Upload ceiling: {}",
        config
            .max_upload_bytes
            .map(|n| format!("{n} bytes"))
            .unwrap_or_else(|| "disabled".to_string())
    );
    let app = create_router(config, provider);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("OCR server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
