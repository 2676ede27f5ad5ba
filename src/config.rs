//! Server configuration.
//!
//! All service behaviour is controlled through [`ServerConfig`], built via
//! its [`ServerConfigBuilder`]. The binary fills the builder from CLI flags
//! and environment variables; library users and tests set only the fields
//! they care about.

use crate::error::OcrError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default upload ceiling: 4 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Default multipart body ceiling: 32 MiB.
///
/// Must stay above the upload ceiling so oversized uploads reach the size
/// guard and get a descriptive 400 instead of a bare body-limit rejection.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

pub const DEFAULT_API_BASE_URL: &str = "https://api.mistral.ai";
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Configuration for the OCR server.
///
/// # Example
/// ```rust
/// use ocr_text_server::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .port(8080)
///     .max_upload_bytes(Some(8 * 1024 * 1024))
///     .build()
///     .unwrap();
/// assert_eq!(config.socket_addr().port(), 8080);
/// ```
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind. Default: `0.0.0.0`.
    pub host: IpAddr,

    /// Port to bind. Default: 5000.
    pub port: u16,

    /// Upload size ceiling in bytes. Default: 4 MiB. `None` disables the guard.
    pub max_upload_bytes: Option<usize>,

    /// Ceiling for the whole multipart request body. Default: 32 MiB.
    pub max_request_bytes: usize,

    /// Mistral API key. Read from `MISTRAL_API_KEY` by the binary.
    pub api_key: Option<String>,

    /// Base URL of the OCR API. Default: `https://api.mistral.ai`.
    pub api_base_url: String,

    /// OCR model identifier. Default: `mistral-ocr-latest`.
    pub model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("max_request_bytes", &self.max_request_bytes)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ServerConfig {
    /// Create a new builder for `ServerConfig`.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self::default(),
        }
    }

    /// The address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: IpAddr) -> Self {
        self.config.host = host;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the upload ceiling. `None` or `Some(0)` disables the size guard.
    pub fn max_upload_bytes(mut self, limit: Option<usize>) -> Self {
        self.config.max_upload_bytes = limit.filter(|&n| n > 0);
        self
    }

    pub fn max_request_bytes(mut self, n: usize) -> Self {
        self.config.max_request_bytes = n;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.config.api_key = if key.trim().is_empty() {
            None
        } else {
            Some(key)
        };
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServerConfig, OcrError> {
        let c = &self.config;
        if c.port == 0 {
            return Err(OcrError::InvalidConfig("Port must be non-zero".into()));
        }
        if c.model.trim().is_empty() {
            return Err(OcrError::InvalidConfig("Model must not be empty".into()));
        }
        if let Some(limit) = c.max_upload_bytes {
            if c.max_request_bytes <= limit {
                return Err(OcrError::InvalidConfig(format!(
                    "Request body ceiling ({} bytes) must exceed the upload ceiling ({} bytes)",
                    c.max_request_bytes, limit
                )));
            }
        }
        Ok(self.config)
    }
}
