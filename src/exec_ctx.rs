//! Execution context shared by every call in a pipeline run.
//!
//! [`ExecCtx`] carries the HTTP client, both backends with their endpoints,
//! the image timeout and an optional event handler. Build it once at startup
//! and share it across requests.

use crate::backend::gemini::GEMINI_BASE_URL;
use crate::backend::{Backend, GeminiBackend};
use crate::config::{Config, DEFAULT_IMAGE_TIMEOUT_SECS};
use crate::error::Result;
use crate::events::EventHandler;
use crate::imaging::huggingface::HF_BASE_URL;
use crate::imaging::{HuggingFaceBackend, ImageBackend};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Shared execution context for pipeline runs.
///
/// # Example
///
/// ```
/// use story_pipeline::ExecCtx;
/// use story_pipeline::backend::MockBackend;
/// use std::sync::Arc;
///
/// let ctx = ExecCtx::builder()
///     .text_backend(Arc::new(MockBackend::fixed("ok")))
///     .build()
///     .unwrap();
/// assert_eq!(ctx.text_backend.name(), "mock");
/// ```
pub struct ExecCtx {
    /// HTTP client (cheap to clone -- uses `Arc` internally).
    pub client: Client,
    /// Text-generation backend. Default: [`GeminiBackend`].
    pub text_backend: Arc<dyn Backend>,
    /// Base URL for the text provider.
    pub text_base_url: String,
    /// Image-generation backend. Default: [`HuggingFaceBackend`].
    pub image_backend: Arc<dyn ImageBackend>,
    /// Base URL for the image provider.
    pub image_base_url: String,
    /// Upper bound for a single image request. Default: 60 seconds.
    pub image_timeout: Duration,
    /// Optional event handler for lifecycle events.
    pub event_handler: Option<Arc<dyn EventHandler>>,
}

impl ExecCtx {
    /// Create a new builder.
    pub fn builder() -> ExecCtxBuilder {
        ExecCtxBuilder::default()
    }

    /// Wire the production backends from `config`.
    ///
    /// Missing credentials are not an error here; runs check them up front
    /// via [`Config::require_credentials`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut text = GeminiBackend::new();
        if let Some(ref key) = config.google_api_key {
            text = text.with_api_key(key.clone());
        }
        let mut image = HuggingFaceBackend::new();
        if let Some(ref token) = config.hf_api_token {
            image = image.with_api_token(token.clone());
        }

        Self::builder()
            .text_backend(Arc::new(text))
            .text_base_url(config.text_base_url.clone())
            .image_backend(Arc::new(image))
            .image_base_url(config.image_base_url.clone())
            .image_timeout(config.image_timeout)
            .build()
    }
}

impl std::fmt::Debug for ExecCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecCtx")
            .field("text_backend", &self.text_backend.name())
            .field("text_base_url", &self.text_base_url)
            .field("image_backend", &self.image_backend.name())
            .field("image_base_url", &self.image_base_url)
            .field("image_timeout", &self.image_timeout)
            .field("has_event_handler", &self.event_handler.is_some())
            .finish()
    }
}

/// Builder for [`ExecCtx`].
#[derive(Default)]
pub struct ExecCtxBuilder {
    client: Option<Client>,
    text_backend: Option<Arc<dyn Backend>>,
    text_base_url: Option<String>,
    image_backend: Option<Arc<dyn ImageBackend>>,
    image_base_url: Option<String>,
    image_timeout: Option<Duration>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl ExecCtxBuilder {
    /// Set the HTTP client. If not set, a default client is created.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the text backend. Default: [`GeminiBackend`] without a key.
    pub fn text_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.text_backend = Some(backend);
        self
    }

    pub fn text_base_url(mut self, url: impl Into<String>) -> Self {
        self.text_base_url = Some(url.into());
        self
    }

    /// Set the image backend. Default: [`HuggingFaceBackend`] without a token.
    pub fn image_backend(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.image_backend = Some(backend);
        self
    }

    pub fn image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = Some(url.into());
        self
    }

    /// Set the per-image timeout. Default: 60 seconds.
    pub fn image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = Some(timeout);
        self
    }

    /// Set the event handler.
    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the execution context.
    ///
    /// The default client sets no overall timeout: text calls rely on the
    /// provider, image calls carry their own per-request bound.
    pub fn build(self) -> Result<ExecCtx> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };
        Ok(ExecCtx {
            client,
            text_backend: self
                .text_backend
                .unwrap_or_else(|| Arc::new(GeminiBackend::new())),
            text_base_url: normalize_base_url(
                self.text_base_url.as_deref().unwrap_or(GEMINI_BASE_URL),
            ),
            image_backend: self
                .image_backend
                .unwrap_or_else(|| Arc::new(HuggingFaceBackend::new())),
            image_base_url: normalize_base_url(
                self.image_base_url.as_deref().unwrap_or(HF_BASE_URL),
            ),
            image_timeout: self
                .image_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS)),
            event_handler: self.event_handler,
        })
    }
}

/// Strip trailing slashes and provider path suffixes from a base URL.
/// Backends append their own paths, so this prevents double-pathing.
/// e.g. "https://generativelanguage.googleapis.com/v1beta/" -> "https://generativelanguage.googleapis.com"
/// e.g. "https://api-inference.huggingface.co/models" -> "https://api-inference.huggingface.co"
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    for suffix in ["/v1beta", "/v1", "/models"] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}
