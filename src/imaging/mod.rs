//! Image acquisition and persistence.
//!
//! Both halves are best-effort. [`fetch_image`] turns every backend failure
//! into `None`, and [`save_image`] turns every decode or filesystem failure
//! into [`ImageOutcome::Missing`]. Neither ever produces a
//! [`PipelineError`](crate::PipelineError), so a bad image can't take down
//! the story or its sibling images.
//!
//! ```text
//! refined prompt ──► ImageBackend::generate() ──► Option<Vec<u8>> ──► save_image() ──► ImageOutcome
//!                              │
//!                  HuggingFaceBackend (POST /models/{model_id})
//! ```

pub mod huggingface;
pub mod mock;
pub mod store;

pub use huggingface::HuggingFaceBackend;
pub use mock::MockImageBackend;
pub use store::{discard_image, save_image, ImageOutcome};

use crate::error::Result;
use crate::exec_ctx::ExecCtx;
use crate::PipelineError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A normalized image-generation request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Model identifier (e.g. `"black-forest-labs/FLUX.1-dev"`).
    pub model: String,
    /// The refined image prompt.
    pub prompt: String,
    /// Upper bound for the whole request.
    pub timeout: Duration,
}

/// Abstraction over image-generation providers.
///
/// Implementations return raw encoded image bytes or an error; the
/// best-effort policy lives in [`fetch_image`], not in the backends.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Render one image.
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &ImageRequest,
    ) -> Result<Vec<u8>>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Fetch one image, absorbing every failure into `None`.
///
/// Failures (missing credential, non-2xx, timeout, transport error, JSON
/// error envelope) are logged with the model id and never propagated.
pub async fn fetch_image(ctx: &ExecCtx, prompt: &str, model_id: &str) -> Option<Vec<u8>> {
    let request = ImageRequest {
        model: model_id.to_string(),
        prompt: prompt.to_string(),
        timeout: ctx.image_timeout,
    };

    tracing::info!(
        model_id,
        backend = ctx.image_backend.name(),
        "sending prompt to image model"
    );

    match ctx
        .image_backend
        .generate(&ctx.client, &ctx.image_base_url, &request)
        .await
    {
        Ok(bytes) => Some(bytes),
        Err(PipelineError::Request(e)) if e.is_timeout() => {
            tracing::error!(model_id, error = %e, "image request timed out");
            None
        }
        Err(e) => {
            tracing::error!(model_id, error = %e, "image request failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ctx_with(backend: MockImageBackend) -> (ExecCtx, Arc<MockImageBackend>) {
        let backend = Arc::new(backend);
        let ctx = ExecCtx::builder()
            .image_backend(backend.clone())
            .build()
            .unwrap();
        (ctx, backend)
    }

    #[tokio::test]
    async fn test_fetch_returns_bytes() {
        let (ctx, backend) = ctx_with(MockImageBackend::fixed(vec![1, 2, 3]));
        let bytes = fetch_image(&ctx, "fox, lantern", "test/model").await;
        assert_eq!(bytes, Some(vec![1, 2, 3]));
        let seen = backend.requests();
        assert_eq!(seen[0].prompt, "fox, lantern");
        assert_eq!(seen[0].model, "test/model");
        assert_eq!(seen[0].timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_fetch_absorbs_errors() {
        let (ctx, _) = ctx_with(MockImageBackend::failing("HTTP 503: loading"));
        assert_eq!(fetch_image(&ctx, "fox", "test/model").await, None);
    }
}
