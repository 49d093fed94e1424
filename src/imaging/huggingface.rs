//! Backend for the Hugging Face inference API.
//!
//! `POST {base}/models/{model_id}` with `{"inputs": prompt}` and a bearer
//! token. A successful call returns the encoded image as the body; errors may
//! arrive as a JSON envelope `{"error": "..."}` even with a 2xx status.

use super::{ImageBackend, ImageRequest};
use crate::backend::redact;
use crate::config::IMAGE_API_TOKEN_VAR;
use crate::error::Result;
use crate::PipelineError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};

/// Default public endpoint.
pub const HF_BASE_URL: &str = "https://api-inference.huggingface.co";
/// Default text-to-image model.
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-dev";

/// Image backend for Hugging Face hosted inference.
#[derive(Clone, Default)]
pub struct HuggingFaceBackend {
    pub(crate) api_token: Option<String>,
}

impl std::fmt::Debug for HuggingFaceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceBackend")
            .field("api_token", &self.api_token.as_deref().map(redact))
            .finish()
    }
}

impl HuggingFaceBackend {
    pub fn new() -> Self {
        Self { api_token: None }
    }

    /// Set the bearer token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    fn endpoint(base_url: &str, model: &str) -> String {
        format!("{}/models/{}", base_url.trim_end_matches('/'), model)
    }

    /// Pull the message out of a JSON error envelope, if the body is one.
    fn error_message(body: &[u8]) -> Option<String> {
        let value: Value = serde_json::from_slice(body).ok()?;
        match value.get("error")? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[async_trait]
impl ImageBackend for HuggingFaceBackend {
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &ImageRequest,
    ) -> Result<Vec<u8>> {
        let token = self.api_token.as_deref().ok_or(PipelineError::Config {
            var: IMAGE_API_TOKEN_VAR,
        })?;
        let url = Self::endpoint(base_url, &request.model);

        let resp = client
            .post(&url)
            .bearer_auth(token)
            .timeout(request.timeout)
            .json(&json!({"inputs": request.prompt}))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::HttpError { status, body: text });
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let bytes = resp.bytes().await?;

        if is_json {
            if let Some(message) = Self::error_message(&bytes) {
                return Err(PipelineError::HttpError {
                    status,
                    body: message,
                });
            }
        }

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
