//! Backend for the Google Gemini `generateContent` API.
//!
//! Endpoint: `{base}/v1beta/models/{model}:generateContent`.
//! JSON mode maps to `generationConfig.responseMimeType = "application/json"`.

use super::{redact, Backend, LlmRequest, LlmResponse};
use crate::error::Result;
use crate::PipelineError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Default public endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Backend for Google's Gemini models.
///
/// # Example
///
/// ```
/// use story_pipeline::backend::GeminiBackend;
///
/// let backend = GeminiBackend::new().with_api_key("AIza...");
/// assert!(backend.has_api_key());
/// ```
#[derive(Clone, Default)]
pub struct GeminiBackend {
    /// Sent as `x-goog-api-key`.
    pub(crate) api_key: Option<String>,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &self.api_key.as_deref().map(redact))
            .finish()
    }
}

impl GeminiBackend {
    pub fn new() -> Self {
        Self { api_key: None }
    }

    /// Set the API key for authentication.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns `true` if an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(base_url: &str, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        )
    }

    /// Build the request body for `generateContent`.
    fn build_body(request: &LlmRequest) -> Value {
        let mut generation_config = json!({
            "temperature": request.config.temperature,
            "maxOutputTokens": request.config.max_tokens,
        });
        if request.config.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }

        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(json_resp: &Value) -> Option<String> {
        let parts = json_resp
            .pointer("/candidates/0/content/parts")?
            .as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();
        Some(text)
    }

    fn extract_metadata(json_resp: &Value) -> Option<Value> {
        let mut meta = serde_json::Map::new();
        if let Some(v) = json_resp.get("usageMetadata") {
            meta.insert("usage".into(), v.clone());
        }
        if let Some(v) = json_resp.get("modelVersion") {
            meta.insert("model".into(), v.clone());
        }
        if let Some(v) = json_resp.pointer("/candidates/0/finishReason") {
            meta.insert("finish_reason".into(), v.clone());
        }
        if meta.is_empty() {
            None
        } else {
            Some(Value::Object(meta))
        }
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn complete(
        &self,
        client: &Client,
        base_url: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse> {
        let url = Self::endpoint(base_url, &request.model);
        let body = Self::build_body(request);

        let mut req = client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.header("x-goog-api-key", key.as_str());
        }

        tracing::debug!(model = %request.model, "sending Gemini request");

        let resp = req.send().await.map_err(|e| {
            PipelineError::Other(format!("Failed to connect to LLM at {}: {}", url, e))
        })?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::HttpError { status, body: text });
        }

        let json_resp: Value = resp.json().await?;

        let text = match Self::extract_text(&json_resp) {
            Some(text) => text,
            None => {
                let reason = json_resp
                    .pointer("/promptFeedback/blockReason")
                    .and_then(|v| v.as_str())
                    .unwrap_or("no candidates returned");
                return Err(PipelineError::Other(format!(
                    "Gemini returned no content: {}",
                    reason
                )));
            }
        };

        Ok(LlmResponse {
            text,
            status,
            metadata: Self::extract_metadata(&json_resp),
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_request() -> LlmRequest {
        LlmRequest {
            model: "gemini-1.5-flash".into(),
            prompt: "Tell me a story".into(),
            config: LlmConfig::default(),
        }
    }

    #[test]
    fn test_gemini_body() {
        let body = GeminiBackend::build_body(&test_request());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Tell me a story");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_gemini_json_mode() {
        let mut request = test_request();
        request.config = LlmConfig::deterministic().with_json_mode(true);

        let body = GeminiBackend::build_body(&request);
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            GeminiBackend::endpoint("https://example.test/", "gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let resp = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Once "}, {"text": "upon a time"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 12}
        });
        assert_eq!(
            GeminiBackend::extract_text(&resp).as_deref(),
            Some("Once upon a time")
        );
        let meta = GeminiBackend::extract_metadata(&resp).unwrap();
        assert_eq!(meta["finish_reason"], "STOP");
        assert_eq!(meta["usage"]["totalTokenCount"], 12);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let backend = GeminiBackend::new().with_api_key("AIzaSy1234567890");
        let debug_output = format!("{:?}", backend);
        assert!(!debug_output.contains("1234567890"));
        assert!(debug_output.contains("AIzaSy***"));
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "fox, lantern"}]}}]
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new().with_api_key("test-key");
        let resp = backend
            .complete(&Client::new(), &server.uri(), &test_request())
            .await
            .unwrap();
        assert_eq!(resp.text, "fox, lantern");
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn test_complete_maps_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = GeminiBackend::new()
            .complete(&Client::new(), &server.uri(), &test_request())
            .await
            .unwrap_err();
        match err {
            PipelineError::HttpError { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_blocked_prompt_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = GeminiBackend::new()
            .complete(&Client::new(), &server.uri(), &test_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
