//! Mock backend for testing without a live LLM.
//!
//! [`MockBackend`] returns pre-configured replies in order and records every
//! prompt it receives, so pipeline tests can assert on call counts and on the
//! exact text sent to the model.
//!
//! # Example
//!
//! ```
//! use story_pipeline::backend::MockBackend;
//!
//! let mock = MockBackend::new(vec![Ok("Hello, world!".to_string())]);
//! assert_eq!(mock.call_count(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, LlmRequest, LlmResponse};
use crate::error::Result;
use crate::PipelineError;

/// A test backend that returns canned replies in order.
///
/// `Err` entries are returned as [`PipelineError::Other`]. Cycles back to the
/// beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<std::result::Result<String, String>>,
    index: AtomicUsize,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockBackend {
    /// Create a mock backend with the given canned replies.
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![Ok(response.into())])
    }

    /// Create a mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(message.into())])
    }

    /// Number of completed calls.
    pub fn call_count(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> std::result::Result<String, String> {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(
        &self,
        _client: &Client,
        _base_url: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        match self.next_reply() {
            Ok(text) => Ok(LlmResponse {
                text,
                status: 200,
                metadata: None,
            }),
            Err(message) => Err(PipelineError::Other(message)),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmConfig;

    fn request() -> LlmRequest {
        LlmRequest {
            model: "test".to_string(),
            prompt: "test".to_string(),
            config: LlmConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_mock_fixed_response() {
        let mock = MockBackend::fixed("Hello!");
        let resp = mock.complete(&Client::new(), "http://unused", &request()).await.unwrap();
        assert_eq!(resp.text, "Hello!");
        assert_eq!(resp.status, 200);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_cycles_and_fails() {
        let mock = MockBackend::new(vec![Ok("first".into()), Err("rate limited".into())]);
        let client = Client::new();
        let r1 = mock.complete(&client, "http://unused", &request()).await;
        let r2 = mock.complete(&client, "http://unused", &request()).await;
        let r3 = mock.complete(&client, "http://unused", &request()).await;
        assert_eq!(r1.unwrap().text, "first");
        assert!(matches!(r2, Err(PipelineError::Other(ref m)) if m == "rate limited"));
        assert_eq!(r3.unwrap().text, "first"); // cycles
        assert_eq!(mock.requests().len(), 3);
    }
}
