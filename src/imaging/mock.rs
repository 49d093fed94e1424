//! Mock image backend for offline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;

use super::{ImageBackend, ImageRequest};
use crate::error::Result;
use crate::PipelineError;

/// Returns canned image bytes (or failures) in order, cycling when exhausted.
#[derive(Debug)]
pub struct MockImageBackend {
    replies: Vec<std::result::Result<Vec<u8>, String>>,
    index: AtomicUsize,
    requests: Mutex<Vec<ImageRequest>>,
}

impl MockImageBackend {
    pub fn new(replies: Vec<std::result::Result<Vec<u8>, String>>) -> Self {
        assert!(!replies.is_empty(), "MockImageBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always return `bytes`.
    pub fn fixed(bytes: Vec<u8>) -> Self {
        Self::new(vec![Ok(bytes)])
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(message.into())])
    }

    pub fn call_count(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageBackend for MockImageBackend {
    async fn generate(
        &self,
        _client: &Client,
        _base_url: &str,
        request: &ImageRequest,
    ) -> Result<Vec<u8>> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone().map_err(PipelineError::Other)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
