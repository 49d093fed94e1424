//! Request boundary for the `generate` operation.
//!
//! Two entry points share one pipeline: [`handle_api`] answers with a status
//! code and a JSON body, [`handle_form`] with either a payload to render or a
//! message for an error view. Neither knows anything about a web framework.

use crate::{pipeline::StoryPipeline, types::ResultPayload, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const PROMPT_REQUIRED: &str = "Field \"prompt\" is required.";
const PROMPT_EMPTY: &str = "Please enter a prompt.";
const INTERNAL_ERROR: &str = "Internal server error";

/// Body of a programmatic `generate` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

/// Run the pipeline for a programmatic caller.
///
/// | Outcome                                   | Status |
/// |-------------------------------------------|--------|
/// | success                                   | 200    |
/// | missing or blank prompt                   | 400    |
/// | missing credential, story generation error| 400    |
/// | anything else                             | 500    |
pub async fn handle_api(pipeline: &StoryPipeline, request: GenerateRequest) -> ApiResponse {
    let prompt = request.prompt.as_deref().map(str::trim).unwrap_or_default();
    if prompt.is_empty() {
        return ApiResponse::error(400, PROMPT_REQUIRED);
    }

    match pipeline.run(prompt).await {
        Ok(payload) => match serde_json::to_value(&payload) {
            Ok(body) => ApiResponse { status: 200, body },
            Err(e) => {
                tracing::error!(error = %e, "cannot serialize result payload");
                ApiResponse::error(500, INTERNAL_ERROR)
            }
        },
        Err(e) if e.is_client_facing() => {
            tracing::warn!(error = %e, "generate request rejected");
            ApiResponse::error(400, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "unexpected failure in generate");
            ApiResponse::error(500, INTERNAL_ERROR)
        }
    }
}

/// What a browser form submission leads to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Show the result view.
    Rendered(ResultPayload),
    /// Show the error view with this message.
    Error(String),
}

/// Run the pipeline for a form submission.
///
/// A rendered payload carries a `cache_buster` timestamp so browsers refetch
/// the images, which live at the same paths on every run.
pub async fn handle_form(pipeline: &StoryPipeline, prompt: &str) -> FormOutcome {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return FormOutcome::Error(PROMPT_EMPTY.into());
    }

    match pipeline.run(prompt).await {
        Ok(mut payload) => {
            payload.cache_buster = Some(chrono::Utc::now().timestamp());
            FormOutcome::Rendered(payload)
        }
        Err(e) => {
            tracing::error!(error = %e, "form generate failed");
            FormOutcome::Error(form_message(&e))
        }
    }
}

fn form_message(err: &PipelineError) -> String {
    if err.is_client_facing() {
        err.to_string()
    } else {
        INTERNAL_ERROR.to_string()
    }
}
