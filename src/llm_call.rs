//! One templated LLM call.
//!
//! [`LlmCall`] renders its prompt template, dispatches to the context's text
//! backend and hands back the raw reply. Parsing is left to the caller: the
//! story generator wants a structured record, the refiner a single line.

use crate::{
    backend::{LlmRequest, LlmResponse},
    client::LlmConfig,
    error::Result,
    exec_ctx::ExecCtx,
    prompt::{render, PromptVars},
};

/// A named, templated call against the text backend.
///
/// # Example
///
/// ```ignore
/// use story_pipeline::{LlmCall, LlmConfig, ExecCtx};
/// use story_pipeline::prompt::PromptVars;
///
/// let call = LlmCall::new("summarize", "Summarize this: {text}")
///     .with_model("gemini-1.5-flash")
///     .with_config(LlmConfig::deterministic());
///
/// let reply = call.invoke(&ctx, &PromptVars::new().insert("text", "...")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LlmCall {
    /// Instance name (for logging).
    name: String,
    /// Prompt template with `{key}` placeholders.
    prompt_template: String,
    /// Model identifier.
    model: String,
    /// LLM configuration (temperature, tokens, json_mode).
    config: LlmConfig,
}

impl LlmCall {
    /// Create a new LLM call with a prompt template.
    pub fn new(name: impl Into<String>, prompt_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_template: prompt_template.into(),
            model: crate::config::DEFAULT_TEXT_MODEL.to_string(),
            config: LlmConfig::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the LLM configuration.
    pub fn with_config(mut self, config: LlmConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the backend request for an already rendered prompt.
    fn build_request(&self, prompt: String) -> LlmRequest {
        LlmRequest {
            model: self.model.clone(),
            prompt,
            config: self.config.clone(),
        }
    }

    /// Render the template with `vars` and return the model's raw reply.
    pub async fn invoke(&self, ctx: &ExecCtx, vars: &PromptVars) -> Result<String> {
        let request = self.build_request(render(&self.prompt_template, vars));

        tracing::debug!(
            call = %self.name,
            model = %self.model,
            backend = ctx.text_backend.name(),
            temperature = self.config.temperature,
            "invoking text backend"
        );

        let LlmResponse { text, status, .. } = ctx
            .text_backend
            .complete(&ctx.client, &ctx.text_base_url, &request)
            .await
            .inspect_err(|e| {
                tracing::warn!(call = %self.name, error = %e, "text backend call failed");
            })?;

        tracing::debug!(call = %self.name, status, chars = text.len(), "text backend replied");
        Ok(text)
    }
}
