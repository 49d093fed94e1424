//! Image-prompt refinement.
//!
//! A single refiner serves all three image kinds; only the description fed
//! to it differs. Style and key objects are shared so the images stay
//! consistent with each other.

use crate::client::LlmConfig;
use crate::error::Result;
use crate::exec_ctx::ExecCtx;
use crate::llm_call::LlmCall;
use crate::output_parser::{parse_text, single_line};
use crate::prompt::{join_key_objects, PromptVars, REFINER_TEMPLATE};
use crate::PipelineError;

/// Compresses a visual description into one line of comma-separated keywords.
#[derive(Debug, Clone)]
pub struct PromptRefiner {
    call: LlmCall,
}

impl PromptRefiner {
    /// Refiner for `model` at temperature 0.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            call: LlmCall::new("refine", REFINER_TEMPLATE)
                .with_model(model)
                .with_config(LlmConfig::deterministic()),
        }
    }

    pub fn call(&self) -> &LlmCall {
        &self.call
    }

    /// Refine `description` into a single-line image prompt.
    ///
    /// Backend failures and empty replies are [`PipelineError::Refinement`].
    pub async fn refine(
        &self,
        ctx: &ExecCtx,
        description: &str,
        style: &str,
        key_objects: &[String],
    ) -> Result<String> {
        let vars = PromptVars::new()
            .insert("description", description)
            .insert("style_context", style)
            .insert("key_objects", join_key_objects(key_objects));

        let raw = self
            .call
            .invoke(ctx, &vars)
            .await
            .map_err(|e| PipelineError::Refinement(e.to_string()))?;

        let text = parse_text(&raw).map_err(|e| PipelineError::Refinement(e.to_string()))?;
        Ok(single_line(&text))
    }
}
