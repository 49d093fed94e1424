//! Structured story generation.
//!
//! The model is asked for a JSON object with three string fields. Its reply
//! goes through [`parse_story`], which either yields a complete
//! [`StructuredStory`] or a [`ParseError`]; a partially filled story can't
//! be constructed.

use crate::client::LlmConfig;
use crate::error::Result;
use crate::exec_ctx::ExecCtx;
use crate::llm_call::LlmCall;
use crate::output_parser::{parse_json, ParseError};
use crate::prompt::{join_key_objects, PromptVars, STORY_TEMPLATE};
use crate::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::json;

const SHORT_STORY_DOC: &str =
    "A 3-paragraph short story in Studio Ghibli's warm, imaginative tone.";
const CHARACTER_DOC: &str = "A detailed visual description of ALL main characters, each listed separately. \
Describe species, appearance, clothing, accessories, posture, expression. \
They should be standing on a plain white background for clean separation.";
const BACKGROUND_DOC: &str = "A detailed visual description of the environment in Studio Ghibli art style. \
Include lighting, atmosphere, objects, and setting details. There should be no characters in this image.";

/// The three text artifacts of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredStory {
    pub short_story: String,
    pub character_description: String,
    pub background_description: String,
}

impl StructuredStory {
    /// JSON schema of the expected reply, with a description per field.
    pub fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "short_story": {"type": "string", "description": SHORT_STORY_DOC},
                "character_description": {"type": "string", "description": CHARACTER_DOC},
                "background_description": {"type": "string", "description": BACKGROUND_DOC},
            },
            "required": ["short_story", "character_description", "background_description"],
        })
    }

    /// Output-format block embedded in the story prompt.
    pub fn format_instructions() -> String {
        format!(
            "The output should be formatted as a JSON instance that conforms to the JSON schema below. \
Respond with the JSON object only.\n\nHere is the output schema:\n```\n{}\n```",
            Self::schema()
        )
    }
}

/// Parse a raw model reply into a complete [`StructuredStory`].
///
/// All three fields must be present, be strings, and contain non-whitespace
/// text. Surrounding whitespace is trimmed.
pub fn parse_story(raw: &str) -> std::result::Result<StructuredStory, ParseError> {
    let story: StructuredStory = parse_json(raw)?;
    Ok(StructuredStory {
        short_story: required("short_story", &story.short_story)?,
        character_description: required("character_description", &story.character_description)?,
        background_description: required("background_description", &story.background_description)?,
    })
}

fn required(field: &'static str, value: &str) -> std::result::Result<String, ParseError> {
    match value.trim() {
        "" => Err(ParseError::EmptyField(field)),
        text => Ok(text.to_string()),
    }
}

/// Generates a [`StructuredStory`] from a user prompt.
#[derive(Debug, Clone)]
pub struct StoryGenerator {
    call: LlmCall,
}

impl StoryGenerator {
    /// Story generator for `model` at temperature 0.7 with JSON output.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            call: LlmCall::new("story", STORY_TEMPLATE)
                .with_model(model)
                .with_config(LlmConfig::creative_json()),
        }
    }

    pub fn call(&self) -> &LlmCall {
        &self.call
    }

    /// Produce the story, or [`PipelineError::Generation`] with the cause.
    pub async fn generate(
        &self,
        ctx: &ExecCtx,
        user_prompt: &str,
        key_objects: &[String],
    ) -> Result<StructuredStory> {
        let vars = PromptVars::new()
            .insert("user_prompt", user_prompt)
            .insert("key_objects", join_key_objects(key_objects))
            .insert("format_instructions", StructuredStory::format_instructions());

        let raw = self
            .call
            .invoke(ctx, &vars)
            .await
            .map_err(|e| PipelineError::Generation(e.to_string()))?;

        parse_story(&raw).map_err(|e| {
            tracing::error!(error = %e, "story reply did not match the schema");
            PipelineError::Generation(e.to_string())
        })
    }
}
