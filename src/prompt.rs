use std::collections::HashMap;

/// Sentinel that should never appear in real templates.
const ESCAPE_SENTINEL: &str = "\x00LBRACE\x00";
/// Sentinel for escaped closing brace.
const ESCAPE_SENTINEL_CLOSE: &str = "\x00RBRACE\x00";

/// Prompt for the structured story call.
///
/// Placeholders: `{key_objects}`, `{format_instructions}`, `{user_prompt}`.
pub const STORY_TEMPLATE: &str = "You are a creative writer and concept artist.

The user will provide a creative idea.
From that idea, generate:
1. A short story (3 paragraphs, Studio Ghibli style).
2. A detailed description of ALL characters, each listed separately, plain white background.
3. A detailed background description.

RULES:
- You MUST include all key characters and objects from the user's prompt in every part of your output.
- For objects, describe their appearance, size, color, and exact placement so they are easy to visualize in artwork.
- Maintain whimsical, heartfelt storytelling.

Key objects/characters to include: {key_objects}

{format_instructions}

USER PROMPT: {user_prompt}";

/// Prompt for the image-prompt refiner.
///
/// Placeholders: `{style_context}`, `{key_objects}`, `{description}`.
pub const REFINER_TEMPLATE: &str = "You are an expert AI image prompt engineer.
Convert the description into a concise, effective prompt for a text-to-image model.

REQUIREMENTS:
- Must include: {style_context}
- Preserve all characters exactly as described (species, clothing, posture, accessories).
- Include all important objects: {key_objects}
- Keep perspective, lighting, and color palette consistent.
- Output should be a single line of comma-separated keywords.

DESCRIPTION: {description}

CONCISE PROMPT:";

/// Values substituted into `{key}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    data: HashMap<String, String>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Build a prompt string with variable substitution.
///
/// Replaces `{key}` placeholders in the template with values from `vars`.
/// Use `{{` to insert a literal `{` and `}}` to insert a literal `}`.
/// Substituted values are inserted verbatim, braces included.
///
/// # Example
///
/// ```
/// use story_pipeline::prompt::{render, PromptVars};
///
/// let vars = PromptVars::new().insert("name", "Alice");
/// let result = render("Hello {name}, here is JSON: {{\"key\": \"val\"}}", &vars);
/// assert_eq!(result, r#"Hello Alice, here is JSON: {"key": "val"}"#);
/// ```
pub fn render(template: &str, vars: &PromptVars) -> String {
    // Pass 1: protect escaped braces
    let mut rendered = template.replace("{{", ESCAPE_SENTINEL);
    rendered = rendered.replace("}}", ESCAPE_SENTINEL_CLOSE);

    // Pass 2: substitute placeholders, protecting braces in values so a
    // JSON schema in one value can't be re-expanded by a later key
    for (key, value) in &vars.data {
        let placeholder = format!("{{{}}}", key);
        let protected = value
            .replace('{', ESCAPE_SENTINEL)
            .replace('}', ESCAPE_SENTINEL_CLOSE);
        rendered = rendered.replace(&placeholder, &protected);
    }

    // Pass 3: restore escaped braces
    rendered = rendered.replace(ESCAPE_SENTINEL, "{");
    rendered = rendered.replace(ESCAPE_SENTINEL_CLOSE, "}");
    rendered
}

/// Join key objects the way every prompt presents them.
pub fn join_key_objects(key_objects: &[String]) -> String {
    key_objects.join(", ")
}
