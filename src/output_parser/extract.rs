//! Shared extraction helpers for LLM output parsing.
//!
//! Every parser runs [`preprocess`] first, then narrows the text down to the
//! part that carries the answer (a fenced block or a bracketed object).

/// Strip reasoning blocks and surrounding whitespace.
pub fn preprocess(text: &str) -> String {
    strip_think_tags(text).trim().to_string()
}

/// Remove `<think>...</think>` and `<thinking>...</thinking>` blocks.
///
/// An unclosed block swallows the rest of the text.
///
/// # Examples
///
/// ```
/// use story_pipeline::output_parser::strip_think_tags;
///
/// assert_eq!(strip_think_tags("<think>reasoning</think>result"), "result");
/// assert_eq!(strip_think_tags("<think>no closing tag"), "");
/// assert_eq!(strip_think_tags("<thinking>also works</thinking>done"), "done");
/// ```
pub fn strip_think_tags(text: &str) -> String {
    ["think", "thinking"]
        .iter()
        .fold(text.to_string(), |acc, tag| strip_block(&acc, tag))
}

fn strip_block(text: &str, tag: &str) -> String {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(&open) {
        out.push_str(&rest[..start]);
        match rest[start..].find(&close) {
            Some(end) => rest = &rest[start + end + close.len()..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Body of the first markdown code fence, preferring one tagged `lang`.
///
/// # Examples
///
/// ```
/// use story_pipeline::output_parser::extract::fenced_block;
///
/// let input = "Here:\n```json\n{\"a\": 1}\n```";
/// assert_eq!(fenced_block(input, "json"), Some("{\"a\": 1}"));
/// ```
pub fn fenced_block<'a>(text: &'a str, lang: &str) -> Option<&'a str> {
    let blocks = fenced_blocks(text);
    blocks
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(lang))
        .or_else(|| blocks.first())
        .map(|(_, body)| *body)
}

/// All complete code fences as `(language_tag, body)` pairs.
fn fenced_blocks(text: &str) -> Vec<(&str, &str)> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after = &rest[open + 3..];
        let Some(line_end) = after.find('\n') else {
            break;
        };
        let tag = after[..line_end].trim();
        let body_and_rest = &after[line_end + 1..];
        let Some(close) = body_and_rest.find("```") else {
            break;
        };
        blocks.push((tag, body_and_rest[..close].trim()));
        rest = &body_and_rest[close + 3..];
    }
    blocks
}

/// The last top-level `{...}` region, skipping braces inside JSON strings.
///
/// # Examples
///
/// ```
/// use story_pipeline::output_parser::extract::find_json_object;
///
/// let input = r#"Result: {"a": {"b": "}"}} done"#;
/// assert_eq!(find_json_object(input), Some(r#"{"a": {"b": "}"}}"#));
/// ```
pub fn find_json_object(text: &str) -> Option<&str> {
    let mut last = None;
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    last = Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_think_tags_multiple() {
        let input = "<think>first</think>middle<think>second</think>end";
        assert_eq!(strip_think_tags(input), "middleend");
    }

    #[test]
    fn strip_mixed_think_and_thinking() {
        let input = "<think>a</think>mid<thinking>b</thinking>end";
        assert_eq!(strip_think_tags(input), "midend");
    }

    #[test]
    fn preprocess_strips_and_trims() {
        assert_eq!(preprocess("  <think>stuff</think>  hello world  "), "hello world");
    }

    #[test]
    fn fenced_block_prefers_language() {
        let input = "```text\nnotes\n```\nthen\n```json\n{\"a\": 1}\n```";
        assert_eq!(fenced_block(input, "json"), Some("{\"a\": 1}"));
        assert_eq!(fenced_block(input, "yaml"), Some("notes"));
    }

    #[test]
    fn fenced_block_requires_closing_fence() {
        assert_eq!(fenced_block("```json\n{\"a\": 1}", "json"), None);
        assert_eq!(fenced_block("no fences", "json"), None);
    }

    #[test]
    fn find_json_object_nested() {
        let input = r#"{"outer": {"inner": [1]}}"#;
        assert_eq!(find_json_object(input), Some(input));
    }

    #[test]
    fn find_json_object_prefers_later() {
        let input = r#"{"draft": 1} and finally {"final": 2}"#;
        assert_eq!(find_json_object(input), Some(r#"{"final": 2}"#));
    }

    #[test]
    fn find_json_object_ignores_quotes_outside_objects() {
        let input = r#"He said "hi" then {"text": "a \"quoted\" } brace"}"#;
        assert_eq!(
            find_json_object(input),
            Some(r#"{"text": "a \"quoted\" } brace"}"#)
        );
    }

    #[test]
    fn find_json_object_unbalanced() {
        assert_eq!(find_json_object(r#"{"a": 1"#), None);
    }
}
