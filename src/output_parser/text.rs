//! Plain-text extraction from LLM responses.

use crate::output_parser::error::ParseError;
use crate::output_parser::extract::preprocess;

/// Boilerplate openers that models put before the actual answer.
const PREAMBLES: &[&str] = &[
    "Sure! ",
    "Sure, ",
    "Of course! ",
    "Of course, ",
    "Certainly! ",
    "Certainly, ",
    "Absolutely! ",
];

/// Openers that run up to the end of their line (e.g. "Here's the prompt:").
const LEAD_INS: &[&str] = &["Here's ", "Here is "];

/// Clean an LLM response for use as plain text.
///
/// Strips `<think>` blocks, a leading courtesy phrase ("Sure!", "Certainly, ")
/// and a "Here's ...:" lead-in line. Returns `EmptyResponse` if nothing is left.
///
/// # Examples
///
/// ```
/// use story_pipeline::output_parser::parse_text;
///
/// let result = parse_text("Sure! Paris is the capital.").unwrap();
/// assert_eq!(result, "Paris is the capital.");
/// ```
pub fn parse_text(response: &str) -> Result<String, ParseError> {
    let cleaned = preprocess(response);
    let mut text = cleaned.as_str();

    if let Some(rest) = PREAMBLES.iter().find_map(|p| text.strip_prefix(p)) {
        text = rest.trim_start();
    }

    if let Some(rest) = LEAD_INS.iter().find_map(|p| text.strip_prefix(p)) {
        if let Some(pos) = rest.find(['\n', ':']) {
            text = rest[pos + 1..].trim_start();
        }
    }

    let result = text.trim();
    if result.is_empty() {
        return Err(ParseError::EmptyResponse);
    }
    Ok(result.to_string())
}

/// Collapse a multi-line answer into one comma-separated line.
///
/// Blank lines are dropped, list bullets and surrounding quotes/backticks are
/// removed, and the remaining lines are joined with `", "`.
///
/// ```
/// use story_pipeline::output_parser::single_line;
///
/// assert_eq!(single_line("- fox\n- lantern,\n\n\"mist\""), "fox, lantern, mist");
/// ```
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .trim_matches(['"', '`'])
                .trim_end_matches(',')
                .trim()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text() {
        assert_eq!(parse_text("Paris is the capital.").unwrap(), "Paris is the capital.");
    }

    #[test]
    fn with_think() {
        assert_eq!(parse_text("<think>reasoning</think>Paris.").unwrap(), "Paris.");
    }

    #[test]
    fn heres_prefix() {
        assert_eq!(parse_text("Here's the answer:\nParis.").unwrap(), "Paris.");
    }

    #[test]
    fn preamble_then_lead_in() {
        let result = parse_text("Sure! Here is the prompt: fox, lantern").unwrap();
        assert_eq!(result, "fox, lantern");
    }

    #[test]
    fn empty_after_strip() {
        assert!(parse_text("<think>just thinking</think>").is_err());
        assert!(parse_text("Sure! Here's the prompt:").is_err());
    }

    #[test]
    fn single_line_keeps_one_line_input() {
        assert_eq!(
            single_line("watercolor, fox, glowing lantern"),
            "watercolor, fox, glowing lantern"
        );
    }

    #[test]
    fn single_line_handles_code_fence_quotes() {
        assert_eq!(single_line("`fox, forest`\n"), "fox, forest");
    }
}
