//! Typed JSON extraction from LLM responses.

use serde::de::DeserializeOwned;

use crate::output_parser::error::{truncate, ParseError};
use crate::output_parser::extract::{fenced_block, find_json_object, preprocess};

/// Parse an LLM response into a typed struct.
///
/// Candidates, tried in order:
/// 1. The whole preprocessed text
/// 2. The body of a `` ```json `` (or any) code fence
/// 3. The last bracket-matched `{...}` object
///
/// The first candidate that is valid JSON is deserialized into `T`; its
/// serde error is reported if the shape does not match.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use story_pipeline::output_parser::parse_json;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Mood {
///     mood: String,
/// }
///
/// let response = r#"<think>hmm</think>Sure: {"mood": "wistful"}"#;
/// let result: Mood = parse_json(response).unwrap();
/// assert_eq!(result.mood, "wistful");
/// ```
pub fn parse_json<T: DeserializeOwned>(response: &str) -> Result<T, ParseError> {
    let cleaned = preprocess(response);
    if cleaned.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let candidates = [
        Some(cleaned.as_str()),
        fenced_block(&cleaned, "json"),
        find_json_object(&cleaned),
    ];

    let value = candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| serde_json::from_str::<serde_json::Value>(candidate).ok())
        .ok_or_else(|| ParseError::NoJson {
            text: truncate(&cleaned, 200),
        })?;

    let raw_json = value.to_string();
    serde_json::from_value(value).map_err(|e| ParseError::DeserializationFailed {
        reason: e.to_string(),
        raw_json: truncate(&raw_json, 200),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Kv {
        key: String,
    }

    #[test]
    fn direct_json_object() {
        let result: Kv = parse_json(r#"{"key": "value"}"#).unwrap();
        assert_eq!(result.key, "value");
    }

    #[test]
    fn code_block_json() {
        let input = "Here's the data:\n```json\n{\"key\": \"value\"}\n```";
        let result: Kv = parse_json(input).unwrap();
        assert_eq!(result.key, "value");
    }

    #[test]
    fn json_with_surrounding_text() {
        let input = "Sure! Here's your result: {\"key\": \"value\"}\nHope that helps!";
        let result: Kv = parse_json(input).unwrap();
        assert_eq!(result.key, "value");
    }

    #[test]
    fn wrong_shape_reports_serde_reason() {
        let err = parse_json::<Kv>(r#"{"other": 1}"#).unwrap_err();
        match err {
            ParseError::DeserializationFailed { reason, .. } => {
                assert!(reason.contains("missing field `key`"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn prose_without_json() {
        let err = parse_json::<Kv>("Once upon a time there was no JSON.").unwrap_err();
        assert!(matches!(err, ParseError::NoJson { .. }));
    }

    #[test]
    fn empty_response_fails() {
        assert_eq!(parse_json::<Kv>("  ").unwrap_err(), ParseError::EmptyResponse);
        assert_eq!(
            parse_json::<Kv>("<think>only thoughts</think>").unwrap_err(),
            ParseError::EmptyResponse
        );
    }
}
