//! Key-object extraction.
//!
//! The extracted terms are threaded through every generation step so the
//! story, the refined prompts, and the images all mention the same things.

use std::collections::HashSet;

/// Words dropped from the key-object list (compared lowercase).
pub const STOP_WORDS: &[&str] = &[
    "and", "the", "a", "an", "to", "are", "is", "of", "on", "in", "with", "for", "but",
];

/// Split a prompt into salient terms.
///
/// Tokens are maximal runs of word characters (alphanumerics and `_`).
/// Stop-words are removed and duplicates are dropped case-insensitively,
/// keeping the first-seen spelling and order.
///
/// # Example
///
/// ```
/// use story_pipeline::keywords::extract_key_objects;
///
/// assert_eq!(extract_key_objects("The cat and the dog"), vec!["cat", "dog"]);
/// assert!(extract_key_objects("").is_empty());
/// ```
pub fn extract_key_objects(prompt: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    prompt
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .filter(|token| !STOP_WORDS.contains(&token.to_lowercase().as_str()))
        .filter(|token| seen.insert(token.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
