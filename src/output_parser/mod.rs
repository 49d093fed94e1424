//! # LLM Output Parser
//!
//! Extracts usable data from raw model replies: reasoning blocks, markdown
//! fences, and chatty preambles are stripped before parsing.
//!
//! | Parser | Use Case |
//! |--------|----------|
//! | [`parse_json`] | Extract typed JSON structs |
//! | [`parse_text`] | Clean text extraction |
//! | [`single_line`] | Collapse a reply into one comma-separated line |

pub mod error;
pub mod extract;
pub mod json;
pub mod text;

pub use error::ParseError;
pub use extract::{preprocess, strip_think_tags};
pub use json::parse_json;
pub use text::{parse_text, single_line};
