//! # Story Pipeline
//!
//! Turns a one-line creative prompt into an illustrated short story: a
//! three-paragraph narrative, character and background descriptions, and
//! three rendered images (full scene, character study, background) saved as
//! PNGs under a media root.
//!
//! ## Core Concepts
//!
//! - **[`StoryPipeline`]**: the orchestrator. One [`run`](StoryPipeline::run)
//!   makes seven sequential external calls and returns a [`ResultPayload`].
//! - **[`Config`]**: credentials, media paths, models and endpoints, read
//!   once at startup.
//! - **[`ExecCtx`]**: shared execution context (HTTP client, text and image
//!   backends, image timeout, optional event handler).
//! - **[`LlmCall`]**: a templated text call; the story generator and the
//!   image-prompt refiner are both built on it.
//! - **[`backend::Backend`]** / **[`imaging::ImageBackend`]**: provider
//!   seams, with Gemini and Hugging Face as defaults and mocks for tests.
//!
//! ## Failure model
//!
//! A missing credential or a story that can't be generated aborts the run
//! with a [`PipelineError`]. Everything image-related is best-effort: a
//! failed refinement, fetch or save leaves that one image missing and the
//! rest of the payload intact.
//!
//! ## Quick Start
//!
//! ```no_run
//! use story_pipeline::{Config, StoryPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let pipeline = StoryPipeline::from_config(config)?;
//!
//!     let payload = pipeline
//!         .run("A fox and a lantern in a misty forest")
//!         .await?;
//!     println!("{}", payload.short_story);
//!     println!("{}", payload.full_scene_image);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod exec_ctx;
pub mod imaging;
pub mod keywords;
pub mod llm_call;
pub mod output_parser;
pub mod pipeline;
pub mod prompt;
pub mod refine;
pub mod service;
pub mod story;
pub mod style;
pub mod types;

pub use backend::{GeminiBackend, MockBackend};
pub use client::LlmConfig;
pub use config::Config;
pub use error::{PipelineError, Result};
pub use exec_ctx::{ExecCtx, ExecCtxBuilder};
pub use imaging::{HuggingFaceBackend, ImageOutcome, MockImageBackend};
pub use keywords::extract_key_objects;
pub use llm_call::LlmCall;
pub use pipeline::StoryPipeline;
pub use refine::PromptRefiner;
pub use service::{handle_api, handle_form, ApiResponse, FormOutcome, GenerateRequest};
pub use story::{StoryGenerator, StructuredStory};
pub use style::style_context;
pub use types::{ImageKind, ResultPayload};
