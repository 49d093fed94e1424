//! Example: generate an illustrated story from the command line.
//!
//! Reads credentials from the environment or a `.env` file.
//!
//! Run with: `cargo run --example generate_story -- "A fox and a lantern in a misty forest"`
//!
//! Set `RUST_LOG=story_pipeline=debug` to follow each external call.

use std::sync::Arc;

use story_pipeline::events::{Event, FnEventHandler};
use story_pipeline::{Config, ExecCtx, StoryPipeline};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.trim().is_empty() {
        "A fox and a lantern in a misty forest".to_string()
    } else {
        prompt
    };

    let config = Config::from_env()?;
    println!("Config: {:?}", config);

    // Print per-image status as the run progresses
    let handler = FnEventHandler(|event: Event| match event {
        Event::ImageSaved { kind, path } => println!("  {} image -> {}", kind, path.display()),
        Event::ImageMissing { kind, reason } => println!("  {} image missing: {}", kind, reason),
        _ => {}
    });

    let mut ctx = ExecCtx::from_config(&config)?;
    ctx.event_handler = Some(Arc::new(handler));
    let pipeline = StoryPipeline::new(ctx, config);

    let payload = pipeline.run(&prompt).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
