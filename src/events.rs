//! Lifecycle events for a pipeline run.
//!
//! Optional and non-intrusive: the pipeline emits events as it moves through
//! its stages and as each image lands on disk (or doesn't). Implement
//! [`EventHandler`] to drive progress indicators or collect per-image status.

use crate::types::ImageKind;
use std::path::PathBuf;
use std::sync::Arc;

/// The external calls a run is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The structured story call.
    Story,
    /// Refining the prompt for one image.
    Refine(ImageKind),
    /// Fetching and saving one image.
    Render(ImageKind),
}

/// Events emitted during a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A stage has started.
    StageStart { stage: Stage },
    /// A stage has finished.
    StageEnd {
        stage: Stage,
        /// Whether the stage succeeded.
        ok: bool,
    },
    /// An image was written to disk.
    ImageSaved { kind: ImageKind, path: PathBuf },
    /// An image is absent for this run.
    ImageMissing {
        kind: ImageKind,
        /// Why the image is absent.
        reason: String,
    },
}

/// Handler for pipeline lifecycle events.
///
/// # Example
///
/// ```
/// use story_pipeline::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         if let Event::ImageMissing { kind, reason } = event {
///             eprintln!("{} image missing: {}", kind, reason);
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the pipeline emits an event.
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
