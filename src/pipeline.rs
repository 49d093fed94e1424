use crate::{
    config::Config,
    error::Result,
    events::{emit, Event, Stage},
    exec_ctx::ExecCtx,
    imaging::{discard_image, fetch_image, save_image, ImageOutcome},
    keywords::extract_key_objects,
    prompt::join_key_objects,
    refine::PromptRefiner,
    story::{StoryGenerator, StructuredStory},
    style::style_context,
    types::{ImageKind, ResultPayload},
};

/// Framing the story model is asked to use for isolated characters.
const WHITE_BACKDROP: &str = "on a plain white background";
/// What the merged scene uses in its place.
const IN_SCENE: &str = "naturally integrated into the scene";

/// Story-to-images orchestrator.
///
/// One run makes seven sequential external calls: the structured story,
/// three prompt refinements and three image fetches. Missing credentials and
/// story failures abort the run. Refinement, fetch and save failures only
/// cost the affected image: nothing is left at its path, and the payload
/// still points at all three image paths.
pub struct StoryPipeline {
    config: Config,
    ctx: ExecCtx,
    story: StoryGenerator,
    refiner: PromptRefiner,
}

impl std::fmt::Debug for StoryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryPipeline")
            .field("config", &self.config)
            .field("ctx", &self.ctx)
            .field("text_model", &self.story.call().model())
            .finish()
    }
}

impl StoryPipeline {
    /// Pipeline over `ctx`; models, media paths and credentials come from
    /// `config`.
    pub fn new(ctx: ExecCtx, config: Config) -> Self {
        Self {
            story: StoryGenerator::new(config.text_model.clone()),
            refiner: PromptRefiner::new(config.text_model.clone()),
            config,
            ctx,
        }
    }

    /// Production pipeline: Gemini for text, Hugging Face for images.
    pub fn from_config(config: Config) -> Result<Self> {
        let ctx = ExecCtx::from_config(&config)?;
        Ok(Self::new(ctx, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ctx(&self) -> &ExecCtx {
        &self.ctx
    }

    /// Turn `prompt` into a story and three images under the media root.
    pub async fn run(&self, prompt: &str) -> Result<ResultPayload> {
        let config = &self.config;
        config.require_credentials()?;

        let key_objects = extract_key_objects(prompt);
        tracing::info!(key_objects = ?key_objects, "extracted key objects");
        let style = style_context();

        emit(&self.ctx.event_handler, Event::StageStart { stage: Stage::Story });
        let story = self.story.generate(&self.ctx, prompt, &key_objects).await;
        emit(
            &self.ctx.event_handler,
            Event::StageEnd {
                stage: Stage::Story,
                ok: story.is_ok(),
            },
        );
        let story = story?;

        let mut refined = Vec::with_capacity(ImageKind::ALL.len());
        for kind in ImageKind::ALL {
            let description = describe(kind, prompt, &story, &key_objects);
            refined.push((kind, self.refine(kind, &description, style, &key_objects).await));
        }

        for (kind, image_prompt) in refined {
            let path = kind.path_in(&config.media_root);
            let outcome = match image_prompt {
                Some(image_prompt) => {
                    emit(&self.ctx.event_handler, Event::StageStart { stage: Stage::Render(kind) });
                    let bytes = fetch_image(&self.ctx, &image_prompt, &config.image_model).await;
                    let outcome = save_image(bytes.as_deref(), &path);
                    emit(
                        &self.ctx.event_handler,
                        Event::StageEnd {
                            stage: Stage::Render(kind),
                            ok: outcome.is_saved(),
                        },
                    );
                    outcome
                }
                None => discard_image(&path, "image prompt could not be refined"),
            };
            self.report(kind, outcome);
        }

        Ok(ResultPayload {
            prompt: prompt.to_string(),
            key_objects,
            short_story: story.short_story,
            character_description: story.character_description,
            background_description: story.background_description,
            full_scene_image: ImageKind::FullScene.url_in(&config.media_url),
            character_image: ImageKind::Character.url_in(&config.media_url),
            background_image: ImageKind::Background.url_in(&config.media_url),
            cache_buster: None,
        })
    }

    /// Refine one image prompt. `None` skips the image.
    async fn refine(
        &self,
        kind: ImageKind,
        description: &str,
        style: &str,
        key_objects: &[String],
    ) -> Option<String> {
        emit(&self.ctx.event_handler, Event::StageStart { stage: Stage::Refine(kind) });
        let result = self
            .refiner
            .refine(&self.ctx, description, style, key_objects)
            .await;
        emit(
            &self.ctx.event_handler,
            Event::StageEnd {
                stage: Stage::Refine(kind),
                ok: result.is_ok(),
            },
        );
        match result {
            Ok(image_prompt) => {
                tracing::debug!(%kind, prompt = %image_prompt, "refined image prompt");
                Some(image_prompt)
            }
            Err(e) => {
                tracing::error!(%kind, error = %e, "skipping image");
                None
            }
        }
    }

    fn report(&self, kind: ImageKind, outcome: ImageOutcome) {
        let event = match outcome {
            ImageOutcome::Saved { path, .. } => Event::ImageSaved { kind, path },
            ImageOutcome::Missing { reason, .. } => {
                tracing::warn!(%kind, %reason, "image missing from this run");
                Event::ImageMissing { kind, reason }
            }
        };
        emit(&self.ctx.event_handler, event);
    }
}

/// Merge the story fields into one scene with every key object in view.
pub fn full_scene_description(
    prompt: &str,
    story: &StructuredStory,
    key_objects: &[String],
) -> String {
    format!(
        "\nOriginal idea: \"{}\".\nScene includes: {}.\nBackground: {}.\nAll important objects must be clearly visible: {}.\n",
        prompt,
        story.character_description.replace(WHITE_BACKDROP, IN_SCENE),
        story.background_description,
        join_key_objects(key_objects),
    )
}

/// Description handed to the refiner for `kind`.
fn describe(
    kind: ImageKind,
    prompt: &str,
    story: &StructuredStory,
    key_objects: &[String],
) -> String {
    match kind {
        ImageKind::FullScene => full_scene_description(prompt, story, key_objects),
        ImageKind::Character => format!(
            "{}, isolated, white background, character study.",
            story.character_description
        ),
        ImageKind::Background => format!(
            "{}, no characters, environment only.",
            story.background_description
        ),
    }
}
