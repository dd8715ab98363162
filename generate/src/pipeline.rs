//! The generation pipeline.
//!
//! A run fans out in two waves. The first requests statements, sketch
//! prompts, layouts, feature ideas and user context at once. The second
//! renders one image per sketch prompt alongside the sketch concept
//! explanations, which depend on the prompts. Every response is parsed
//! independently.

use chrono::Utc;
use ideagen_core::{FlatResult, IdeaBundle, ImageOutcome, ResponseKind, ThematicResult};
use ideagen_parse::{
    parse_feature_ideas, parse_layout_ideas, parse_sketch_concepts, parse_sketch_prompts,
    parse_statements, parse_user_context,
};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::client::{CompletionRequest, ImageGenerator, TextCompleter};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::prompt::{PromptLibrary, system_message};
use crate::refine::{combine_selected_ideas, refine_challenge};

/// Runs generation requests against a text and an image collaborator.
pub struct Generator<T, I> {
    completer: T,
    images: I,
    prompts: PromptLibrary,
    config: GeneratorConfig,
}

impl<T: TextCompleter, I: ImageGenerator> Generator<T, I> {
    pub fn new(completer: T, images: I, prompts: PromptLibrary, config: GeneratorConfig) -> Self {
        Self {
            completer,
            images,
            prompts,
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn completer(&self) -> &T {
        &self.completer
    }

    /// Generates every result kind for `challenge`.
    ///
    /// # Errors
    ///
    /// Fails if the statements, sketch prompts or layouts request fails.
    /// Feature ideas and user context degrade to empty, a failed image keeps
    /// its slot with the error recorded, and failed sketch concepts fall back
    /// to the sketch prompts.
    pub fn generate_all(&self, challenge: &str) -> Result<IdeaBundle> {
        let count = self.config.sketch_count;
        info!(sketch_count = count, "Starting generation run");

        let ((statements, sketches), (layouts, (features, context))) = rayon::join(
            || {
                rayon::join(
                    || self.request(ResponseKind::Statements, challenge, &[]),
                    || self.request(ResponseKind::SketchPrompts, challenge, &[]),
                )
            },
            || {
                rayon::join(
                    || self.request(ResponseKind::LayoutIdeas, challenge, &[]),
                    || {
                        rayon::join(
                            || self.request(ResponseKind::FeatureIdeas, challenge, &[]),
                            || self.request(ResponseKind::UserContext, challenge, &[]),
                        )
                    },
                )
            },
        );

        let statements = parse_statements(&statements?);
        let sketch_prompts = parse_sketch_prompts(&sketches?, count);
        let layouts = parse_layout_ideas(&layouts?);

        let feature_ideas = match features {
            Ok(raw) => parse_feature_ideas(&raw),
            Err(err) => {
                warn!(error = %err, "Feature ideas unavailable");
                ThematicResult::new()
            }
        };
        let user_context = match context {
            Ok(raw) => parse_user_context(&raw),
            Err(err) => {
                warn!(error = %err, "User context unavailable");
                Vec::new()
            }
        };
        info!(
            themes = statements.theme_count(),
            layouts = layouts.item_count(),
            "Text results parsed"
        );

        let (images, concepts) = rayon::join(
            || {
                sketch_prompts
                    .as_slice()
                    .par_iter()
                    .map(|prompt| self.image(prompt))
                    .collect::<Vec<_>>()
            },
            || self.request(ResponseKind::SketchConcepts, challenge, sketch_prompts.as_slice()),
        );

        let sketch_concepts = match concepts {
            Ok(raw) => parse_sketch_concepts(&raw, count),
            Err(err) => {
                warn!(error = %err, "Sketch concepts unavailable; using sketch prompts");
                FlatResult::new(sketch_prompts.as_slice().to_vec())
            }
        };

        let mut bundle = IdeaBundle::new(challenge, Utc::now().to_rfc3339());
        bundle.statements = statements;
        bundle.feature_ideas = feature_ideas;
        bundle.layouts = layouts;
        bundle.sketch_prompts = sketch_prompts;
        bundle.sketch_concepts = sketch_concepts;
        bundle.images = images;
        bundle.user_context = user_context;

        info!(
            images = bundle.images.iter().filter(|image| image.is_success()).count(),
            "Generation run finished"
        );
        Ok(bundle)
    }

    /// Generates a new run that builds on `selected` idea texts.
    ///
    /// The returned bundle keeps `original` as its challenge and records the
    /// combined selection as its refinement.
    ///
    /// # Errors
    ///
    /// Returns [`NoIdeasSelected`](crate::GenerateError::NoIdeasSelected) for
    /// an empty selection, otherwise as [`generate_all`](Self::generate_all).
    pub fn build_on(&self, original: &str, selected: &[String]) -> Result<IdeaBundle> {
        let combined = combine_selected_ideas(selected)?;
        info!(selected = selected.len(), "Building on selected ideas");

        let mut bundle = self.generate_all(&refine_challenge(original, &combined))?;
        bundle.challenge = original.to_string();
        bundle.refinement = Some(combined);
        Ok(bundle)
    }

    fn request(
        &self,
        kind: ResponseKind,
        challenge: &str,
        sketch_prompts: &[String],
    ) -> Result<String> {
        let user = self
            .prompts
            .user_prompt(kind, challenge, sketch_prompts, self.config.sketch_count);
        let request = CompletionRequest {
            kind,
            system: system_message(kind),
            user: &user,
            params: self.config.requests.for_kind(kind),
        };
        self.completer
            .complete(&request)
            .map_err(|err| err.for_kind(kind))
    }

    fn image(&self, prompt: &str) -> ImageOutcome {
        match self.images.generate_image(prompt) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "Image generation failed");
                ImageOutcome::failed(err.to_string())
            }
        }
    }
}
