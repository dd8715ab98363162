//! Prompt templates and system messages.

use std::fmt::Write as _;
use std::path::Path;

use ideagen_core::ResponseKind;
use tracing::debug;

use crate::error::{GenerateError, Result};

/// Placeholder replaced by the design challenge in every template.
pub const CHALLENGE_PLACEHOLDER: &str = "{{challenge}}";

const BUILTIN_HMW: &str = include_str!("../prompts/hmw_prompt.txt");
const BUILTIN_FEATURE: &str = include_str!("../prompts/feature_prompt.txt");
const BUILTIN_VISUAL: &str = include_str!("../prompts/visual_prompt.txt");
const BUILTIN_LAYOUT: &str = include_str!("../prompts/layout_prompt.txt");
const BUILTIN_CONTEXT: &str = include_str!("../prompts/context_prompt.txt");

/// Returns the template file stem for `kind`, or `None` for kinds whose
/// prompt is built from earlier results.
pub fn template_name(kind: ResponseKind) -> Option<&'static str> {
    match kind {
        ResponseKind::Statements => Some("hmw"),
        ResponseKind::FeatureIdeas => Some("feature"),
        ResponseKind::LayoutIdeas => Some("layout"),
        ResponseKind::SketchPrompts => Some("visual"),
        ResponseKind::UserContext => Some("context"),
        ResponseKind::SketchConcepts => None,
    }
}

/// Returns the fixed system message sent with requests of `kind`.
pub fn system_message(kind: ResponseKind) -> &'static str {
    match kind {
        ResponseKind::Statements => {
            "You are a design strategist. Return multiple 'How Might We' statements organized into 3-4 thematic categories. Format as 'Theme 1: [Name]' followed by numbered statements, then 'Theme 2: [Name]', etc."
        }
        ResponseKind::FeatureIdeas => {
            "You are a product strategist. Return feature ideas organized into 3-4 thematic categories. Format as 'Theme 1: [Name]' followed by numbered features written as 'Feature name. Rationale.', then 'Theme 2: [Name]', etc."
        }
        ResponseKind::LayoutIdeas => {
            "You are a product designer. Return multiple layout suggestions organized into 3-4 thematic categories. Format as 'Theme 1: [Name]' followed by numbered layouts with titles and descriptions, then 'Theme 2: [Name]', etc."
        }
        ResponseKind::SketchPrompts => {
            "You are a concept artist. Return exactly 3 visual prompt descriptions for DALL·E, one per line, numbered 1-3."
        }
        ResponseKind::SketchConcepts => {
            "You are a design strategist. For each sketch concept, provide a clear explanation (1-2 sentences) of the DESIGN IDEA or SOLUTION APPROACH being explored. Focus on what the concept represents conceptually, not visual style. Explain what design problem it addresses or what opportunity it highlights."
        }
        ResponseKind::UserContext => {
            "You are a user researcher. Return 2-4 user segments. Format each as 'Segment 1: [Name]' followed by a 'Persona: [Name] - [Description]' line and a 'Scenarios:' list, then 'Segment 2: [Name]', etc."
        }
    }
}

/// Replaces every `{{challenge}}` placeholder in `template`.
///
/// # Examples
///
/// ```
/// use ideagen_generate::fill_template;
///
/// assert_eq!(
///     fill_template("Challenge: {{challenge}}!", "safer stops"),
///     "Challenge: safer stops!"
/// );
/// ```
pub fn fill_template(template: &str, challenge: &str) -> String {
    template.replace(CHALLENGE_PLACEHOLDER, challenge)
}

/// Builds the sketch concept request from the challenge and the sketch
/// prompts. Missing prompts up to `count` are listed as "N/A".
pub fn concept_prompt(challenge: &str, sketch_prompts: &[String], count: usize) -> String {
    let mut prompt = format!(
        "Design challenge: {challenge}\n\n\
         {count} visual sketch concepts have been created for this challenge. \
         For each sketch concept below, provide a brief explanation (1-2 sentences) \
         that describes the DESIGN IDEA or CONCEPT being explored. Focus on what design \
         approach or solution concept the image represents, not visual style details.\n\n\
         Sketch concepts:\n"
    );
    for idx in 0..count {
        let sketch = sketch_prompts.get(idx).map(String::as_str).unwrap_or("N/A");
        let _ = writeln!(prompt, "{}. {sketch}", idx + 1);
    }
    prompt.push_str(
        "\nFor each, explain: What design idea or solution approach does this sketch concept explore? \
         What problem does it address or what opportunity does it highlight?\n\n\
         Format as numbered explanations, one per line.",
    );
    prompt
}

/// The set of request templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLibrary {
    hmw: String,
    feature: String,
    visual: String,
    layout: String,
    context: String,
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptLibrary {
    /// Templates compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            hmw: BUILTIN_HMW.to_string(),
            feature: BUILTIN_FEATURE.to_string(),
            visual: BUILTIN_VISUAL.to_string(),
            layout: BUILTIN_LAYOUT.to_string(),
            context: BUILTIN_CONTEXT.to_string(),
        }
    }

    /// Loads every `<name>_prompt.txt` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateNotFound`](GenerateError::TemplateNotFound) for the
    /// first missing file.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let load = |name: &str| -> Result<String> {
            let path = dir.join(format!("{name}_prompt.txt"));
            if !path.exists() {
                return Err(GenerateError::TemplateNotFound(path));
            }
            debug!(path = %path.display(), "Loading prompt template");
            Ok(std::fs::read_to_string(path)?)
        };

        Ok(Self {
            hmw: load("hmw")?,
            feature: load("feature")?,
            visual: load("visual")?,
            layout: load("layout")?,
            context: load("context")?,
        })
    }

    /// Loads from `dir` when given, otherwise uses the built-ins.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Ok(Self::builtin()),
        }
    }

    /// Returns the raw template for `kind`.
    pub fn template(&self, kind: ResponseKind) -> Option<&str> {
        match kind {
            ResponseKind::Statements => Some(&self.hmw),
            ResponseKind::FeatureIdeas => Some(&self.feature),
            ResponseKind::LayoutIdeas => Some(&self.layout),
            ResponseKind::SketchPrompts => Some(&self.visual),
            ResponseKind::UserContext => Some(&self.context),
            ResponseKind::SketchConcepts => None,
        }
    }

    /// Renders the user message for a request of `kind`.
    ///
    /// `sketch_prompts` and `count` are only used for sketch concepts.
    pub fn user_prompt(
        &self,
        kind: ResponseKind,
        challenge: &str,
        sketch_prompts: &[String],
        count: usize,
    ) -> String {
        match self.template(kind) {
            Some(template) => fill_template(template, challenge),
            None => concept_prompt(challenge, sketch_prompts, count),
        }
    }
}
