use serde::{Deserialize, Serialize};

use crate::{
    FeatureIdea, FlatResult, ImageOutcome, Item, LayoutIdea, Statement, ThematicResult,
    UserSegment,
};

/// Everything produced by one generation run.
///
/// A bundle is the unit handed to the session store and to exporters. It
/// serializes as a single JSON document with theme and item order intact.
///
/// # Examples
///
/// ```
/// use ideagen_core::*;
///
/// let mut bundle = IdeaBundle::new("Make bus stops safer at night", "2024-01-15T10:30:00Z");
/// bundle.statements.push("Safety", Statement::new("How might we improve lighting"));
/// bundle.layouts.push("Navigation", LayoutIdea::new("Map first", "Full-screen map"));
///
/// assert_eq!(bundle.challenge, "Make bus stops safer at night");
/// assert_eq!(bundle.ideas().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaBundle {
    /// Result contract version (populated from
    /// [`RESULT_CONTRACT_VERSION`](crate::RESULT_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// The design challenge as entered by the user.
    pub challenge: String,
    /// Refinement context when the run built on selected ideas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement: Option<String>,
    /// ISO-8601 timestamp of the run.
    pub generated_at: String,
    #[serde(default)]
    pub statements: ThematicResult<Statement>,
    #[serde(default)]
    pub feature_ideas: ThematicResult<FeatureIdea>,
    #[serde(default)]
    pub layouts: ThematicResult<LayoutIdea>,
    #[serde(default)]
    pub sketch_prompts: FlatResult,
    /// Explanations aligned by position with `sketch_prompts`.
    #[serde(default)]
    pub sketch_concepts: FlatResult,
    /// Image outcomes aligned by position with `sketch_prompts`.
    #[serde(default)]
    pub images: Vec<ImageOutcome>,
    #[serde(default)]
    pub user_context: Vec<UserSegment>,
}

impl IdeaBundle {
    /// Creates an empty bundle for a challenge.
    ///
    /// The `schema_version` is automatically set from
    /// [`RESULT_CONTRACT_VERSION`](crate::RESULT_CONTRACT_VERSION).
    pub fn new(challenge: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            schema_version: Some(crate::RESULT_CONTRACT_VERSION.to_string()),
            challenge: challenge.into(),
            refinement: None,
            generated_at: generated_at.into(),
            statements: ThematicResult::new(),
            feature_ideas: ThematicResult::new(),
            layouts: ThematicResult::new(),
            sketch_prompts: FlatResult::default(),
            sketch_concepts: FlatResult::default(),
            images: Vec::new(),
            user_context: Vec::new(),
        }
    }

    /// Lists every selectable idea with a stable identifier.
    ///
    /// Identifiers follow `<kind>_<theme>_<n>` for themed items (1-based
    /// within the theme), `sketch_<n>` for sketch concepts, `persona_<s>` for
    /// personas and `scenario_<s>_<n>` for scenarios (`s` is the 1-based
    /// segment position).
    pub fn ideas(&self) -> Vec<(String, Item)> {
        let mut ideas = Vec::new();
        for (theme, items) in self.statements.themes() {
            for (idx, item) in items.iter().enumerate() {
                ideas.push((format!("hmw_{theme}_{}", idx + 1), Item::from(item.clone())));
            }
        }
        for (theme, items) in self.feature_ideas.themes() {
            for (idx, item) in items.iter().enumerate() {
                ideas.push((
                    format!("feature_{theme}_{}", idx + 1),
                    Item::from(item.clone()),
                ));
            }
        }
        for (theme, items) in self.layouts.themes() {
            for (idx, item) in items.iter().enumerate() {
                ideas.push((format!("layout_{theme}_{}", idx + 1), Item::from(item.clone())));
            }
        }
        for (idx, concept) in self.sketch_concepts.iter().enumerate() {
            ideas.push((
                format!("sketch_{}", idx + 1),
                Item::SketchConcept(concept.to_string()),
            ));
        }
        for (seg_idx, segment) in self.user_context.iter().enumerate() {
            let seg = seg_idx + 1;
            ideas.push((format!("persona_{seg}"), Item::Persona(segment.persona.clone())));
            for (idx, scenario) in segment.scenarios.iter().enumerate() {
                ideas.push((
                    format!("scenario_{seg}_{}", idx + 1),
                    Item::Scenario {
                        persona: segment.persona.name.clone(),
                        scenario: scenario.clone(),
                    },
                ));
            }
        }
        ideas
    }

    /// Looks up a selectable idea by identifier.
    pub fn find_idea(&self, id: &str) -> Option<Item> {
        self.ideas()
            .into_iter()
            .find(|(idea_id, _)| idea_id == id)
            .map(|(_, item)| item)
    }
}
