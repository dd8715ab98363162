//! Result type definitions for structured ideation output.
//!
//! This module defines the data model produced by the parsing engine. The
//! types are designed for serialization with [`serde`] and round-trip
//! through JSON, YAML and the SQLite session store without losing theme or
//! item order.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Version of the result contract (semver).
///
/// Embedded in every [`IdeaBundle`](crate::IdeaBundle) to track
/// compatibility of stored sessions.
pub const RESULT_CONTRACT_VERSION: &str = "1.0.0";

/// Lead-in phrase every [`Statement`] starts with.
pub const CANONICAL_LEAD_IN: &str = "How might we";

/// Number of sketch prompts and sketch concepts produced per request.
pub const DEFAULT_SKETCH_COUNT: usize = 3;

/// Kind of generation request a raw response belongs to.
///
/// Each kind has its own prompt, its own item shape and its own fallback
/// constants.
///
/// # Examples
///
/// ```
/// use ideagen_core::ResponseKind;
///
/// assert_eq!(ResponseKind::Statements.label(), "statements");
/// assert!(ResponseKind::LayoutIdeas.is_thematic());
/// assert!(!ResponseKind::SketchPrompts.is_thematic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Reframed "How might we" problem statements.
    Statements,
    /// Feature ideas with a rationale.
    FeatureIdeas,
    /// UI layout ideas with a description.
    LayoutIdeas,
    /// Visual prompts for the image collaborator.
    SketchPrompts,
    /// Conceptual explanations aligned with the sketch prompts.
    SketchConcepts,
    /// User segments with personas and scenarios.
    UserContext,
}

impl ResponseKind {
    /// All kinds, in pipeline order.
    pub const ALL: [ResponseKind; 6] = [
        ResponseKind::Statements,
        ResponseKind::FeatureIdeas,
        ResponseKind::LayoutIdeas,
        ResponseKind::SketchPrompts,
        ResponseKind::SketchConcepts,
        ResponseKind::UserContext,
    ];

    /// Stable snake_case label, identical to the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Statements => "statements",
            Self::FeatureIdeas => "feature_ideas",
            Self::LayoutIdeas => "layout_ideas",
            Self::SketchPrompts => "sketch_prompts",
            Self::SketchConcepts => "sketch_concepts",
            Self::UserContext => "user_context",
        }
    }

    /// Returns `true` for kinds whose output is a [`ThematicResult`].
    pub fn is_thematic(&self) -> bool {
        matches!(
            self,
            Self::Statements | Self::FeatureIdeas | Self::LayoutIdeas
        )
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display fields shared by every item shape.
///
/// Renderers and validators work through this trait so they do not need to
/// know which concrete item they are looking at.
pub trait ItemText {
    /// Primary line of the item (statement text, feature name, layout title).
    fn headline(&self) -> &str;

    /// Secondary text, if the shape has one and it is non-empty.
    fn detail(&self) -> Option<&str>;

    /// Returns `true` when the item carries no usable content.
    fn is_blank(&self) -> bool {
        self.headline().trim().is_empty()
    }

    /// Single-line text used when the item is selected for refinement.
    fn idea_text(&self) -> String {
        match self.detail() {
            Some(detail) => format!("{}. {}", self.headline(), detail),
            None => self.headline().to_string(),
        }
    }
}

/// A reframed problem statement beginning with [`CANONICAL_LEAD_IN`].
///
/// Construction does not re-normalize; the parsing engine is responsible for
/// producing canonical text.
///
/// # Examples
///
/// ```
/// use ideagen_core::Statement;
///
/// let stmt = Statement::new("How might we reduce wait times");
/// assert_eq!(stmt, "How might we reduce wait times");
/// assert!(stmt.has_canonical_lead_in());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement(String);

impl Statement {
    /// Wraps already-normalized statement text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the statement text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the statement and returns its text.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns `true` if the text starts with the canonical lead-in
    /// (case-insensitive).
    pub fn has_canonical_lead_in(&self) -> bool {
        self.0
            .get(..CANONICAL_LEAD_IN.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(CANONICAL_LEAD_IN))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Statement {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for Statement {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl ItemText for Statement {
    fn headline(&self) -> &str {
        &self.0
    }

    fn detail(&self) -> Option<&str> {
        None
    }
}

/// A feature idea: a short name and an optional rationale.
///
/// # Examples
///
/// ```
/// use ideagen_core::{FeatureIdea, ItemText};
///
/// let idea = FeatureIdea::new("Live queue tracker", "Shows wait times before arrival");
/// assert_eq!(idea.idea_text(), "Live queue tracker. Shows wait times before arrival");
///
/// let bare = FeatureIdea::new("Offline mode", "");
/// assert_eq!(bare.detail(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureIdea {
    /// Feature name.
    pub feature: String,
    /// Why the feature matters; may be empty.
    #[serde(default)]
    pub rationale: String,
}

impl FeatureIdea {
    /// Creates a feature idea.
    pub fn new(feature: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            rationale: rationale.into(),
        }
    }
}

impl ItemText for FeatureIdea {
    fn headline(&self) -> &str {
        &self.feature
    }

    fn detail(&self) -> Option<&str> {
        Some(self.rationale.as_str()).filter(|r| !r.is_empty())
    }
}

/// A layout idea: a title and a free-text description.
///
/// # Examples
///
/// ```
/// use ideagen_core::LayoutIdea;
///
/// let layout = LayoutIdea::new("Card Layout", "A responsive grid of cards.");
/// assert_eq!(layout.title, "Card Layout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutIdea {
    /// Layout name.
    pub title: String,
    /// Description accumulated from one or more source lines; may be empty.
    #[serde(default)]
    pub description: String,
}

impl LayoutIdea {
    /// Creates a layout idea.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl ItemText for LayoutIdea {
    fn headline(&self) -> &str {
        &self.title
    }

    fn detail(&self) -> Option<&str> {
        Some(self.description.as_str()).filter(|d| !d.is_empty())
    }

    fn idea_text(&self) -> String {
        match self.detail() {
            Some(detail) => format!("{}: {}", self.title, detail),
            None => self.title.clone(),
        }
    }
}

impl ItemText for String {
    fn headline(&self) -> &str {
        self
    }

    fn detail(&self) -> Option<&str> {
        None
    }
}

/// Any single item the parsing engine produces.
///
/// Used where items of different kinds are handled together, such as idea
/// selection for refinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Statement(Statement),
    FeatureIdea(FeatureIdea),
    LayoutIdea(LayoutIdea),
    /// Explanation of one sketch, aligned by position with its prompt.
    SketchConcept(String),
    Persona(Persona),
    /// A usage scenario, carried with the name of its segment's persona.
    Scenario { persona: String, scenario: String },
}

impl ItemText for Item {
    fn headline(&self) -> &str {
        match self {
            Self::Statement(s) => s.headline(),
            Self::FeatureIdea(f) => f.headline(),
            Self::LayoutIdea(l) => l.headline(),
            Self::SketchConcept(c) => c.headline(),
            Self::Persona(p) => p.headline(),
            Self::Scenario { scenario, .. } => scenario.as_str(),
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            Self::Statement(s) => s.detail(),
            Self::FeatureIdea(f) => f.detail(),
            Self::LayoutIdea(l) => l.detail(),
            Self::SketchConcept(c) => c.detail(),
            Self::Persona(p) => p.detail(),
            Self::Scenario { .. } => None,
        }
    }

    fn idea_text(&self) -> String {
        match self {
            Self::Statement(s) => s.idea_text(),
            Self::FeatureIdea(f) => f.idea_text(),
            Self::LayoutIdea(l) => l.idea_text(),
            Self::SketchConcept(c) => c.idea_text(),
            Self::Persona(p) => p.idea_text(),
            Self::Scenario { persona, scenario } => {
                format!("Persona: {persona}. Scenario: {scenario}")
            }
        }
    }
}

impl From<Statement> for Item {
    fn from(value: Statement) -> Self {
        Self::Statement(value)
    }
}

impl From<FeatureIdea> for Item {
    fn from(value: FeatureIdea) -> Self {
        Self::FeatureIdea(value)
    }
}

impl From<LayoutIdea> for Item {
    fn from(value: LayoutIdea) -> Self {
        Self::LayoutIdea(value)
    }
}

/// Ordered mapping from theme name to an ordered list of items.
///
/// Theme order is first-insertion order and is preserved through
/// serialization (the map serializes as a JSON/YAML object whose keys keep
/// their order). Theme names are unique by exact string match.
///
/// # Examples
///
/// ```
/// use ideagen_core::{Statement, ThematicResult};
///
/// let mut result = ThematicResult::new();
/// result.push("Access", Statement::new("How might we reduce wait times"));
/// result.push("Safety", Statement::new("How might we better lighting"));
/// result.push("Access", Statement::new("How might we improve shelter"));
///
/// assert_eq!(result.theme_names().collect::<Vec<_>>(), vec!["Access", "Safety"]);
/// assert_eq!(result.get("Access").unwrap().len(), 2);
/// assert_eq!(result.item_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThematicResult<T> {
    themes: IndexMap<String, Vec<T>>,
}

impl<T> Default for ThematicResult<T> {
    fn default() -> Self {
        Self {
            themes: IndexMap::new(),
        }
    }
}

impl<T> ThematicResult<T> {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no themes are present.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Number of themes.
    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    /// Total number of items across all themes.
    pub fn item_count(&self) -> usize {
        self.themes.values().map(Vec::len).sum()
    }

    /// Opens a theme at the end of the mapping if it is not already present.
    ///
    /// Returns `true` when the theme was newly inserted.
    pub fn open_theme(&mut self, name: &str) -> bool {
        if self.themes.contains_key(name) {
            return false;
        }
        self.themes.insert(name.to_string(), Vec::new());
        true
    }

    /// Appends an item to a theme, opening the theme first if needed.
    pub fn push(&mut self, theme: &str, item: T) {
        match self.themes.get_mut(theme) {
            Some(items) => items.push(item),
            None => {
                self.themes.insert(theme.to_string(), vec![item]);
            }
        }
    }

    /// Returns the items of a theme.
    pub fn get(&self, theme: &str) -> Option<&[T]> {
        self.themes.get(theme).map(Vec::as_slice)
    }

    /// Iterates themes in order.
    pub fn themes(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.themes
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Iterates theme names in order.
    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Iterates all items in theme order, then item order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.themes.values().flatten()
    }

    /// Drops themes with no items, preserving the order of the rest.
    ///
    /// Returns the number of themes removed.
    pub fn drop_empty_themes(&mut self) -> usize {
        let before = self.themes.len();
        self.themes.retain(|_, items| !items.is_empty());
        before - self.themes.len()
    }

    /// Maps every item, keeping theme structure and order.
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> ThematicResult<U> {
        ThematicResult {
            themes: self
                .themes
                .into_iter()
                .map(|(name, items)| (name, items.into_iter().map(&mut f).collect()))
                .collect(),
        }
    }

    /// Consumes the result and returns the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, Vec<T>> {
        self.themes
    }
}

impl<T> FromIterator<(String, Vec<T>)> for ThematicResult<T> {
    /// Builds a result from `(theme, items)` pairs. Repeated theme names are
    /// merged into the first occurrence.
    fn from_iter<I: IntoIterator<Item = (String, Vec<T>)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (name, items) in iter {
            result.open_theme(&name);
            for item in items {
                result.push(&name, item);
            }
        }
        result
    }
}

/// Ordered list of exactly `N` strings (sketch prompts or sketch concepts).
///
/// The length invariant is established by the producer (the parsing engine
/// pads and truncates); this type only carries the list.
///
/// # Examples
///
/// ```
/// use ideagen_core::FlatResult;
///
/// let flat = FlatResult::new(vec!["a".into(), "b".into(), "c".into()]);
/// assert_eq!(flat.len(), 3);
/// assert_eq!(flat.get(1), Some("b"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatResult {
    items: Vec<String>,
}

impl FlatResult {
    /// Wraps a list of items.
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_inner(self) -> Vec<String> {
        self.items
    }
}

/// Persona describing a representative user of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl ItemText for Persona {
    fn headline(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&str> {
        Some(self.description.as_str()).filter(|d| !d.is_empty())
    }

    fn idea_text(&self) -> String {
        match self.detail() {
            Some(detail) => format!("Persona: {}. {}", self.name, detail),
            None => format!("Persona: {}", self.name),
        }
    }
}

/// A user segment with its persona and usage scenarios.
///
/// # Examples
///
/// ```
/// use ideagen_core::{Persona, UserSegment};
///
/// let segment = UserSegment::new("Commuters", Persona::new("Maria", "Night-shift nurse"))
///     .with_scenario("Waits for the last bus after a late shift");
/// assert_eq!(segment.scenarios.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSegment {
    /// Segment name.
    pub segment: String,
    pub persona: Persona,
    #[serde(default)]
    pub scenarios: Vec<String>,
}

impl UserSegment {
    pub fn new(segment: impl Into<String>, persona: Persona) -> Self {
        Self {
            segment: segment.into(),
            persona,
            scenarios: Vec::new(),
        }
    }

    /// Adds a scenario.
    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenarios.push(scenario.into());
        self
    }
}

/// Outcome of one image-generation request.
///
/// A failed request keeps its slot (aligned with its sketch prompt) and
/// records the error instead of a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOutcome {
    pub url: Option<String>,
    pub revised_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageOutcome {
    /// Creates a failed outcome.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            url: None,
            revised_prompt: None,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if the image was generated.
    pub fn is_success(&self) -> bool {
        self.url.is_some() && self.error.is_none()
    }
}
