//! Result and bundle validation.
//!
//! Checks the structural invariants of parsed results before they are
//! stored or exported: themed results are never empty, no theme is empty,
//! no item is blank, and flat results have exactly the expected length.
//!
//! # Examples
//!
//! ```
//! use ideagen_core::*;
//!
//! let mut result = ThematicResult::new();
//! result.push("Access", Statement::new("How might we reduce wait times"));
//! assert!(validate_thematic(ResponseKind::Statements, &result).is_empty());
//!
//! // An empty themed result violates the non-emptiness floor
//! let empty: ThematicResult<Statement> = ThematicResult::new();
//! assert!(!validate_thematic(ResponseKind::Statements, &empty).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{FlatResult, IdeaBundle, ItemText, ResponseKind, ThematicResult, UserSegment};

/// Result/bundle validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Bundle challenge text is empty or whitespace-only.
    #[error("bundle challenge cannot be empty")]
    EmptyChallenge,
    /// A result that must contain at least one theme has none.
    #[error("{0} result has no themes")]
    EmptyResult(ResponseKind),
    /// A theme name is empty or whitespace-only.
    #[error("{0} result contains an unnamed theme")]
    EmptyThemeName(ResponseKind),
    /// A theme is present but holds no items.
    #[error("theme has no items: {0}")]
    EmptyTheme(String),
    /// An item has no usable content.
    #[error("blank item in theme: {0}")]
    BlankItem(String),
    /// A flat result does not have the expected number of items.
    #[error("{kind} has {actual} items, expected {expected}")]
    FlatLength {
        kind: ResponseKind,
        expected: usize,
        actual: usize,
    },
    /// Two user segments share a name.
    #[error("duplicate user segment: {0}")]
    DuplicateSegment(String),
    /// A user segment has an empty name or persona name.
    #[error("user segment is missing a name or persona")]
    IncompleteSegment,
    /// More image outcomes than sketch prompts.
    #[error("{images} image outcomes for {prompts} sketch prompts")]
    ImageCountMismatch { images: usize, prompts: usize },
}

/// Validates a themed result.
///
/// Checks that at least one theme exists, that every theme is named and
/// non-empty, and that no item is blank.
pub fn validate_thematic<T: ItemText>(
    kind: ResponseKind,
    result: &ThematicResult<T>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if result.is_empty() {
        errors.push(ValidationError::EmptyResult(kind));
        return errors;
    }

    for (theme, items) in result.themes() {
        if theme.trim().is_empty() {
            errors.push(ValidationError::EmptyThemeName(kind));
        }
        if items.is_empty() {
            errors.push(ValidationError::EmptyTheme(theme.to_string()));
        }
        if items.iter().any(ItemText::is_blank) {
            errors.push(ValidationError::BlankItem(theme.to_string()));
        }
    }

    errors
}

/// Validates that a flat result has exactly `expected` non-blank items.
///
/// # Examples
///
/// ```
/// use ideagen_core::*;
///
/// let flat = FlatResult::new(vec!["a".into(), "b".into()]);
/// let errors = validate_flat(ResponseKind::SketchPrompts, &flat, 3);
/// assert!(matches!(errors[0], ValidationError::FlatLength { expected: 3, actual: 2, .. }));
/// ```
pub fn validate_flat(
    kind: ResponseKind,
    result: &FlatResult,
    expected: usize,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if result.len() != expected {
        errors.push(ValidationError::FlatLength {
            kind,
            expected,
            actual: result.len(),
        });
    }
    if result.iter().any(|item| item.trim().is_empty()) {
        errors.push(ValidationError::BlankItem(kind.label().to_string()));
    }

    errors
}

/// Validates a list of user segments.
pub fn validate_user_context(segments: &[UserSegment]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if segments.is_empty() {
        errors.push(ValidationError::EmptyResult(ResponseKind::UserContext));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for segment in segments {
        if segment.segment.trim().is_empty() || segment.persona.name.trim().is_empty() {
            errors.push(ValidationError::IncompleteSegment);
            continue;
        }
        if !seen.insert(segment.segment.as_str()) {
            errors.push(ValidationError::DuplicateSegment(segment.segment.clone()));
        }
    }

    errors
}

/// Validates a full bundle.
///
/// Statements, layouts and sketch prompts are required. Feature ideas and
/// user context are optional in a bundle (their requests may have degraded
/// to empty) and are only validated when present. Sketch concepts must align
/// with the sketch prompts.
///
/// # Examples
///
/// ```
/// use ideagen_core::*;
///
/// let mut bundle = IdeaBundle::new("Safer bus stops", "2024-01-01T00:00:00Z");
/// bundle.statements.push("Safety", Statement::new("How might we add light"));
/// bundle.layouts.push("Maps", LayoutIdea::new("Map first", ""));
/// bundle.sketch_prompts = FlatResult::new(vec!["a".into(), "b".into(), "c".into()]);
/// bundle.sketch_concepts = FlatResult::new(vec!["x".into(), "y".into(), "z".into()]);
/// assert!(validate_bundle(&bundle, 3).is_empty());
/// ```
pub fn validate_bundle(bundle: &IdeaBundle, sketch_count: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if bundle.challenge.trim().is_empty() {
        errors.push(ValidationError::EmptyChallenge);
        return errors;
    }

    errors.extend(validate_thematic(ResponseKind::Statements, &bundle.statements));
    errors.extend(validate_thematic(ResponseKind::LayoutIdeas, &bundle.layouts));
    if !bundle.feature_ideas.is_empty() {
        errors.extend(validate_thematic(
            ResponseKind::FeatureIdeas,
            &bundle.feature_ideas,
        ));
    }
    errors.extend(validate_flat(
        ResponseKind::SketchPrompts,
        &bundle.sketch_prompts,
        sketch_count,
    ));
    errors.extend(validate_flat(
        ResponseKind::SketchConcepts,
        &bundle.sketch_concepts,
        bundle.sketch_prompts.len(),
    ));
    if bundle.images.len() > bundle.sketch_prompts.len() {
        errors.push(ValidationError::ImageCountMismatch {
            images: bundle.images.len(),
            prompts: bundle.sketch_prompts.len(),
        });
    }
    if !bundle.user_context.is_empty() {
        errors.extend(validate_user_context(&bundle.user_context));
    }

    errors
}
