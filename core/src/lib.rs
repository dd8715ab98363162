//! Core result types and shared bundle primitives.
//!
//! This crate defines the data model for structured ideation output
//! recovered from free-form model responses:
//!
//! - [`Statement`]: a reframed "How might we" problem statement.
//! - [`FeatureIdea`]: a feature name with its rationale.
//! - [`LayoutIdea`]: a layout title with its description.
//! - [`ThematicResult`]: an ordered theme → items mapping.
//! - [`FlatResult`]: an ordered list of exactly N strings.
//! - [`UserSegment`]: a user segment with persona and scenarios.
//! - [`IdeaBundle`]: everything produced by one generation run.
//!
//! Validation ([`validate_thematic`], [`validate_flat`],
//! [`validate_bundle`]) catches structural problems such as empty themes,
//! blank items and misaligned sketch lists.
//!
//! # Example
//!
//! ```
//! use ideagen_core::*;
//!
//! let mut statements = ThematicResult::new();
//! statements.push("Access", Statement::new("How might we reduce wait times"));
//! statements.push("Safety", Statement::new("How might we better lighting"));
//!
//! assert_eq!(statements.theme_count(), 2);
//! assert!(validate_thematic(ResponseKind::Statements, &statements).is_empty());
//! ```

mod bundle;
mod types;
mod validate;

pub use bundle::IdeaBundle;
pub use types::*;
pub use validate::{
    ValidationError, validate_bundle, validate_flat, validate_thematic, validate_user_context,
};
