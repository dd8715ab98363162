//! Per-kind constants for the themed scanner and its fallback ladder.

use ideagen_core::{FeatureIdea, LayoutIdea, ResponseKind, Statement};

use super::builders::{FeatureBuilder, ItemBuilder, LayoutBuilder, StatementBuilder};
use super::classify::ClassifierRules;

/// Everything that distinguishes one themed response kind from another.
pub struct ThemeProfile<B: ItemBuilder> {
    pub kind: ResponseKind,
    pub rules: ClassifierRules,
    pub new_builder: fn() -> B,
    /// Theme opened when an item completes before any header.
    pub implicit_theme: &'static str,
    /// Items per synthetic theme when re-partitioning a flat list. The last
    /// theme takes everything that remains.
    pub chunk_size: usize,
    pub chunk_themes: [&'static str; 3],
    /// Theme holding the canned content of the last-resort floor.
    pub floor_theme: &'static str,
    pub floor_items: fn() -> Vec<B::Item>,
}

const THEME_TOKENS: &[&str] = &["theme"];

pub const STATEMENTS: ThemeProfile<StatementBuilder> = ThemeProfile {
    kind: ResponseKind::Statements,
    rules: ClassifierRules {
        header_tokens: THEME_TOKENS,
        detect_headers: true,
        statement_markers: true,
    },
    new_builder: StatementBuilder::default,
    implicit_theme: "Reframing",
    chunk_size: 4,
    chunk_themes: ["Reframing", "Exploration", "Innovation"],
    floor_theme: "Design Exploration",
    floor_items: statement_floor,
};

pub const FEATURES: ThemeProfile<FeatureBuilder> = ThemeProfile {
    kind: ResponseKind::FeatureIdeas,
    rules: ClassifierRules {
        header_tokens: THEME_TOKENS,
        detect_headers: true,
        statement_markers: false,
    },
    new_builder: FeatureBuilder::default,
    implicit_theme: "Core Features",
    chunk_size: 3,
    chunk_themes: ["Core Features", "Supporting Features", "Experimental Features"],
    floor_theme: "Feature Directions",
    floor_items: feature_floor,
};

pub const LAYOUTS: ThemeProfile<LayoutBuilder> = ThemeProfile {
    kind: ResponseKind::LayoutIdeas,
    rules: ClassifierRules {
        header_tokens: THEME_TOKENS,
        detect_headers: true,
        statement_markers: false,
    },
    new_builder: LayoutBuilder::default,
    implicit_theme: "Information Architecture",
    chunk_size: 3,
    chunk_themes: [
        "Information Architecture",
        "Interaction Patterns",
        "Content Strategy",
    ],
    floor_theme: "Layout Directions",
    floor_items: layout_floor,
};

fn statement_floor() -> Vec<Statement> {
    [
        "How might we approach this challenge from a user-centered perspective?",
        "How might we leverage technology to solve this problem?",
        "How might we create sustainable solutions for this challenge?",
    ]
    .into_iter()
    .map(Statement::new)
    .collect()
}

fn feature_floor() -> Vec<FeatureIdea> {
    vec![
        FeatureIdea::new(
            "Guided onboarding",
            "Helps new users understand the core value quickly.",
        ),
        FeatureIdea::new(
            "Personalized dashboard",
            "Surfaces the information each user needs most.",
        ),
        FeatureIdea::new(
            "Feedback loop",
            "Lets users report problems and suggest improvements.",
        ),
    ]
}

fn layout_floor() -> Vec<LayoutIdea> {
    (1..=3)
        .map(|n| LayoutIdea::new(format!("Layout {n}"), format!("Description {n}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_items_are_non_empty() {
        assert_eq!((STATEMENTS.floor_items)().len(), 3);
        assert_eq!((FEATURES.floor_items)().len(), 3);
        assert_eq!((LAYOUTS.floor_items)()[2], LayoutIdea::new("Layout 3", "Description 3"));
    }

    #[test]
    fn test_statement_floor_is_canonical() {
        assert!((STATEMENTS.floor_items)()
            .iter()
            .all(Statement::has_canonical_lead_in));
    }

    #[test]
    fn test_implicit_theme_is_first_chunk_theme() {
        assert_eq!(STATEMENTS.implicit_theme, STATEMENTS.chunk_themes[0]);
        assert_eq!(FEATURES.implicit_theme, FEATURES.chunk_themes[0]);
        assert_eq!(LAYOUTS.implicit_theme, LAYOUTS.chunk_themes[0]);
    }
}
