//! Flat-list variant for sketch prompts and sketch concepts.

use ideagen_core::ResponseKind;

use super::builders::TextBuilder;

/// Placeholder for a missing sketch prompt.
pub const SKETCH_PROMPT_PLACEHOLDER: &str =
    "Concept sketch exploring a possible solution to the design challenge";

/// Placeholder for a missing sketch concept explanation.
pub const SKETCH_CONCEPT_PLACEHOLDER: &str =
    "This sketch explores a design approach for addressing the challenge.";

/// Constants for one flat response kind.
pub struct FlatProfile {
    pub kind: ResponseKind,
    /// When `false`, only marker lines start items and preamble prose is
    /// ignored. When `true`, a bare line with no open item starts one.
    pub bare_lines_start_items: bool,
    pub new_builder: fn() -> TextBuilder,
    pub placeholder: &'static str,
}

/// One prompt per marker line.
pub const SKETCH_PROMPTS: FlatProfile = FlatProfile {
    kind: ResponseKind::SketchPrompts,
    bare_lines_start_items: false,
    new_builder: TextBuilder::single_line,
    placeholder: SKETCH_PROMPT_PLACEHOLDER,
};

/// Explanations may be unnumbered and may span several lines.
pub const SKETCH_CONCEPTS: FlatProfile = FlatProfile {
    kind: ResponseKind::SketchConcepts,
    bare_lines_start_items: true,
    new_builder: TextBuilder::multi_line,
    placeholder: SKETCH_CONCEPT_PLACEHOLDER,
};
