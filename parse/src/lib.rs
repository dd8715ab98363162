//! Response-to-structure parsing for model output.
//!
//! This crate turns the loosely formatted text a text-completion model
//! returns into the typed results defined in [`ideagen_core`]. Every
//! function here is total: any input, including the empty string, yields a
//! non-empty, well-formed result. Degraded input is reported, never raised.
//!
//! # Main entry points
//!
//! - [`parse_statements`], [`parse_feature_ideas`], [`parse_layout_ideas`]
//!   return an ordered theme → items mapping.
//! - [`parse_sketch_prompts`], [`parse_sketch_concepts`] return a list of
//!   exactly `n` strings.
//! - [`parse_user_context`] returns user segments with personas.
//! - [`parse_response_with_report`] parses any kind and adds a
//!   [`ParseReport`] with coverage and fallback details.
//!
//! # Example
//!
//! ```
//! use ideagen_parse::parse_statements;
//!
//! let raw = "\
//! Theme 1: Access
//! 1. reduce wait times
//! 2. improve shelter
//! Theme 2: Safety
//! 1. better lighting";
//!
//! let result = parse_statements(raw);
//! assert_eq!(result.theme_names().collect::<Vec<_>>(), vec!["Access", "Safety"]);
//! assert_eq!(result.get("Safety").unwrap()[0], "How might we better lighting");
//! ```

pub mod output;
pub mod parser;
pub mod report;

use ideagen_core::{
    FeatureIdea, FlatResult, LayoutIdea, ResponseKind, Statement, ThematicResult, UserSegment,
};
use parser::ResponseParser;
use report::ParseReport;
use serde::Serialize;

/// Result of parsing one response of any kind. Serializes as the bare
/// result; the variant is not recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedResponse {
    Statements(ThematicResult<Statement>),
    FeatureIdeas(ThematicResult<FeatureIdea>),
    LayoutIdeas(ThematicResult<LayoutIdea>),
    SketchPrompts(FlatResult),
    SketchConcepts(FlatResult),
    UserContext(Vec<UserSegment>),
}

impl ParsedResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::Statements(_) => ResponseKind::Statements,
            Self::FeatureIdeas(_) => ResponseKind::FeatureIdeas,
            Self::LayoutIdeas(_) => ResponseKind::LayoutIdeas,
            Self::SketchPrompts(_) => ResponseKind::SketchPrompts,
            Self::SketchConcepts(_) => ResponseKind::SketchConcepts,
            Self::UserContext(_) => ResponseKind::UserContext,
        }
    }

    /// Number of themes (segments for user context, zero for flat lists).
    pub fn theme_count(&self) -> usize {
        match self {
            Self::Statements(result) => result.theme_count(),
            Self::FeatureIdeas(result) => result.theme_count(),
            Self::LayoutIdeas(result) => result.theme_count(),
            Self::SketchPrompts(_) | Self::SketchConcepts(_) => 0,
            Self::UserContext(segments) => segments.len(),
        }
    }

    /// Number of items (scenarios for user context).
    pub fn item_count(&self) -> usize {
        match self {
            Self::Statements(result) => result.item_count(),
            Self::FeatureIdeas(result) => result.item_count(),
            Self::LayoutIdeas(result) => result.item_count(),
            Self::SketchPrompts(result) | Self::SketchConcepts(result) => result.len(),
            Self::UserContext(segments) => segments.iter().map(|s| s.scenarios.len()).sum(),
        }
    }
}

/// A parse result together with its report.
#[derive(Debug, Clone)]
pub struct ParseRun {
    pub result: ParsedResponse,
    pub report: ParseReport,
}

/// Parses reframed "How might we" statements grouped by theme.
///
/// Every statement starts with "How might we". Without theme headers,
/// statements land in "Reframing" (and, past four, "Exploration" and
/// "Innovation"); with nothing recoverable, a fixed "Design Exploration"
/// theme is returned.
///
/// # Examples
///
/// ```
/// use ideagen_parse::parse_statements;
///
/// let result = parse_statements("");
/// assert_eq!(result.theme_names().collect::<Vec<_>>(), vec!["Design Exploration"]);
/// assert_eq!(result.item_count(), 3);
/// ```
pub fn parse_statements(raw: &str) -> ThematicResult<Statement> {
    parser::statements(raw)
}

/// Parses feature ideas (`feature` + `rationale`) grouped by theme.
pub fn parse_feature_ideas(raw: &str) -> ThematicResult<FeatureIdea> {
    parser::feature_ideas(raw)
}

/// Parses layout ideas (`title` + multi-line `description`) grouped by
/// theme.
///
/// # Examples
///
/// ```
/// use ideagen_parse::parse_layout_ideas;
///
/// let raw = "1. Card Layout\nA responsive grid of cards.\n\n2. List Layout\nA vertical scroll list.";
/// let result = parse_layout_ideas(raw);
/// let layouts = result.get("Information Architecture").unwrap();
/// assert_eq!(layouts[1].title, "List Layout");
/// assert_eq!(layouts[1].description, "A vertical scroll list.");
/// ```
pub fn parse_layout_ideas(raw: &str) -> ThematicResult<LayoutIdea> {
    parser::layout_ideas(raw)
}

/// Parses exactly `n` sketch prompts, one per numbered or bulleted line.
///
/// # Examples
///
/// ```
/// use ideagen_parse::parse_sketch_prompts;
///
/// let result = parse_sketch_prompts("1. A kiosk\n2. A map", 3);
/// assert_eq!(result.len(), 3);
/// assert_eq!(result.get(0), Some("A kiosk"));
/// ```
pub fn parse_sketch_prompts(raw: &str, n: usize) -> FlatResult {
    parser::sketch_prompts(raw, n)
}

/// Parses exactly `n` sketch concept explanations. Explanations may span
/// several lines.
pub fn parse_sketch_concepts(raw: &str, n: usize) -> FlatResult {
    parser::sketch_concepts(raw, n)
}

/// Parses user segments with personas and scenarios. Never empty.
pub fn parse_user_context(raw: &str) -> Vec<UserSegment> {
    parser::user_context(raw)
}

/// Parses a response of the given kind. `sketch_count` applies to flat
/// kinds only.
pub fn parse_response(kind: ResponseKind, raw: &str, sketch_count: usize) -> ParsedResponse {
    ResponseParser::new(kind, raw, sketch_count).parse()
}

/// Parses a response and reports how it went.
///
/// # Examples
///
/// ```
/// use ideagen_core::ResponseKind;
/// use ideagen_parse::{parse_response_with_report, report::FallbackStage};
///
/// let run = parse_response_with_report(ResponseKind::SketchPrompts, "1. A kiosk", 3);
/// assert_eq!(run.report.fallback, FallbackStage::Padded);
/// assert_eq!(run.report.item_count, 3);
/// ```
pub fn parse_response_with_report(kind: ResponseKind, raw: &str, sketch_count: usize) -> ParseRun {
    let mut parser = ResponseParser::new(kind, raw, sketch_count);
    let result = parser.parse();
    let diagnostics = parser.diagnostics().clone();
    let warnings = diagnostics.warnings();

    let report = ParseReport {
        kind,
        fallback: diagnostics.fallback,
        theme_count: result.theme_count(),
        item_count: result.item_count(),
        coverage: diagnostics.coverage(),
        relevant_lines: diagnostics.relevant_lines,
        recognized_lines: diagnostics.recognized_lines,
        unresolved_lines: diagnostics.unresolved_lines,
        dropped_items: diagnostics.dropped_items,
        dropped_themes: diagnostics.dropped_themes,
        warnings,
    };

    ParseRun { result, report }
}
