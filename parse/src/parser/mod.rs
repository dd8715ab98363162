//! Response parser for free-form model output.
//!
//! Model replies follow no schema. Numbering styles vary (`1.`, `2)`, `•`,
//! `-`, bare text), theme headers may or may not carry the word "Theme",
//! and Markdown decoration comes and goes. This module recovers the nested
//! structure with one generic scanner:
//!
//! - [`classify`] tags each line as a theme header, an item start, a
//!   continuation, a blank or noise
//! - an [`ItemBuilder`](builders::ItemBuilder) turns the lines of one item
//!   into a statement, feature idea, layout idea or plain string
//! - [`ThemeAggregator`](aggregate::ThemeAggregator) groups finished items
//!   under the active theme in first-seen order
//! - [`fallback`] re-partitions a flat re-scan into synthetic themes, or
//!   falls back to canned content, when nothing was recovered
//!
//! Every entry point is total: any string, including `""`, yields a
//! non-empty result of the declared shape.
//!
//! The primary entry point is [`ResponseParser::new`] followed by
//! [`ResponseParser::parse`], but most consumers should use the typed
//! functions at the crate root such as
//! [`parse_statements`](crate::parse_statements).

pub mod builders;
pub mod classify;
mod aggregate;
mod context;
mod fallback;
mod flat;
mod normalize;
mod profiles;
mod statement;

use ideagen_core::{
    FeatureIdea, FlatResult, LayoutIdea, ResponseKind, Statement, ThematicResult, UserSegment,
};
use tracing::debug;

use crate::ParsedResponse;
use crate::report::FallbackStage;
use aggregate::ThemeAggregator;
use builders::ItemBuilder;
use classify::{ClassifierRules, LineClass, LineMode, classify_line};
use flat::FlatProfile;
use profiles::ThemeProfile;

pub use context::{DEFAULT_PERSONA_NAME, FLOOR_SEGMENT, IMPLICIT_SEGMENT, split_persona};
pub use flat::{SKETCH_CONCEPT_PLACEHOLDER, SKETCH_PROMPT_PLACEHOLDER};
pub use normalize::normalize_response;
pub use statement::normalize_statement;

/// Diagnostics for a single parse run.
#[derive(Debug, Clone, Default)]
pub struct ParseDiagnostics {
    /// Non-blank lines after normalization.
    pub relevant_lines: usize,
    /// Lines consumed as headers, item starts or continuations.
    pub recognized_lines: usize,
    /// Lines that had nowhere to go.
    pub unresolved_lines: Vec<String>,
    /// Items that were started but had no usable content.
    pub dropped_items: usize,
    /// Themes (or segments) that never received an item.
    pub dropped_themes: usize,
    pub fallback: FallbackStage,
}

impl ParseDiagnostics {
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.relevant_lines as f64
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.fallback {
            FallbackStage::None => {}
            FallbackStage::Repartitioned => warnings
                .push("No themes recognized; items were grouped into synthetic themes".to_string()),
            FallbackStage::Floor => {
                warnings.push("Nothing recoverable in response; using default content".to_string())
            }
            FallbackStage::Padded => {
                warnings.push("Fewer items than requested; padded with placeholders".to_string())
            }
            FallbackStage::Truncated => {
                warnings.push("More items than requested; extra items were dropped".to_string())
            }
        }

        if self.dropped_items > 0 {
            warnings.push(format!(
                "Dropped {} items with no usable content",
                self.dropped_items
            ));
        }
        if self.dropped_themes > 0 {
            warnings.push(format!("Dropped {} empty themes", self.dropped_themes));
        }
        if !self.unresolved_lines.is_empty() {
            warnings.push(format!(
                "Ignored {} lines outside any item",
                self.unresolved_lines.len()
            ));
        }

        warnings
    }
}

#[derive(Debug, Clone)]
pub(super) struct IndexedLine {
    pub(super) index: usize,
    pub(super) text: String,
}

/// Destination for finished items.
trait ItemSink<T> {
    fn open_theme(&mut self, name: &str);
    fn add_item(&mut self, item: T);
    /// Whether a bare line may start an item.
    fn has_active_theme(&self) -> bool;
}

impl<T> ItemSink<T> for ThemeAggregator<T> {
    fn open_theme(&mut self, name: &str) {
        ThemeAggregator::open_theme(self, name);
    }

    fn add_item(&mut self, item: T) {
        ThemeAggregator::add_item(self, item);
    }

    fn has_active_theme(&self) -> bool {
        ThemeAggregator::has_active_theme(self)
    }
}

/// Flat list. Behaves as if a theme were always open when bare lines may
/// start items, and as if none ever were otherwise.
struct FlatSink<T> {
    items: Vec<T>,
    bare_lines_start_items: bool,
}

impl<T> ItemSink<T> for FlatSink<T> {
    fn open_theme(&mut self, _name: &str) {}

    fn add_item(&mut self, item: T) {
        self.items.push(item);
    }

    fn has_active_theme(&self) -> bool {
        self.bare_lines_start_items
    }
}

/// The shared scanner: classifies each line and drives the builder and the
/// sink.
fn scan<B, S>(
    lines: &[IndexedLine],
    rules: &ClassifierRules,
    builder: &mut B,
    sink: &mut S,
    diagnostics: &mut ParseDiagnostics,
) where
    B: ItemBuilder,
    S: ItemSink<B::Item>,
{
    for line in lines {
        let mode = if builder.accepts_continuation() {
            LineMode::InItemBody
        } else if sink.has_active_theme() {
            LineMode::InTheme
        } else {
            LineMode::NoThemeYet
        };

        match classify_line(&line.text, mode, rules) {
            LineClass::Blank => flush(builder, sink, diagnostics),
            LineClass::ThemeHeader(name) => {
                flush(builder, sink, diagnostics);
                sink.open_theme(name);
                diagnostics.recognized_lines += 1;
            }
            LineClass::ItemStart(text) => {
                flush(builder, sink, diagnostics);
                builder.start_item(text);
                diagnostics.recognized_lines += 1;
                if !builder.accepts_continuation() {
                    flush(builder, sink, diagnostics);
                }
            }
            LineClass::ItemContinuation(text) => {
                builder.continue_item(text);
                diagnostics.recognized_lines += 1;
            }
            LineClass::Noise => {
                debug!(line = line.index + 1, "Line outside any item");
                diagnostics.unresolved_lines.push(line.text.clone());
            }
        }
    }

    flush(builder, sink, diagnostics);
}

fn flush<B, S>(builder: &mut B, sink: &mut S, diagnostics: &mut ParseDiagnostics)
where
    B: ItemBuilder,
    S: ItemSink<B::Item>,
{
    if !builder.is_open() {
        return;
    }
    match builder.finish_item() {
        Some(item) => sink.add_item(item),
        None => diagnostics.dropped_items += 1,
    }
}

/// Scans `lines` as a flat list with no theme headers.
pub(super) fn collect_flat<B: ItemBuilder>(
    lines: &[IndexedLine],
    rules: &ClassifierRules,
    mut builder: B,
    bare_lines_start_items: bool,
    diagnostics: &mut ParseDiagnostics,
) -> Vec<B::Item> {
    let mut sink = FlatSink {
        items: Vec::new(),
        bare_lines_start_items,
    };
    scan(lines, rules, &mut builder, &mut sink, diagnostics);
    sink.items
}

/// Themed scan followed by the fallback ladder.
fn parse_thematic<B: ItemBuilder>(
    lines: &[IndexedLine],
    profile: &ThemeProfile<B>,
    diagnostics: &mut ParseDiagnostics,
) -> ThematicResult<B::Item> {
    let mut builder = (profile.new_builder)();
    let mut aggregator = ThemeAggregator::new(profile.implicit_theme);
    scan(lines, &profile.rules, &mut builder, &mut aggregator, diagnostics);

    let (result, dropped_themes) = aggregator.finish();
    diagnostics.dropped_themes = dropped_themes;
    debug!(
        kind = %profile.kind,
        themes = result.theme_count(),
        items = result.item_count(),
        recognized = diagnostics.recognized_lines,
        "Themed scan finished"
    );
    if !result.is_empty() {
        return result;
    }

    // Stage 1: headers ignored, every line starts or continues an item
    let mut rescan = ParseDiagnostics::default();
    let items = collect_flat(
        lines,
        &profile.rules.without_headers(),
        (profile.new_builder)(),
        true,
        &mut rescan,
    );
    diagnostics.recognized_lines = rescan.recognized_lines;
    diagnostics.unresolved_lines = rescan.unresolved_lines;
    diagnostics.dropped_items = rescan.dropped_items;

    if !items.is_empty() {
        debug!(kind = %profile.kind, items = items.len(), "Re-partitioning flat items into synthetic themes");
        diagnostics.fallback = FallbackStage::Repartitioned;
        return fallback::repartition(items, profile.chunk_size, profile.chunk_themes);
    }

    debug!(kind = %profile.kind, "Nothing recoverable; using floor content");
    diagnostics.fallback = FallbackStage::Floor;
    fallback::floor(profile.floor_theme, (profile.floor_items)())
}

fn parse_flat(
    lines: &[IndexedLine],
    profile: &FlatProfile,
    count: usize,
    diagnostics: &mut ParseDiagnostics,
) -> FlatResult {
    let items = collect_flat(
        lines,
        &ClassifierRules::FLAT,
        (profile.new_builder)(),
        profile.bare_lines_start_items,
        diagnostics,
    );
    let recovered = items.len();
    let (result, stage) = fallback::fit_flat(items, count, profile.placeholder);
    diagnostics.fallback = stage;
    debug!(kind = %profile.kind, recovered, count, fallback = %stage, "Flat scan finished");
    result
}

fn parse_context(lines: &[IndexedLine], diagnostics: &mut ParseDiagnostics) -> Vec<UserSegment> {
    let segments = context::parse_segments(lines, diagnostics);
    debug!(
        segments = segments.len(),
        fallback = %diagnostics.fallback,
        "User context scan finished"
    );
    segments
}

/// Normalizes `raw` into lines and seeds the diagnostics for a run.
fn prepare(raw: &str) -> (Vec<IndexedLine>, ParseDiagnostics) {
    let normalized = normalize::normalize_response(raw);
    let lines = normalize::to_indexed_lines(&normalized);
    let diagnostics = ParseDiagnostics {
        relevant_lines: lines.iter().filter(|line| !line.text.is_empty()).count(),
        ..ParseDiagnostics::default()
    };
    (lines, diagnostics)
}

pub(crate) fn statements(raw: &str) -> ThematicResult<Statement> {
    let (lines, mut diagnostics) = prepare(raw);
    parse_thematic(&lines, &profiles::STATEMENTS, &mut diagnostics)
}

pub(crate) fn feature_ideas(raw: &str) -> ThematicResult<FeatureIdea> {
    let (lines, mut diagnostics) = prepare(raw);
    parse_thematic(&lines, &profiles::FEATURES, &mut diagnostics)
}

pub(crate) fn layout_ideas(raw: &str) -> ThematicResult<LayoutIdea> {
    let (lines, mut diagnostics) = prepare(raw);
    parse_thematic(&lines, &profiles::LAYOUTS, &mut diagnostics)
}

pub(crate) fn sketch_prompts(raw: &str, count: usize) -> FlatResult {
    let (lines, mut diagnostics) = prepare(raw);
    parse_flat(&lines, &flat::SKETCH_PROMPTS, count, &mut diagnostics)
}

pub(crate) fn sketch_concepts(raw: &str, count: usize) -> FlatResult {
    let (lines, mut diagnostics) = prepare(raw);
    parse_flat(&lines, &flat::SKETCH_CONCEPTS, count, &mut diagnostics)
}

pub(crate) fn user_context(raw: &str) -> Vec<UserSegment> {
    let (lines, mut diagnostics) = prepare(raw);
    parse_context(&lines, &mut diagnostics)
}

/// Parser for one raw model response.
pub struct ResponseParser {
    kind: ResponseKind,
    raw_output: String,
    sketch_count: usize,
    diagnostics: ParseDiagnostics,
}

impl ResponseParser {
    /// Creates a parser for a response of the given kind. `sketch_count` is
    /// the exact length of flat results and is ignored by themed kinds.
    pub fn new(kind: ResponseKind, raw_output: &str, sketch_count: usize) -> Self {
        Self {
            kind,
            raw_output: raw_output.to_string(),
            sketch_count,
            diagnostics: ParseDiagnostics::default(),
        }
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Parses the response. Never fails; degraded input is reported through
    /// [`diagnostics`](Self::diagnostics).
    pub fn parse(&mut self) -> ParsedResponse {
        let (lines, diagnostics) = prepare(&self.raw_output);
        self.diagnostics = diagnostics;
        let diagnostics = &mut self.diagnostics;

        match self.kind {
            ResponseKind::Statements => ParsedResponse::Statements(parse_thematic(
                &lines,
                &profiles::STATEMENTS,
                diagnostics,
            )),
            ResponseKind::FeatureIdeas => ParsedResponse::FeatureIdeas(parse_thematic(
                &lines,
                &profiles::FEATURES,
                diagnostics,
            )),
            ResponseKind::LayoutIdeas => ParsedResponse::LayoutIdeas(parse_thematic(
                &lines,
                &profiles::LAYOUTS,
                diagnostics,
            )),
            ResponseKind::SketchPrompts => ParsedResponse::SketchPrompts(parse_flat(
                &lines,
                &flat::SKETCH_PROMPTS,
                self.sketch_count,
                diagnostics,
            )),
            ResponseKind::SketchConcepts => ParsedResponse::SketchConcepts(parse_flat(
                &lines,
                &flat::SKETCH_CONCEPTS,
                self.sketch_count,
                diagnostics,
            )),
            ResponseKind::UserContext => {
                ParsedResponse::UserContext(parse_context(&lines, diagnostics))
            }
        }
    }

    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }

    pub fn warnings(&self) -> Vec<String> {
        self.diagnostics.warnings()
    }
}
