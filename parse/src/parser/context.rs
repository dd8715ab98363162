//! User context (segments, personas and scenarios).
//!
//! Segment headers reuse the theme-header rules with their own tokens. Inside
//! a segment, `Persona:` and `Scenario:` labels pick the field that following
//! lines extend:
//!
//! ```text
//! Segment 1: Night-shift Commuters
//! Persona: Maria - a nurse who rides home after midnight
//! Scenarios:
//! - Checks when the next bus arrives before leaving the ward
//! - Waits at a poorly lit stop
//! ```

use ideagen_core::{Persona, UserSegment};
use tracing::debug;

use super::builders::TextBuilder;
use super::classify::{
    ClassifierRules, starts_with_ignore_case, strip_item_marker, strip_token, theme_header,
};
use super::{IndexedLine, ParseDiagnostics, collect_flat};
use crate::report::FallbackStage;

pub const CONTEXT_RULES: ClassifierRules = ClassifierRules {
    header_tokens: &["user segment", "segment", "audience", "theme"],
    detect_headers: true,
    statement_markers: false,
};

/// Segment opened when content appears before any header.
pub const IMPLICIT_SEGMENT: &str = "Primary Users";

/// Persona name used when a segment never names one.
pub const DEFAULT_PERSONA_NAME: &str = "User";

pub const FLOOR_SEGMENT: &str = "General Audience";

/// Separators between a persona's name and its description, first match
/// wins by position.
const PERSONA_SEPARATORS: [&str; 4] = [" - ", " – ", ": ", ". "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// Just after a header; bare lines become scenarios.
    Start,
    PersonaDescription,
    Scenario,
    /// After a bare `Scenarios:` label; every line is a new scenario.
    ScenarioList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label<'a> {
    Persona(&'a str),
    Scenario(&'a str),
    ScenarioList,
}

#[derive(Debug)]
struct SegmentDraft {
    name: String,
    persona: Option<Persona>,
    scenarios: Vec<String>,
}

impl SegmentDraft {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            persona: None,
            scenarios: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.persona.is_none() && self.scenarios.is_empty()
    }

    fn into_segment(self) -> UserSegment {
        let persona = self
            .persona
            .unwrap_or_else(|| Persona::new(DEFAULT_PERSONA_NAME, ""));
        UserSegment {
            segment: self.name,
            persona,
            scenarios: self.scenarios,
        }
    }
}

/// Accumulates segments in first-seen order. Repeated headers re-open the
/// earlier segment.
#[derive(Debug, Default)]
struct SegmentAggregator {
    drafts: Vec<SegmentDraft>,
    active: Option<usize>,
    field: Option<Field>,
}

impl SegmentAggregator {
    fn open_segment(&mut self, name: &str) {
        let index = match self.drafts.iter().position(|draft| draft.name == name) {
            Some(index) => index,
            None => {
                self.drafts.push(SegmentDraft::new(name));
                self.drafts.len() - 1
            }
        };
        self.active = Some(index);
        self.field = Some(Field::Start);
    }

    fn active_draft(&mut self) -> &mut SegmentDraft {
        if self.active.is_none() {
            self.open_segment(IMPLICIT_SEGMENT);
        }
        let index = self.active.unwrap_or_default();
        &mut self.drafts[index]
    }

    fn set_persona(&mut self, text: &str) {
        let persona = split_persona(text);
        self.active_draft().persona = Some(persona);
        self.field = Some(Field::PersonaDescription);
    }

    fn add_scenario(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.active_draft().scenarios.push(text.to_string());
        self.field = Some(Field::Scenario);
    }

    fn scenario_list(&mut self) {
        self.active_draft();
        self.field = Some(Field::ScenarioList);
    }

    /// Routes an unlabelled, unmarked line. Returns `false` when it has
    /// nowhere to go.
    fn bare_line(&mut self, text: &str) -> bool {
        match self.field {
            None => false,
            Some(Field::PersonaDescription) => {
                if let Some(persona) = self.active_draft().persona.as_mut() {
                    append(&mut persona.description, text);
                }
                true
            }
            Some(Field::Scenario) => {
                if let Some(last) = self.active_draft().scenarios.last_mut() {
                    append(last, text);
                }
                true
            }
            Some(Field::Start) | Some(Field::ScenarioList) => {
                self.active_draft().scenarios.push(text.to_string());
                if self.field == Some(Field::Start) {
                    self.field = Some(Field::Scenario);
                }
                true
            }
        }
    }

    /// Returns finished segments and the number of empty ones dropped.
    fn finish(self) -> (Vec<UserSegment>, usize) {
        let total = self.drafts.len();
        let segments: Vec<UserSegment> = self
            .drafts
            .into_iter()
            .filter(|draft| !draft.is_empty())
            .map(SegmentDraft::into_segment)
            .collect();
        let dropped = total - segments.len();
        (segments, dropped)
    }
}

fn append(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Splits `Maria - a night-shift nurse` into name and description.
pub fn split_persona(text: &str) -> Persona {
    let split = PERSONA_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|at| (at, sep.len())))
        .min_by_key(|(at, _)| *at);

    match split {
        Some((at, len)) => {
            let name = text[..at].trim();
            let description = text[at + len..].trim();
            if name.is_empty() {
                Persona::new(DEFAULT_PERSONA_NAME, description)
            } else {
                Persona::new(name, description)
            }
        }
        None if text.trim().is_empty() => Persona::new(DEFAULT_PERSONA_NAME, ""),
        None => Persona::new(text.trim(), ""),
    }
}

fn labelled<'a>(text: &'a str, token: &str) -> Option<&'a str> {
    let rest = strip_token(text, token)?.trim_start();
    let rest = rest.trim_start_matches(|ch: char| ch.is_ascii_digit()).trim_start();
    rest.strip_prefix(':').map(str::trim)
}

fn label(text: &str) -> Option<Label<'_>> {
    if let Some(rest) = labelled(text, "persona") {
        return Some(Label::Persona(rest));
    }
    if let Some(rest) = labelled(text, "scenarios") {
        return Some(if rest.is_empty() {
            Label::ScenarioList
        } else {
            Label::Scenario(rest)
        });
    }
    if let Some(rest) = labelled(text, "scenario") {
        return Some(if rest.is_empty() {
            Label::ScenarioList
        } else {
            Label::Scenario(rest)
        });
    }
    None
}

/// Explicit segment header on a numbered or bulleted line
/// (`1. Segment: Commuters`). The heuristic header rule never applies to
/// marker lines.
fn marked_header(text: &str) -> Option<&str> {
    let explicit = CONTEXT_RULES
        .header_tokens
        .iter()
        .any(|token| starts_with_ignore_case(text, token));
    if !explicit {
        return None;
    }
    theme_header(text, &CONTEXT_RULES)
}

/// Parses user segments from normalized lines. Never returns an empty list.
pub fn parse_segments(lines: &[IndexedLine], diagnostics: &mut ParseDiagnostics) -> Vec<UserSegment> {
    let mut aggregator = SegmentAggregator::default();

    for line in lines {
        let text = line.text.as_str();
        if text.is_empty() {
            continue;
        }

        let marked = strip_item_marker(text, false);
        let body = marked.unwrap_or(text);

        let handled = if let Some(label) = label(body) {
            match label {
                Label::Persona(rest) => aggregator.set_persona(rest),
                Label::Scenario(rest) => aggregator.add_scenario(rest),
                Label::ScenarioList => aggregator.scenario_list(),
            }
            true
        } else if let Some(name) = match marked {
            Some(rest) => marked_header(rest),
            None => theme_header(text, &CONTEXT_RULES),
        } {
            aggregator.open_segment(name);
            true
        } else if marked.is_some() {
            aggregator.add_scenario(body);
            true
        } else {
            aggregator.bare_line(body)
        };

        if handled {
            diagnostics.recognized_lines += 1;
        } else {
            diagnostics.unresolved_lines.push(line.text.clone());
        }
    }

    let (segments, dropped) = aggregator.finish();
    diagnostics.dropped_themes += dropped;
    if !segments.is_empty() {
        return segments;
    }

    let mut rescan = ParseDiagnostics::default();
    let scenarios = collect_flat(
        lines,
        &ClassifierRules::FLAT,
        TextBuilder::multi_line(),
        true,
        &mut rescan,
    );

    if !scenarios.is_empty() {
        debug!(
            scenarios = scenarios.len(),
            "no segments recovered; collecting lines as scenarios"
        );
        diagnostics.fallback = FallbackStage::Repartitioned;
        let mut segment = UserSegment::new(IMPLICIT_SEGMENT, Persona::new(DEFAULT_PERSONA_NAME, ""));
        segment.scenarios = scenarios;
        return vec![segment];
    }

    debug!("no user context recovered; using floor segment");
    diagnostics.fallback = FallbackStage::Floor;
    vec![floor_segment()]
}

fn floor_segment() -> UserSegment {
    UserSegment::new(
        FLOOR_SEGMENT,
        Persona::new(
            "Everyday User",
            "A typical person affected by the design challenge.",
        ),
    )
    .with_scenario("Encounters the problem during an ordinary day and looks for a better way.")
}
