//! Output formatting for parse results, reports and bundles.

use ideagen_core::{FlatResult, IdeaBundle, ItemText, ThematicResult, UserSegment};

use crate::ParsedResponse;
use crate::report::ParseReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a parse result in the requested output format.
pub fn format_response(result: &ParsedResponse, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(result).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(response_to_markdown(result)),
        OutputFormat::Table => Ok(response_to_table(result)),
    }
}

/// Formats a parse report in the requested output format.
pub fn format_report(report: &ParseReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats a whole bundle. Markdown output is the same document as
/// [`export_markdown`].
pub fn format_bundle(bundle: &IdeaBundle, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(bundle)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(bundle).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(export_markdown(bundle)),
        OutputFormat::Table => Ok(bundle_to_table(bundle)),
    }
}

/// Renders the plain-text export of a generation run.
///
/// # Examples
///
/// ```
/// use ideagen_core::{IdeaBundle, Statement};
/// use ideagen_parse::output::export_markdown;
///
/// let mut bundle = IdeaBundle::new("Safer bus stops", "2024-01-01T00:00:00Z");
/// bundle.statements.push("Safety", Statement::new("How might we add light"));
///
/// let text = export_markdown(&bundle);
/// assert!(text.starts_with("# Idea Generator Results"));
/// assert!(text.contains("- How might we add light"));
/// ```
pub fn export_markdown(bundle: &IdeaBundle) -> String {
    let mut out = String::new();

    out.push_str("# Idea Generator Results\n\n");
    out.push_str("## Design Challenge\n\n");
    out.push_str(&format!("{}\n\n", bundle.challenge));

    if let Some(ref refinement) = bundle.refinement {
        out.push_str(&format!("**Refined from:** {refinement}\n\n"));
    }

    if !bundle.statements.is_empty() {
        out.push_str("## How Might We Statements\n\n");
        push_thematic(&mut out, &bundle.statements);
    }

    if !bundle.feature_ideas.is_empty() {
        out.push_str("## Feature Ideas\n\n");
        push_thematic(&mut out, &bundle.feature_ideas);
    }

    if !bundle.layouts.is_empty() {
        out.push_str("## Layout Suggestions\n\n");
        push_thematic(&mut out, &bundle.layouts);
    }

    if !bundle.sketch_prompts.is_empty() {
        out.push_str("## Sketch Prompts\n\n");
        for (idx, prompt) in bundle.sketch_prompts.iter().enumerate() {
            out.push_str(&format!("{}. {prompt}\n", idx + 1));
            if let Some(concept) = bundle.sketch_concepts.get(idx) {
                out.push_str(&format!("   - Concept: {concept}\n"));
            }
            if let Some(url) = bundle.images.get(idx).and_then(|image| image.url.as_deref()) {
                out.push_str(&format!("   - Image: {url}\n"));
            }
        }
        out.push('\n');
    }

    if !bundle.user_context.is_empty() {
        out.push_str("## User Context\n\n");
        push_segments(&mut out, &bundle.user_context);
    }

    out
}

fn push_thematic<T: ItemText>(out: &mut String, result: &ThematicResult<T>) {
    for (theme, items) in result.themes() {
        out.push_str(&format!("### {theme}\n\n"));
        for item in items {
            match item.detail() {
                Some(detail) => out.push_str(&format!("- **{}**: {detail}\n", item.headline())),
                None => out.push_str(&format!("- {}\n", item.headline())),
            }
        }
        out.push('\n');
    }
}

fn push_flat(out: &mut String, result: &FlatResult) {
    for (idx, item) in result.iter().enumerate() {
        out.push_str(&format!("{}. {item}\n", idx + 1));
    }
    out.push('\n');
}

fn push_segments(out: &mut String, segments: &[UserSegment]) {
    for segment in segments {
        out.push_str(&format!("### {}\n\n", segment.segment));
        if segment.persona.description.is_empty() {
            out.push_str(&format!("**Persona:** {}\n\n", segment.persona.name));
        } else {
            out.push_str(&format!(
                "**Persona:** {}. {}\n\n",
                segment.persona.name, segment.persona.description
            ));
        }
        for scenario in &segment.scenarios {
            out.push_str(&format!("- {scenario}\n"));
        }
        if !segment.scenarios.is_empty() {
            out.push('\n');
        }
    }
}

fn response_to_markdown(result: &ParsedResponse) -> String {
    let mut out = format!("# {}\n\n", result.kind());
    match result {
        ParsedResponse::Statements(r) => push_thematic(&mut out, r),
        ParsedResponse::FeatureIdeas(r) => push_thematic(&mut out, r),
        ParsedResponse::LayoutIdeas(r) => push_thematic(&mut out, r),
        ParsedResponse::SketchPrompts(r) | ParsedResponse::SketchConcepts(r) => {
            push_flat(&mut out, r)
        }
        ParsedResponse::UserContext(segments) => push_segments(&mut out, segments),
    }
    out
}

fn thematic_to_table<T: ItemText>(out: &mut String, result: &ThematicResult<T>) {
    let width = result.theme_names().map(str::len).max().unwrap_or(5);
    for (theme, items) in result.themes() {
        for item in items {
            out.push_str(&format!(
                "{:<width$}  {}\n",
                theme,
                item.headline(),
                width = width
            ));
        }
    }
}

fn response_to_table(result: &ParsedResponse) -> String {
    let mut out = String::new();
    match result {
        ParsedResponse::Statements(r) => thematic_to_table(&mut out, r),
        ParsedResponse::FeatureIdeas(r) => thematic_to_table(&mut out, r),
        ParsedResponse::LayoutIdeas(r) => thematic_to_table(&mut out, r),
        ParsedResponse::SketchPrompts(r) | ParsedResponse::SketchConcepts(r) => {
            for (idx, item) in r.iter().enumerate() {
                out.push_str(&format!("{:>2}  {item}\n", idx + 1));
            }
        }
        ParsedResponse::UserContext(segments) => {
            let width = segments.iter().map(|s| s.segment.len()).max().unwrap_or(7);
            for segment in segments {
                out.push_str(&format!(
                    "{:<width$}  {} ({} scenarios)\n",
                    segment.segment,
                    segment.persona.name,
                    segment.scenarios.len(),
                    width = width
                ));
            }
        }
    }
    out
}

fn report_to_markdown(report: &ParseReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Parse Report: {}\n\n", report.kind));
    out.push_str(&format!("- **Fallback:** {}\n", report.fallback));
    out.push_str(&format!("- **Themes:** {}\n", report.theme_count));
    out.push_str(&format!("- **Items:** {}\n", report.item_count));
    out.push_str(&format!("- **Coverage:** {:.2}\n", report.coverage));

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn report_to_table(report: &ParseReport) -> String {
    format!(
        "{:<16} {:<14} themes={} items={} cov={:.2}\n",
        report.kind.label(),
        report.fallback.to_string(),
        report.theme_count,
        report.item_count,
        report.coverage,
    )
}

fn bundle_to_table(bundle: &IdeaBundle) -> String {
    let mut out = String::new();
    out.push_str(&format!("Challenge: {}\n", bundle.challenge));
    out.push_str(&format!("Generated: {}\n", bundle.generated_at));
    out.push_str(&format!(
        "  statements      {} themes, {} items\n",
        bundle.statements.theme_count(),
        bundle.statements.item_count()
    ));
    out.push_str(&format!(
        "  feature_ideas   {} themes, {} items\n",
        bundle.feature_ideas.theme_count(),
        bundle.feature_ideas.item_count()
    ));
    out.push_str(&format!(
        "  layouts         {} themes, {} items\n",
        bundle.layouts.theme_count(),
        bundle.layouts.item_count()
    ));
    out.push_str(&format!(
        "  sketches        {} prompts, {} images\n",
        bundle.sketch_prompts.len(),
        bundle.images.iter().filter(|image| image.is_success()).count()
    ));
    out.push_str(&format!(
        "  user_context    {} segments\n",
        bundle.user_context.len()
    ));
    out
}
