//! Structured reporting for parse runs.

use ideagen_core::ResponseKind;
use serde::{Deserialize, Serialize};

/// How far down the fallback ladder a parse had to go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStage {
    /// The response parsed as-is.
    #[default]
    None,
    /// No themes were found; a flat re-scan was split into synthetic themes.
    Repartitioned,
    /// Nothing was recoverable; canned content was substituted.
    Floor,
    /// A flat list was short and was padded with placeholders.
    Padded,
    /// A flat list was long and was truncated.
    Truncated,
}

impl FallbackStage {
    /// Returns `true` if any fallback was applied.
    pub fn is_degraded(&self) -> bool {
        *self != Self::None
    }
}

impl std::fmt::Display for FallbackStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Repartitioned => write!(f, "repartitioned"),
            Self::Floor => write!(f, "floor"),
            Self::Padded => write!(f, "padded"),
            Self::Truncated => write!(f, "truncated"),
        }
    }
}

/// Per-response parse report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseReport {
    pub kind: ResponseKind,
    pub fallback: FallbackStage,
    pub theme_count: usize,
    pub item_count: usize,
    pub coverage: f64,
    pub relevant_lines: usize,
    pub recognized_lines: usize,
    pub unresolved_lines: Vec<String>,
    pub dropped_items: usize,
    pub dropped_themes: usize,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_stage_display_matches_serde() {
        let stages = [
            (FallbackStage::None, "none"),
            (FallbackStage::Repartitioned, "repartitioned"),
            (FallbackStage::Floor, "floor"),
            (FallbackStage::Padded, "padded"),
            (FallbackStage::Truncated, "truncated"),
        ];

        for (stage, expected) in stages {
            assert_eq!(stage.to_string(), expected);
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{expected}\""));
            let back: FallbackStage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stage);
        }
    }

    #[test]
    fn test_only_none_is_not_degraded() {
        assert!(!FallbackStage::None.is_degraded());
        assert!(FallbackStage::Padded.is_degraded());
    }

    #[test]
    fn test_report_serializes_kind_snake_case() {
        let report = ParseReport {
            kind: ResponseKind::LayoutIdeas,
            fallback: FallbackStage::None,
            theme_count: 2,
            item_count: 5,
            coverage: 1.0,
            relevant_lines: 9,
            recognized_lines: 9,
            unresolved_lines: Vec::new(),
            dropped_items: 0,
            dropped_themes: 0,
            warnings: Vec::new(),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"layout_ideas\""));
        assert!(json.contains("\"fallback\":\"none\""));
    }
}
