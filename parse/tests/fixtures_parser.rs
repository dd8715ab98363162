use std::fs;
use std::path::PathBuf;

use ideagen_core::{
    FeatureIdea, LayoutIdea, ResponseKind, Statement, ThematicResult, validate_flat,
    validate_thematic, validate_user_context,
};
use ideagen_parse::parser::{
    ResponseParser, SKETCH_CONCEPT_PLACEHOLDER, SKETCH_PROMPT_PLACEHOLDER, normalize_statement,
};
use ideagen_parse::report::FallbackStage;
use ideagen_parse::{
    ParsedResponse, parse_feature_ideas, parse_layout_ideas, parse_response_with_report,
    parse_sketch_concepts, parse_sketch_prompts, parse_statements, parse_user_context,
};

#[test]
fn test_themed_statements_fixture() {
    let result = parse_statements(&fixture("hmw-themed.txt"));

    assert_eq!(
        result.theme_names().collect::<Vec<_>>(),
        vec!["Access", "Safety", "Community"]
    );
    assert_eq!(
        result.get("Access").unwrap(),
        &[
            Statement::new("How might we reduce wait times at busy stops?"),
            Statement::new("How might we make real-time arrival info available to everyone?"),
            Statement::new("How might we improve shelter from rain and heat"),
            Statement::new("How might we support riders with limited mobility?"),
        ]
    );
    assert_eq!(
        result.get("Safety").unwrap()[1],
        "How might we encourage passive surveillance around stops?"
    );
    assert!(validate_thematic(ResponseKind::Statements, &result).is_empty());
}

#[test]
fn test_themed_statements_report() {
    let run = parse_response_with_report(ResponseKind::Statements, &fixture("hmw-themed.txt"), 3);

    assert_eq!(run.report.fallback, FallbackStage::None);
    assert_eq!(run.report.theme_count, 3);
    assert_eq!(run.report.item_count, 8);
    assert_eq!(run.report.unresolved_lines.len(), 1);
    assert!(run.report.unresolved_lines[0].starts_with("Here are reframed"));
    assert!(run.report.coverage > 0.9);
}

#[test]
fn test_markdown_headings_and_star_bullets() {
    let result = parse_statements(&fixture("hmw-markdown-headings.txt"));
    assert_eq!(
        result.theme_names().collect::<Vec<_>>(),
        vec!["Reducing Friction", "Building Trust"]
    );
    assert_eq!(result.get("Reducing Friction").map(<[Statement]>::len), Some(2));
}

#[test]
fn test_unthemed_statements_use_implicit_theme() {
    let run = parse_response_with_report(ResponseKind::Statements, &fixture("hmw-unthemed.txt"), 3);
    let ParsedResponse::Statements(result) = run.result else {
        panic!("expected statements");
    };

    assert_eq!(run.report.fallback, FallbackStage::None);
    assert_eq!(result.theme_names().collect::<Vec<_>>(), vec!["Reframing"]);
    assert_eq!(result.item_count(), 10);
    assert_eq!(
        result.get("Reframing").unwrap()[9],
        "How might we make fares easier to understand?"
    );
}

#[test]
fn test_themed_layouts_fixture() {
    let result = parse_layout_ideas(&fixture("layouts-themed.txt"));

    assert_eq!(
        result.theme_names().collect::<Vec<_>>(),
        vec!["Navigation-First", "Information Density"]
    );
    assert_eq!(
        result.get("Navigation-First").unwrap(),
        &[
            LayoutIdea::new(
                "Map Dashboard",
                "A full-screen map with nearby stops highlighted. Arrival times float above each stop."
            ),
            LayoutIdea::new(
                "Route Timeline",
                "A vertical timeline of the trip with transfer points."
            ),
        ]
    );
    assert_eq!(
        result.get("Information Density").unwrap()[0],
        LayoutIdea::new("Card Grid", "Cards summarize each route with live status.")
    );
}

#[test]
fn test_themed_features_fixture() {
    let result = parse_feature_ideas(&fixture("features-themed.txt"));

    assert_eq!(
        result.get("Real-Time Information").unwrap(),
        &[
            FeatureIdea::new(
                "Live arrival board",
                "Shows predicted arrivals for every route at the stop."
            ),
            FeatureIdea::new("Crowding indicator", "Displays how full the next vehicle is."),
        ]
    );
    assert_eq!(
        result.get("Personalization").unwrap()[1],
        FeatureIdea::new("Smart reminders", "Notifies you when it is time to leave.")
    );
}

#[test]
fn test_sketch_prompts_are_truncated_to_count() {
    let raw = fixture("sketch-prompts.txt");
    let result = parse_sketch_prompts(&raw, 3);

    assert_eq!(result.len(), 3);
    assert_eq!(
        result.get(1),
        Some("A smartphone screen showing a map with live bus positions")
    );
    assert!(validate_flat(ResponseKind::SketchPrompts, &result, 3).is_empty());

    let run = parse_response_with_report(ResponseKind::SketchPrompts, &raw, 3);
    assert_eq!(run.report.fallback, FallbackStage::Truncated);
}

#[test]
fn test_sketch_concepts_are_joined_and_padded() {
    let result = parse_sketch_concepts(&fixture("sketch-concepts.txt"), 3);

    assert_eq!(
        result.as_slice(),
        &[
            "This concept explores ambient light as a safety cue, making the shelter feel occupied and cared for.",
            "This concept puts live information in the rider's hand so waiting time becomes predictable.",
            SKETCH_CONCEPT_PLACEHOLDER,
        ]
    );
}

#[test]
fn test_user_context_fixture() {
    let segments = parse_user_context(&fixture("user-context.txt"));

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].segment, "Night-shift Workers");
    assert_eq!(segments[0].persona.name, "Maria");
    assert_eq!(segments[0].scenarios.len(), 2);
    assert_eq!(segments[1].persona.name, "Dev");
    assert_eq!(
        segments[1].persona.description,
        "a first-year student on a tight budget"
    );
    assert_eq!(
        segments[1].scenarios,
        vec!["Rides to early lectures", "Travels home on weekends"]
    );
    assert!(validate_user_context(&segments).is_empty());
}

#[test]
fn test_prose_only_response_is_repartitioned() {
    let run = parse_response_with_report(ResponseKind::LayoutIdeas, &fixture("prose-only.txt"), 3);
    let ParsedResponse::LayoutIdeas(result) = run.result else {
        panic!("expected layouts");
    };

    assert_eq!(run.report.fallback, FallbackStage::Repartitioned);
    assert_eq!(
        result.theme_names().collect::<Vec<_>>(),
        vec!["Information Architecture"]
    );
    assert_eq!(result.item_count(), 1);
}

#[test]
fn test_whitespace_only_response_uses_floor_for_every_kind() {
    let raw = "   \n\n\t\n";
    for kind in ResponseKind::ALL {
        let run = parse_response_with_report(kind, raw, 3);
        assert!(run.result.item_count() > 0, "{kind} produced nothing");
        let expected = if kind.is_thematic() || kind == ResponseKind::UserContext {
            FallbackStage::Floor
        } else {
            FallbackStage::Padded
        };
        assert_eq!(run.report.fallback, expected, "{kind}");
    }

    assert_eq!(
        parse_sketch_prompts(raw, 3).as_slice(),
        &[SKETCH_PROMPT_PLACEHOLDER; 3]
    );
    let layouts = parse_layout_ideas(raw);
    assert_eq!(layouts.get("Layout Directions").map(<[LayoutIdea]>::len), Some(3));
}

#[test]
fn test_duplicate_headers_merge_in_first_seen_position() {
    let raw = "Theme: B\n1. one\nTheme: A\n1. two\nTheme: B\n1. three";
    let result = parse_statements(raw);

    assert_eq!(result.theme_names().collect::<Vec<_>>(), vec!["B", "A"]);
    assert_eq!(
        result.get("B").unwrap(),
        &[
            Statement::new("How might we one"),
            Statement::new("How might we three"),
        ]
    );
}

#[test]
fn test_stray_colon_line_becomes_theme() {
    let raw = "Theme 1: Access\n1. reduce wait times\nBudget: keep costs low\n1. reuse existing poles";
    let result = parse_statements(raw);

    assert_eq!(
        result.theme_names().collect::<Vec<_>>(),
        vec!["Access", "keep costs low"]
    );
    assert_eq!(
        result.get("keep costs low").unwrap(),
        &[Statement::new("How might we reuse existing poles")]
    );
}

#[test]
fn test_bulleted_colon_line_becomes_theme() {
    let raw = "Theme 1: Access\n- reduce wait times\n- Budget: keep costs low\n- reuse existing poles";
    let result = parse_statements(raw);

    assert_eq!(
        result.theme_names().collect::<Vec<_>>(),
        vec!["Access", "keep costs low"]
    );
    assert_eq!(
        result.get("Access").unwrap(),
        &[Statement::new("How might we reduce wait times")]
    );
}

#[test]
fn test_parsed_statements_are_normalization_fixed_points() {
    let result = parse_statements(&fixture("hmw-themed.txt"));
    for statement in result.items() {
        let again = normalize_statement(statement.as_str()).unwrap();
        assert_eq!(&again, statement);
    }
}

#[test]
fn test_parser_instances_are_independent() {
    let themed = fixture("hmw-themed.txt");
    let layouts = fixture("layouts-themed.txt");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let raw = if i % 2 == 0 { themed.clone() } else { layouts.clone() };
            let kind = if i % 2 == 0 {
                ResponseKind::Statements
            } else {
                ResponseKind::LayoutIdeas
            };
            std::thread::spawn(move || {
                let mut parser = ResponseParser::new(kind, &raw, 3);
                parser.parse().theme_count()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![3, 2, 3, 2]);
}

#[test]
fn test_theme_order_survives_json_roundtrip() {
    let result = parse_statements(&fixture("hmw-themed.txt"));
    let json = serde_json::to_string(&result).unwrap();
    let back: ThematicResult<Statement> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}
