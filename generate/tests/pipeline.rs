use std::sync::Mutex;

use ideagen_core::{ImageOutcome, ResponseKind, validate_bundle};
use ideagen_generate::{
    CompletionRequest, GenerateError, Generator, GeneratorConfig, ImageGenerator, PromptLibrary,
    RequestParams, TextCompleter,
};

const STATEMENTS: &str = "Theme 1: Access\n1. reduce wait times\n2. improve shelter\n\nTheme 2: Safety\n1. better lighting";
const SKETCHES: &str = "1. A glowing shelter\n2. A live map on a phone\n3. A community board";
const LAYOUTS: &str = "Theme 1: Navigation\n1. Map first\nFull-screen map of stops.";
const FEATURES: &str = "Theme 1: Alerts\n1. Push alerts. Warns riders early.";
const CONTEXT: &str = "Segment 1: Commuters\nPersona: Sam - daily rider\nScenarios:\n- Misses the last bus";
const CONCEPTS: &str = "1. Light as safety.\n2. Information in hand.\n3. Stops as places.";

#[derive(Default)]
struct ScriptedCompleter {
    failing: Vec<ResponseKind>,
    calls: Mutex<Vec<(ResponseKind, RequestParams, String)>>,
}

impl ScriptedCompleter {
    fn failing(kinds: &[ResponseKind]) -> Self {
        Self {
            failing: kinds.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_for(&self, kind: ResponseKind) -> Option<(RequestParams, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _, _)| *k == kind)
            .map(|(_, params, user)| (*params, user.clone()))
    }
}

impl TextCompleter for ScriptedCompleter {
    fn complete(&self, request: &CompletionRequest<'_>) -> ideagen_generate::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((request.kind, request.params, request.user.to_string()));

        if self.failing.contains(&request.kind) {
            return Err(GenerateError::RateLimited("slow down".into()));
        }
        Ok(match request.kind {
            ResponseKind::Statements => STATEMENTS,
            ResponseKind::SketchPrompts => SKETCHES,
            ResponseKind::LayoutIdeas => LAYOUTS,
            ResponseKind::FeatureIdeas => FEATURES,
            ResponseKind::UserContext => CONTEXT,
            ResponseKind::SketchConcepts => CONCEPTS,
        }
        .to_string())
    }
}

/// Fails for prompts containing `fail_on`.
struct ScriptedImages {
    fail_on: Option<&'static str>,
}

impl ImageGenerator for ScriptedImages {
    fn generate_image(&self, prompt: &str) -> ideagen_generate::Result<ImageOutcome> {
        if self.fail_on.is_some_and(|needle| prompt.contains(needle)) {
            return Err(GenerateError::Api {
                status: 400,
                body: "content policy".into(),
            });
        }
        Ok(ImageOutcome {
            url: Some(format!("https://images.test/{}", prompt.len())),
            revised_prompt: Some(prompt.to_string()),
            error: None,
        })
    }
}

fn generator(
    completer: ScriptedCompleter,
    fail_on: Option<&'static str>,
) -> Generator<ScriptedCompleter, ScriptedImages> {
    Generator::new(
        completer,
        ScriptedImages { fail_on },
        PromptLibrary::builtin(),
        GeneratorConfig::default(),
    )
}

#[test]
fn test_generate_all_collects_every_kind() {
    let generator = generator(ScriptedCompleter::default(), None);
    let bundle = generator.generate_all("Make bus stops safer").unwrap();

    assert_eq!(bundle.challenge, "Make bus stops safer");
    assert_eq!(
        bundle.statements.theme_names().collect::<Vec<_>>(),
        vec!["Access", "Safety"]
    );
    assert_eq!(bundle.statements.get("Access").unwrap()[0], "How might we reduce wait times");
    assert_eq!(bundle.layouts.get("Navigation").unwrap()[0].title, "Map first");
    assert_eq!(bundle.feature_ideas.item_count(), 1);
    assert_eq!(bundle.user_context[0].persona.name, "Sam");
    assert_eq!(bundle.sketch_prompts.len(), 3);
    assert_eq!(bundle.sketch_concepts.get(2), Some("Stops as places."));
    assert_eq!(bundle.images.len(), 3);
    assert!(bundle.images.iter().all(ImageOutcome::is_success));
    assert!(chrono::DateTime::parse_from_rfc3339(&bundle.generated_at).is_ok());
    assert!(validate_bundle(&bundle, 3).is_empty());
}

#[test]
fn test_requests_use_configured_params_and_prompts() {
    let generator = generator(ScriptedCompleter::default(), None);
    generator.generate_all("Make bus stops safer").unwrap();

    let completer = &generator_completer(&generator);
    let (params, user) = completer.call_for(ResponseKind::Statements).unwrap();
    assert_eq!(params, RequestParams::new(0.8, 800));
    assert!(user.contains("Make bus stops safer"));

    let (params, user) = completer.call_for(ResponseKind::SketchConcepts).unwrap();
    assert_eq!(params, RequestParams::new(0.7, 400));
    assert!(user.contains("1. A glowing shelter\n2. A live map on a phone\n3. A community board"));
}

#[test]
fn test_required_kind_failure_propagates() {
    let generator = generator(ScriptedCompleter::failing(&[ResponseKind::LayoutIdeas]), None);
    let err = generator.generate_all("Make bus stops safer").unwrap_err();

    assert!(err.to_string().starts_with("failed to generate layout_ideas"));
    assert_eq!(
        err.user_message(),
        "Rate limit reached. Please wait a moment and try again."
    );
}

#[test]
fn test_optional_kinds_degrade_to_empty() {
    let generator = generator(
        ScriptedCompleter::failing(&[ResponseKind::FeatureIdeas, ResponseKind::UserContext]),
        None,
    );
    let bundle = generator.generate_all("Make bus stops safer").unwrap();

    assert!(bundle.feature_ideas.is_empty());
    assert!(bundle.user_context.is_empty());
    assert_eq!(bundle.statements.item_count(), 3);
}

#[test]
fn test_image_failure_keeps_its_slot() {
    let generator = generator(ScriptedCompleter::default(), Some("live map"));
    let bundle = generator.generate_all("Make bus stops safer").unwrap();

    assert_eq!(bundle.images.len(), 3);
    assert!(bundle.images[0].is_success());
    assert_eq!(bundle.images[1].url, None);
    assert_eq!(
        bundle.images[1].error.as_deref(),
        Some("API returned 400: content policy")
    );
    assert!(bundle.images[2].is_success());
}

#[test]
fn test_concept_failure_falls_back_to_prompts() {
    let generator = generator(
        ScriptedCompleter::failing(&[ResponseKind::SketchConcepts]),
        None,
    );
    let bundle = generator.generate_all("Make bus stops safer").unwrap();
    assert_eq!(bundle.sketch_concepts, bundle.sketch_prompts);
}

#[test]
fn test_build_on_records_refinement() {
    let generator = generator(ScriptedCompleter::default(), None);
    let bundle = generator
        .build_on("Make bus stops safer", &["Map first: Full-screen map".into()])
        .unwrap();

    assert_eq!(bundle.challenge, "Make bus stops safer");
    assert_eq!(
        bundle.refinement.as_deref(),
        Some("Build upon and expand these ideas:\n- Map first: Full-screen map")
    );

    let (_, user) = generator_completer(&generator)
        .call_for(ResponseKind::Statements)
        .unwrap();
    assert!(user.contains("Build upon and refine this specific idea: Build upon and expand these ideas:"));
}

#[test]
fn test_build_on_requires_selection() {
    let generator = generator(ScriptedCompleter::default(), None);
    assert!(matches!(
        generator.build_on("Make bus stops safer", &[]),
        Err(GenerateError::NoIdeasSelected)
    ));
}

fn generator_completer(
    generator: &Generator<ScriptedCompleter, ScriptedImages>,
) -> &ScriptedCompleter {
    generator.completer()
}
