use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ideagen_core::{IdeaBundle, ImageOutcome, LayoutIdea, Statement};
use ideagen_parse::{parse_sketch_concepts, parse_sketch_prompts};
use ideagen_sqlite::SessionStore;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn ideagen(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ideagen"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ideagen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn sample_bundle(challenge: &str) -> IdeaBundle {
    let mut bundle = IdeaBundle::new(challenge, "2024-01-15T10:30:00Z");
    bundle
        .statements
        .push("Safety", Statement::new("How might we add light at stops"));
    bundle
        .layouts
        .push("Navigation", LayoutIdea::new("Map first", "Full-screen live map"));
    bundle.sketch_prompts = parse_sketch_prompts("1. A glowing shelter", 3);
    bundle.sketch_concepts = parse_sketch_concepts("1. Light signals safety", 3);
    bundle.images = vec![
        ImageOutcome::failed("content policy"),
        ImageOutcome::failed("content policy"),
        ImageOutcome::failed("content policy"),
    ];
    bundle
}

fn seed_session(db: &Path, id: &str, bundle: Option<&IdeaBundle>) {
    let store = SessionStore::open(db, "ig_").unwrap();
    store
        .create_session(id, "Make bus stops safer", Some("Ana"), None)
        .unwrap();
    if let Some(bundle) = bundle {
        store.update_session(id, bundle).unwrap();
    }
}

#[test]
fn test_parse_file_json() {
    let dir = TempDir::new().unwrap();
    let input = fixture("hmw-themed.txt");
    let output = ideagen(
        &["parse-file", "--kind", "statements", "--input", input.to_str().unwrap()],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let access = text.find("\"Access\"").unwrap();
    let safety = text.find("\"Safety\"").unwrap();
    let community = text.find("\"Community\"").unwrap();
    assert!(access < safety && safety < community);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 3);
    assert_eq!(value["Access"].as_array().unwrap().len(), 4);
}

#[test]
fn test_parse_file_with_report_json() {
    let dir = TempDir::new().unwrap();
    let input = fixture("sketch-prompts.txt");
    let output = ideagen(
        &[
            "parse-file",
            "--kind",
            "sketch-prompts",
            "--input",
            input.to_str().unwrap(),
            "--with-report",
        ],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["result"].as_array().unwrap().len(), 3);
    assert_eq!(value["report"]["fallback"], "truncated");
    assert_eq!(value["report"]["kind"], "sketch_prompts");
}

#[test]
fn test_parse_file_with_report_table() {
    let dir = TempDir::new().unwrap();
    let input = fixture("hmw-themed.txt");
    let output = ideagen(
        &[
            "parse-file",
            "--kind",
            "statements",
            "--input",
            input.to_str().unwrap(),
            "--with-report",
            "--format",
            "table",
        ],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Access"));
    assert!(text.contains("themes=3 items=8"));
}

#[test]
fn test_parse_file_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = ideagen(
        &["parse-file", "--kind", "layouts", "--input", "no-such-file.txt"],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: Failed to read 'no-such-file.txt'"));
}

#[test]
fn test_parse_stdin_user_context() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = TempDir::new().unwrap();
    let raw = fs::read_to_string(fixture("user-context.txt")).unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_ideagen"))
        .args(["parse-stdin", "--kind", "user-context"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(raw.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let segments = value.as_array().unwrap();
    assert!(!segments.is_empty());
    assert!(segments[0]["persona"]["name"].is_string());
}

#[test]
fn test_parse_stdin_empty_input_uses_floor() {
    let dir = TempDir::new().unwrap();
    let output = ideagen(&["parse-stdin", "--kind", "layouts"], dir.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["Layout Directions"].as_array().unwrap().len(), 3);
}

#[test]
fn test_validate_accepts_good_bundle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bundle.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&sample_bundle("Safer stops")).unwrap(),
    )
    .unwrap();

    let output = ideagen(&["validate", path.to_str().unwrap()], dir.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Validated 1 bundle file(s)."));
}

#[test]
fn test_validate_rejects_bad_bundle() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    fs::write(&good, serde_json::to_string(&sample_bundle("Safer stops")).unwrap()).unwrap();
    fs::write(&bad, serde_json::to_string(&sample_bundle("   ")).unwrap()).unwrap();

    let output = ideagen(
        &["validate", good.to_str().unwrap(), bad.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("bundle challenge cannot be empty"));
    assert!(err.contains("1 of 2 bundle file(s) failed validation"));
}

#[test]
fn test_session_list_show_and_export() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");
    seed_session(&db, "s-1", Some(&sample_bundle("Make bus stops safer")));
    seed_session(&db, "s-2", None);
    let db_arg = db.to_str().unwrap();

    let list = ideagen(&["session", "list", "--db", db_arg], dir.path());
    assert!(list.status.success(), "stderr: {}", stderr(&list));
    let listed = stdout(&list);
    assert!(listed.contains("s-1"));
    assert!(listed.contains("s-2"));
    assert!(listed.contains("results"));
    assert!(listed.contains("empty"));

    let show = ideagen(&["session", "show", "--id", "s-1", "--db", db_arg], dir.path());
    assert!(show.status.success(), "stderr: {}", stderr(&show));
    let value: serde_json::Value = serde_json::from_str(&stdout(&show)).unwrap();
    assert_eq!(value["user_name"], "Ana");
    assert_eq!(value["bundle"]["challenge"], "Make bus stops safer");

    let out_file = dir.path().join("out/results.md");
    let export = ideagen(
        &[
            "export",
            "--id",
            "s-1",
            "--db",
            db_arg,
            "--output",
            out_file.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(export.status.success(), "stderr: {}", stderr(&export));
    let text = fs::read_to_string(&out_file).unwrap();
    assert!(text.starts_with("# Idea Generator Results"));
    assert!(text.contains("- How might we add light at stops"));
    assert!(text.contains("1. A glowing shelter"));
}

#[test]
fn test_export_without_results_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");
    seed_session(&db, "s-2", None);

    let output = ideagen(
        &["export", "--id", "s-2", "--db", db.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Session 's-2' has no results yet"));
}

#[test]
fn test_session_show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");

    let output = ideagen(
        &["session", "show", "--id", "nope", "--db", db.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Session 'nope' not found"));
}

#[test]
fn test_session_purge_uses_retention_days() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");
    seed_session(&db, "old", None);
    seed_session(&db, "fresh", None);
    {
        let store = SessionStore::open(&db, "ig_").unwrap();
        store
            .connection()
            .execute(
                "UPDATE ig_sessions SET created_at = '2000-01-01T00:00:00Z' WHERE id = 'old'",
                [],
            )
            .unwrap();
    }

    let output = ideagen(
        &["session", "purge", "--retention-days", "30", "--db", db.to_str().unwrap()],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Purged 1 session(s) older than 30 day(s)."));
    let store = SessionStore::open(&db, "ig_").unwrap();
    assert!(store.get_session("old").unwrap().is_none());
    assert!(store.get_session("fresh").unwrap().is_some());
}

#[test]
fn test_generate_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_ideagen"))
        .args(["generate", "--challenge", "Make bus stops safer", "--no-persist"])
        .current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output)
            .contains("error: API key not configured. Please set OPENAI_API_KEY in your .env file.")
    );
}

#[test]
fn test_generate_rejects_blank_challenge() {
    let dir = TempDir::new().unwrap();
    let output = ideagen(&["generate", "--challenge", "   ", "--no-persist"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: Please enter a design challenge"));
}

#[test]
fn test_select_requires_session() {
    let dir = TempDir::new().unwrap();
    let output = ideagen(
        &["generate", "--challenge", "Safer stops", "--select", "hmw_Safety_1"],
        dir.path(),
    );

    assert!(!output.status.success());
}

fn corrupt_session(db: &Path, id: &str) {
    seed_session(db, id, None);
    let store = SessionStore::open(db, "ig_").unwrap();
    store
        .connection()
        .execute(
            "UPDATE ig_sessions SET bundle = 'not json' WHERE id = ?1",
            [id],
        )
        .unwrap();
}

#[test]
fn test_generate_continues_past_unreadable_session() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");
    corrupt_session(&db, "s-1");

    let output = Command::new(env!("CARGO_BIN_EXE_ideagen"))
        .args([
            "generate",
            "--challenge",
            "Make bus stops safer",
            "--session",
            "s-1",
            "--db",
            db.to_str().unwrap(),
        ])
        .current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    let err = stderr(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(!err.contains("error: Failed to load session"), "stderr: {err}");
    assert!(err.contains("error: API key not configured."), "stderr: {err}");
}

#[test]
fn test_select_fails_on_unreadable_session() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");
    corrupt_session(&db, "s-1");

    let output = ideagen(
        &[
            "generate",
            "--session",
            "s-1",
            "--select",
            "hmw_Safety_1",
            "--db",
            db.to_str().unwrap(),
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: Failed to load session 's-1'"));
}

#[test]
fn test_session_purge_huge_window_keeps_everything() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("sessions.db");
    seed_session(&db, "s-1", None);

    let output = ideagen(
        &["session", "purge", "--retention-days", "4000000000", "--db", db.to_str().unwrap()],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Purged 0 session(s)"));
}
