use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ideagen_core::{DEFAULT_SKETCH_COUNT, IdeaBundle, ResponseKind, validate_bundle};
use ideagen_generate::{
    GenerateError, Generator, GeneratorConfig, OpenAiClient, PromptLibrary, selected_idea_texts,
};
use ideagen_parse::output::{OutputFormat, export_markdown, format_bundle, format_report, format_response};
use ideagen_sqlite::{SessionRecord, SessionStore};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Response kinds accepted on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliKind {
    Statements,
    Features,
    Layouts,
    SketchPrompts,
    SketchConcepts,
    UserContext,
}

impl From<CliKind> for ResponseKind {
    fn from(kind: CliKind) -> Self {
        match kind {
            CliKind::Statements => Self::Statements,
            CliKind::Features => Self::FeatureIdeas,
            CliKind::Layouts => Self::LayoutIdeas,
            CliKind::SketchPrompts => Self::SketchPrompts,
            CliKind::SketchConcepts => Self::SketchConcepts,
            CliKind::UserContext => Self::UserContext,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ideagen")]
#[command(about = "Design ideation from a challenge statement, with offline response parsing")]
struct Cli {
    /// Log parser and pipeline decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a captured model response from a file.
    ParseFile(ParseFileArgs),
    /// Parse a captured model response from stdin.
    ParseStdin(ParseStdinArgs),
    /// Generate statements, layouts, sketches and user context for a challenge.
    Generate(GenerateArgs),
    /// Inspect and maintain stored sessions.
    Session(SessionArgs),
    /// Export a stored session as a plain-text document.
    Export(ExportArgs),
    /// Validate one or more stored bundle JSON files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseOptions {
    /// Which request the response answers.
    #[arg(long)]
    kind: CliKind,
    /// Output both the result and the parse report.
    #[arg(long)]
    with_report: bool,
    /// Number of entries for sketch prompts and sketch concepts.
    #[arg(long, default_value_t = DEFAULT_SKETCH_COUNT)]
    count: usize,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to file containing the raw response.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    options: ParseOptions,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    options: ParseOptions,
}

/// Configuration and session database location.
#[derive(Debug, Args)]
struct StoreOptions {
    /// Path to a YAML generator configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Session database path (overrides the configuration).
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// The design challenge.
    #[arg(long, conflicts_with = "challenge_file")]
    challenge: Option<String>,
    /// Read the design challenge from a file.
    #[arg(long)]
    challenge_file: Option<PathBuf>,
    /// Idea text to build on (repeatable).
    #[arg(long)]
    refine: Vec<String>,
    /// Idea id from the session's last run to build on (repeatable).
    #[arg(long, requires = "session")]
    select: Vec<String>,
    /// Session id to store the run under (a new id is generated otherwise).
    #[arg(long)]
    session: Option<String>,
    /// Name recorded on a new session.
    #[arg(long)]
    user_name: Option<String>,
    /// Email recorded on a new session.
    #[arg(long)]
    user_email: Option<String>,
    /// Do not store the run.
    #[arg(long)]
    no_persist: bool,
    /// Output format.
    #[arg(long, default_value = "markdown")]
    format: OutputFormat,
    #[command(flatten)]
    store: StoreOptions,
}

#[derive(Debug, Args)]
struct SessionArgs {
    #[command(subcommand)]
    operation: SessionOperation,
}

#[derive(Debug, Subcommand)]
enum SessionOperation {
    /// Show one session with its latest results.
    Show(SessionShowArgs),
    /// List stored sessions, newest first.
    List(SessionListArgs),
    /// Delete sessions older than the retention window.
    Purge(SessionPurgeArgs),
}

#[derive(Debug, Args)]
struct SessionShowArgs {
    /// Session id.
    #[arg(long)]
    id: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    #[command(flatten)]
    store: StoreOptions,
}

#[derive(Debug, Args)]
struct SessionListArgs {
    #[command(flatten)]
    store: StoreOptions,
}

#[derive(Debug, Args)]
struct SessionPurgeArgs {
    /// Retention window in days (defaults to the configured value).
    #[arg(long)]
    retention_days: Option<u32>,
    #[command(flatten)]
    store: StoreOptions,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Session id.
    #[arg(long)]
    id: String,
    /// Write to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    store: StoreOptions,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Bundle JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Expected number of sketch prompts per bundle.
    #[arg(long, default_value_t = DEFAULT_SKETCH_COUNT)]
    count: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = dotenvy::dotenv() {
        debug!(error = %err, "No .env file loaded");
    }

    let result = match cli.command {
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::Generate(args) => run_generate(args),
        Command::Session(args) => run_session(args),
        Command::Export(args) => run_export(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// parse-file / parse-stdin
// ---------------------------------------------------------------------------

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    run_parse_response(&raw, &args.options)
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    run_parse_response(&raw, &args.options)
}

fn run_parse_response(raw: &str, options: &ParseOptions) -> Result<(), String> {
    let kind = ResponseKind::from(options.kind);
    let format = options.format;

    if !options.with_report {
        let result = ideagen_parse::parse_response(kind, raw, options.count);
        println!("{}", format_response(&result, format)?);
        return Ok(());
    }

    let run = ideagen_parse::parse_response_with_report(kind, raw, options.count);

    #[derive(serde::Serialize)]
    struct ParseOutput<'a> {
        result: &'a ideagen_parse::ParsedResponse,
        report: &'a ideagen_parse::report::ParseReport,
    }

    let output = ParseOutput {
        result: &run.result,
        report: &run.report,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{yaml}");
        }
        _ => {
            print!("{}", format_response(&run.result, format)?);
            print!("{}", format_report(&run.report, format)?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let config = load_config(&args.store)?;

    let store = if args.no_persist {
        None
    } else {
        match open_store(&args.store, &config) {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(error = %err, "Session store unavailable; results will not be saved");
                None
            }
        }
    };

    // The stored record is only required for --select or a missing challenge.
    let needs_previous =
        !args.select.is_empty() || (args.challenge.is_none() && args.challenge_file.is_none());
    let previous = match (&store, &args.session) {
        (Some(store), Some(id)) => match store.get_session(id) {
            Ok(record) => record,
            Err(err) if needs_previous => {
                return Err(format!("Failed to load session '{id}': {err}"));
            }
            Err(err) => {
                warn!(session = %id, error = %err, "Failed to load session; continuing without it");
                None
            }
        },
        _ => None,
    };

    let challenge = resolve_challenge(&args, previous.as_ref())?;

    let mut selected = args.refine.clone();
    if !args.select.is_empty() {
        let bundle = previous
            .as_ref()
            .and_then(|record| record.bundle.as_ref())
            .ok_or_else(|| "--select needs a stored session with results".to_string())?;
        let texts = selected_idea_texts(bundle, &args.select).map_err(|e| e.to_string())?;
        selected.extend(texts);
    }

    let prompts = PromptLibrary::load(config.templates_dir.as_deref()).map_err(|e| e.to_string())?;
    let client = OpenAiClient::from_config(&config).map_err(generation_error)?;
    let generator = Generator::new(client.clone(), client, prompts, config);

    let bundle = if selected.is_empty() {
        generator.generate_all(&challenge)
    } else {
        generator.build_on(&challenge, &selected)
    }
    .map_err(generation_error)?;

    if let Some(store) = &store {
        let id = args
            .session
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        persist_bundle(store, &id, &bundle, &args);
    }

    println!("{}", format_bundle(&bundle, args.format)?);
    Ok(())
}

fn resolve_challenge(args: &GenerateArgs, previous: Option<&SessionRecord>) -> Result<String, String> {
    let challenge = if let Some(challenge) = &args.challenge {
        challenge.clone()
    } else if let Some(path) = &args.challenge_file {
        fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?
    } else if let Some(record) = previous {
        record.challenge.clone()
    } else {
        return Err("Specify --challenge or --challenge-file".to_string());
    };

    let challenge = challenge.trim().to_string();
    if challenge.is_empty() {
        return Err("Please enter a design challenge".to_string());
    }
    Ok(challenge)
}

/// Stores the run. Failures are logged, never returned.
fn persist_bundle(store: &SessionStore, id: &str, bundle: &IdeaBundle, args: &GenerateArgs) {
    let exists = match store.get_session(id) {
        Ok(record) => record.is_some(),
        Err(err) => {
            warn!(session = id, error = %err, "Failed to read session");
            return;
        }
    };
    if !exists {
        if let Err(err) = store.create_session(
            id,
            &bundle.challenge,
            args.user_name.as_deref(),
            args.user_email.as_deref(),
        ) {
            warn!(session = id, error = %err, "Failed to create session");
            return;
        }
    }
    match store.update_session(id, bundle) {
        Ok(()) => eprintln!("Saved session '{id}'."),
        Err(err) => warn!(session = id, error = %err, "Failed to save session"),
    }
}

fn generation_error(err: GenerateError) -> String {
    debug!(error = ?err, "Generation failed");
    let message = err.user_message();
    match message.strip_prefix("Error: ") {
        Some(detail) => detail.to_string(),
        None => message,
    }
}

// ---------------------------------------------------------------------------
// session / export
// ---------------------------------------------------------------------------

fn run_session(args: SessionArgs) -> Result<(), String> {
    match args.operation {
        SessionOperation::Show(a) => run_session_show(a),
        SessionOperation::List(a) => run_session_list(a),
        SessionOperation::Purge(a) => run_session_purge(a),
    }
}

fn run_session_show(args: SessionShowArgs) -> Result<(), String> {
    let config = load_config(&args.store)?;
    let store = open_store(&args.store, &config)?;
    let record = find_session(&store, &args.id)?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record)
                .map_err(|e| format!("Failed to serialize session: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&record)
                .map_err(|e| format!("Failed to serialize session: {e}"))?;
            println!("{yaml}");
        }
        format => {
            println!("Session: {}", record.id);
            println!("Created: {}", record.created_at);
            println!("Updated: {}", record.updated_at);
            match &record.bundle {
                Some(bundle) => println!("\n{}", format_bundle(bundle, format)?),
                None => println!("Challenge: {}\n(no results yet)", record.challenge),
            }
        }
    }
    Ok(())
}

fn run_session_list(args: SessionListArgs) -> Result<(), String> {
    let config = load_config(&args.store)?;
    let store = open_store(&args.store, &config)?;
    let sessions = store
        .list_sessions()
        .map_err(|e| format!("Failed to list sessions: {e}"))?;

    if sessions.is_empty() {
        println!("No sessions stored.");
        return Ok(());
    }
    for record in &sessions {
        let status = if record.bundle.is_some() { "results" } else { "empty" };
        println!(
            "{}  {}  {:<7}  {}",
            record.id,
            record.created_at,
            status,
            truncate(&record.challenge, 60)
        );
    }
    Ok(())
}

fn run_session_purge(args: SessionPurgeArgs) -> Result<(), String> {
    let config = load_config(&args.store)?;
    let store = open_store(&args.store, &config)?;
    let days = args.retention_days.unwrap_or(config.session.retention_days);
    let removed = store
        .purge_expired_sessions(days)
        .map_err(|e| format!("Purge failed: {e}"))?;
    println!("Purged {removed} session(s) older than {days} day(s).");
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), String> {
    let config = load_config(&args.store)?;
    let store = open_store(&args.store, &config)?;
    let record = find_session(&store, &args.id)?;
    let bundle = record
        .bundle
        .ok_or_else(|| format!("Session '{}' has no results yet", args.id))?;

    let text = export_markdown(&bundle);
    match &args.output {
        Some(path) => {
            create_parent_dir(path)?;
            fs::write(path, text)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!("Exported session '{}' to '{}'.", args.id, path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failed = 0usize;
    for path in &args.inputs {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
        let bundle: IdeaBundle = serde_json::from_str(&raw)
            .map_err(|err| format!("Invalid bundle JSON in '{}': {err}", path.display()))?;

        let errors = validate_bundle(&bundle, args.count);
        if !errors.is_empty() {
            failed += 1;
            for error in &errors {
                eprintln!("{}: {error}", path.display());
            }
        }
    }

    if failed > 0 {
        return Err(format!(
            "{failed} of {} bundle file(s) failed validation",
            args.inputs.len()
        ));
    }
    println!("Validated {} bundle file(s).", args.inputs.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(options: &StoreOptions) -> Result<GeneratorConfig, String> {
    GeneratorConfig::load_or_default(options.config.as_deref()).map_err(|e| {
        let path = options.config.as_deref().unwrap_or(Path::new(""));
        format!("Failed to load config '{}': {e}", path.display())
    })
}

fn open_store(options: &StoreOptions, config: &GeneratorConfig) -> Result<SessionStore, String> {
    let path = options
        .db
        .clone()
        .unwrap_or_else(|| config.session.database.clone());
    SessionStore::open(&path, config.session.table_prefix.as_str())
        .map_err(|e| format!("Failed to open session database '{}': {e}", path.display()))
}

fn find_session(store: &SessionStore, id: &str) -> Result<SessionRecord, String> {
    store
        .get_session(id)
        .map_err(|e| format!("Failed to load session '{id}': {e}"))?
        .ok_or_else(|| format!("Session '{id}' not found"))
}

fn create_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let head: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}
