//! `schema-annotator`: annotate JSON with Schema.org properties.
//!
//! Without a subcommand an interactive menu is shown. `annotate`,
//! `evaluate` and `prompt` run a single operation and exit.
//!
//! Build: `cargo build --bin schema-annotator --features cli`

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use serde_json::Value;
use tracing::info;

use schema_annotator::eval::load_test_cases;
use schema_annotator::prompt::display_value;
use schema_annotator::{
    AnnotatorError, BackendKind, Config, Decision, JsonSource, Prediction, ReviewMode, Reviewer,
    Suggester, annotate_document,
};

// ── CLI ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "schema-annotator")]
#[command(version = schema_annotator::PKG_VERSION)]
#[command(long_version = schema_annotator::version_string())]
#[command(about = "Annotate JSON keys with Schema.org properties suggested by an LLM")]
struct Args {
    /// path to config.toml
    #[arg(short, long, env = "SCHEMA_ANNOTATOR_CONFIG")]
    config: Option<PathBuf>,

    /// backend to use: "local" or "remote" (overrides config)
    #[arg(long)]
    backend: Option<BackendKind>,

    /// model name (overrides the selected backend's config)
    #[arg(short, long)]
    model: Option<String>,

    /// backend base URL (overrides the selected backend's config)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// annotate a JSON document
    Annotate {
        /// JSON text to annotate
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        json: Option<String>,
        /// URL to fetch the JSON document from
        #[arg(long)]
        url: Option<String>,
        /// accept every suggestion without asking
        #[arg(long)]
        auto: bool,
    },
    /// score suggestions against a labeled test-case file
    Evaluate {
        /// test-case file (overrides config)
        #[arg(long)]
        test_cases: Option<PathBuf>,
        /// print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// send a free-form prompt and print the raw reply (connectivity check)
    Prompt {
        /// prompt text (asked for when omitted)
        text: Option<String>,
    },
}

impl Args {
    /// Fold command-line overrides into the loaded config.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(kind) = self.backend {
            config.backend.kind = kind;
        }
        let (model, base_url) = match config.backend.kind {
            BackendKind::Local => (
                &mut config.backend.local.model,
                &mut config.backend.local.base_url,
            ),
            BackendKind::Remote => (
                &mut config.backend.remote.model,
                &mut config.backend.remote.base_url,
            ),
        };
        if let Some(m) = &self.model {
            model.clone_from(m);
        }
        if let Some(url) = &self.base_url {
            base_url.clone_from(url);
        }
    }
}

// ── operator review ─────────────────────────────────────────────────

struct TerminalReviewer;

impl Reviewer for TerminalReviewer {
    fn review(
        &mut self,
        key: &str,
        value: &Value,
        suggestion: &schema_annotator::Result<Prediction>,
    ) -> schema_annotator::Result<Decision> {
        println!();
        println!("🔑 key:        {key}");
        println!("📌 value:      {}", display_value(value));

        let choices: &[&str] = match suggestion {
            Ok(prediction) => {
                println!("🤖 suggestion: {prediction}");
                &["confirm", "edit", "skip"]
            }
            Err(e) => {
                println!("💥 suggestion failed: {e}");
                &["edit", "skip"]
            }
        };

        let picked = Select::new()
            .with_prompt("decision")
            .items(choices)
            .default(0)
            .interact()
            .map_err(terminal_error)?;

        match choices[picked] {
            "confirm" => Ok(Decision::Accept),
            "edit" => {
                let property: String = Input::new()
                    .with_prompt("✏️ new property")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(terminal_error)?;
                Ok(Decision::Override(property))
            }
            _ => Ok(Decision::Skip),
        }
    }
}

fn terminal_error(err: dialoguer::Error) -> AnnotatorError {
    AnnotatorError::Io(std::io::Error::other(err))
}

// ── operations ──────────────────────────────────────────────────────

struct App {
    config: Config,
    suggester: Suggester,
}

impl App {
    async fn annotate(
        &self,
        source: JsonSource,
        mode: ReviewMode<'_>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let doc = source.load(self.config.request_timeout()).await?;

        println!("\n📋 document:");
        println!("{}", serde_json::to_string_pretty(&doc.data)?);

        let dataset = annotate_document(&doc, &self.suggester, mode).await?;

        println!("\n🎯 result:");
        println!("{}", dataset.to_json_pretty()?);
        Ok(())
    }

    async fn evaluate(
        &self,
        test_cases: Option<PathBuf>,
        as_json: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = test_cases.unwrap_or_else(|| self.config.evaluation.test_cases.clone());
        let cases = load_test_cases(&path)?;
        let evaluator = self.config.evaluation.evaluator();

        if !as_json {
            println!(
                "\n🔍 running {} automatic tests...",
                evaluator.batch_len(cases.len())
            );
        }

        let report = evaluator.evaluate(&self.suggester, &cases).await;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("\n{report}");
        }
        Ok(())
    }

    async fn prompt(&self, text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
        let text = match text {
            Some(text) => text,
            None => Input::new()
                .with_prompt("🧠 prompt")
                .interact_text()
                .map_err(terminal_error)?,
        };

        let backend = self.suggester.backend();
        let reply = backend.suggest(&text).await.map_err(|e| {
            format!("could not reach {} backend ({}): {e}", backend.name(), backend.model())
        })?;

        println!("\n🤖 model reply:");
        println!("{reply}");
        Ok(())
    }

    async fn menu(&self) -> Result<(), Box<dyn std::error::Error>> {
        let items = ["process JSON", "run automatic tests", "send a prompt", "exit"];
        loop {
            println!();
            let choice = Select::new()
                .with_prompt("🏠 main menu")
                .items(&items)
                .default(0)
                .interact()?;

            let result = match choice {
                0 => match ask_source() {
                    Ok(source) => {
                        let mut reviewer = TerminalReviewer;
                        self.annotate(source, ReviewMode::Interactive(&mut reviewer))
                            .await
                    }
                    Err(e) => Err(e.into()),
                },
                1 => self.evaluate(None, false).await,
                2 => self.prompt(None).await,
                _ => {
                    println!("\n👋 bye");
                    return Ok(());
                }
            };

            if let Err(e) = result {
                eprintln!("error: {e}");
            }
        }
    }
}

fn ask_source() -> schema_annotator::Result<JsonSource> {
    let picked = Select::new()
        .with_prompt("🔍 how do you want to provide the JSON?")
        .items(&["paste it", "fetch it from a URL"])
        .default(0)
        .interact()
        .map_err(terminal_error)?;

    if picked == 0 {
        let text: String = Input::new()
            .with_prompt("✏️ JSON")
            .interact_text()
            .map_err(terminal_error)?;
        Ok(JsonSource::Manual(text))
    } else {
        let url: String = Input::new()
            .with_prompt("🔗 URL")
            .interact_text()
            .map_err(terminal_error)?;
        Ok(JsonSource::Url(url.trim().to_string()))
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialise tracing (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let app = match build_app(&args) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let result = match args.command {
        None => app.menu().await,
        Some(Command::Annotate { json, url, auto }) => {
            let mut reviewer = TerminalReviewer;
            let mode = if auto {
                ReviewMode::Automatic
            } else {
                ReviewMode::Interactive(&mut reviewer)
            };
            match (json, url) {
                (Some(text), _) => app.annotate(JsonSource::Manual(text), mode).await,
                (None, Some(url)) => app.annotate(JsonSource::Url(url), mode).await,
                (None, None) => Err("one of --json or --url is required".into()),
            }
        }
        Some(Command::Evaluate { test_cases, json }) => app.evaluate(test_cases, json).await,
        Some(Command::Prompt { text }) => app.prompt(text).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn build_app(args: &Args) -> schema_annotator::Result<App> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    let secrets = config.load_secrets()?;
    let backend = config.build_backend(&secrets)?;
    info!(
        version = schema_annotator::version_string(),
        backend = backend.name(),
        model = backend.model(),
        "schema-annotator starting"
    );

    Ok(App {
        config,
        suggester: Suggester::new(backend),
    })
}
