//! ava CLI: Command-line interface for the Ava two-panel chat demo

use ava_engine::{
    best_match, Config, ManualScheduler, PanelId, Panels, Profile, QaDocument, QaTable, Rejection,
    Role, SubmitOutcome,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Two simulated patients chatting with Ava, side by side
#[derive(Parser)]
#[command(name = "ava")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: .ava/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui {
        /// QA document to load
        #[arg(long)]
        qa: Option<PathBuf>,

        /// Write logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Print the answer one panel would give to a question
    Ask {
        /// Panel to ask
        #[arg(value_enum)]
        panel: PanelArg,

        /// Question text
        question: String,

        /// QA document to load
        #[arg(long)]
        qa: Option<PathBuf>,

        /// Also print the matched question and its score
        #[arg(long)]
        explain: bool,
    },

    /// Print both patient profiles
    Profiles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Strictly validate a QA document
    Check {
        /// QA document to check
        #[arg(long)]
        qa: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PanelArg {
    Left,
    Right,
}

impl From<PanelArg> for PanelId {
    fn from(arg: PanelArg) -> Self {
        match arg {
            PanelArg::Left => PanelId::Left,
            PanelArg::Right => PanelId::Right,
        }
    }
}

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    match cli.command {
        None => cmd_tui(&load_config(cli.config.as_deref(), None)?, None),
        Some(Commands::Tui { qa, log_file }) => {
            cmd_tui(&load_config(cli.config.as_deref(), qa)?, log_file.as_deref())
        }
        Some(Commands::Ask {
            panel,
            question,
            qa,
            explain,
        }) => {
            init_stderr_logging()?;
            cmd_ask(
                &load_config(cli.config.as_deref(), qa)?,
                panel.into(),
                &question,
                explain,
            )
        }
        Some(Commands::Profiles { json }) => {
            init_stderr_logging()?;
            cmd_profiles(json)
        }
        Some(Commands::Check { qa, json }) => {
            init_stderr_logging()?;
            cmd_check(&load_config(cli.config.as_deref(), qa)?, json)
        }
    }
}

/// Load the config file (or defaults) and apply a `--qa` override.
fn load_config(config_path: Option<&Path>, qa: Option<PathBuf>) -> CliResult<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::path_in(&std::env::current_dir()?),
    };
    let mut config = Config::load_or_default(&path)?;
    if let Some(qa) = qa {
        config.qa_path = qa;
    }
    debug!(config = %path.display(), qa = %config.qa_path.display(), "config loaded");
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() -> CliResult {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e as Box<dyn Error>)
}

fn init_file_logging(path: &Path) -> CliResult {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn Error>)
}

fn cmd_tui(config: &Config, log_file: Option<&Path>) -> CliResult {
    // The terminal belongs to the UI; logs go to a file or nowhere.
    if let Some(path) = log_file {
        init_file_logging(path)?;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let document = QaDocument::fetch(&config.qa_path).await;
        let panels = Panels::from_document(document, config.reply_delay);
        ava_tui::run_tui(panels, config.tick_rate_ms).await
    })
}

fn cmd_ask(config: &Config, panel: PanelId, question: &str, explain: bool) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    let document = rt.block_on(QaDocument::fetch(&config.qa_path));
    let mut panels = Panels::from_document(document, config.reply_delay);

    let reply = ask(&mut panels, panel, question)?;
    println!("{reply}");

    if explain {
        println!();
        println!("{}", explain_match(panels.panel(panel).table(), question));
    }
    Ok(())
}

/// Submit `question` to one panel and deliver the reply at once.
fn ask(panels: &mut Panels, panel: PanelId, question: &str) -> CliResult<String> {
    let scheduler = ManualScheduler::new();
    match panels.submit(panel, question, &scheduler) {
        SubmitOutcome::Accepted { ticket } => debug!(%panel, ticket, "question accepted"),
        SubmitOutcome::Rejected(Rejection::EmptyInput) => {
            return Err("question is empty".into());
        }
        SubmitOutcome::Rejected(Rejection::ReplyPending) => {
            return Err(format!("{panel} panel is still replying").into());
        }
    }

    for delivery in scheduler.drain() {
        panels.deliver(delivery);
    }

    panels
        .panel(panel)
        .session()
        .history()
        .last()
        .filter(|message| message.role == Role::Assistant)
        .map(|message| message.text.clone())
        .ok_or_else(|| "no reply was delivered".into())
}

fn explain_match(table: &QaTable, question: &str) -> String {
    match best_match(question, table) {
        Some(m) => format!("Matched: \"{}\" (score {})", m.key, m.score),
        None => "Matched: nothing, default response".to_string(),
    }
}

#[derive(Serialize)]
struct PanelProfile<'a> {
    panel: PanelId,
    profile: &'a Profile,
}

fn cmd_profiles(json: bool) -> CliResult {
    let panels = Panels::from_document(QaDocument::default(), Config::default().reply_delay);

    if json {
        let profiles: Vec<PanelProfile<'_>> = panels
            .iter()
            .map(|panel| PanelProfile {
                panel: panel.id(),
                profile: panel.profile(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    for panel in panels.iter() {
        let profile = panel.profile();
        println!("{} ({} panel)", profile.name, panel.id());
        for (title, items) in profile.sections() {
            println!("  {title}:");
            for item in items {
                println!("    - {item}");
            }
        }
        println!("  Example question: \"{}\"", profile.example);
        println!();
    }
    Ok(())
}

/// Per-panel summary of a validated QA document.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct PanelCheck {
    panel: PanelId,
    list: &'static str,
    entries: usize,
    questions: usize,
    duplicates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    path: PathBuf,
    panels: Vec<PanelCheck>,
}

fn check_document(path: &Path) -> CliResult<CheckReport> {
    let document = QaDocument::load(path)?;
    let panels = PanelId::ALL
        .into_iter()
        .map(|panel| {
            let entries = document.entries(panel);
            PanelCheck {
                panel,
                list: panel.dataset_key(),
                entries: entries.len(),
                questions: QaTable::from_entries(entries.iter().cloned()).len(),
                duplicates: document.duplicate_questions(panel),
            }
        })
        .collect();
    info!(path = %path.display(), "QA document is valid");
    Ok(CheckReport {
        path: path.to_path_buf(),
        panels,
    })
}

fn cmd_check(config: &Config, json: bool) -> CliResult {
    let report = check_document(&config.qa_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} is valid\n", report.path.display());
    for check in &report.panels {
        println!(
            "  {} ({}): {} entries, {} distinct questions",
            check.panel, check.list, check.entries, check.questions
        );
        for duplicate in &check.duplicates {
            println!("    Duplicate: \"{duplicate}\" (last answer wins)");
        }
    }
    Ok(())
}
