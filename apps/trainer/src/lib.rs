pub mod audio;
pub mod commands;
pub mod config;
pub mod db;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use drill_core::DrillKind;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::audio::{CommandSpeech, TerminalBell};
use crate::commands::{words, Console, Drill};
use crate::config::TrainerConfig;
use crate::db::SqliteStore;

#[derive(Parser)]
#[command(name = "vocab-trainer", version, about = "Vocabulary drills in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a word, or another translation of a known word
    Add { word: String, translation: String },
    /// List the newest words and their drill progress
    List {
        #[arg(short, long, help = "Number of words to show")]
        limit: Option<usize>,
    },
    /// Run a drill session
    Drill {
        #[arg(value_enum)]
        kind: DrillArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DrillArg {
    Repetition,
    Listening,
    WordBuilder,
}

impl From<DrillArg> for DrillKind {
    fn from(arg: DrillArg) -> Self {
        match arg {
            DrillArg::Repetition => Self::Repetition,
            DrillArg::Listening => Self::Listening,
            DrillArg::WordBuilder => Self::WordBuilder,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = TrainerConfig::from_env()?;
    let store = open_store(&config.db_path)?;
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Add { word, translation } => {
            words::add(&store, &mut stdout, &word, &translation, Utc::now())
        }
        Command::List { limit } => words::list(&store, &mut stdout, limit),
        Command::Drill { kind } => {
            let drill = Drill {
                storage: Arc::new(store),
                speech: Arc::new(CommandSpeech::new(config.speech_command.clone())),
                effects: Arc::new(TerminalBell),
                config,
            };
            let mut console = Console::new(BufReader::new(tokio::io::stdin()), stdout);
            drill.run(kind.into(), &mut console).await
        }
    }
}

fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tracing::debug!(path = %path.display(), "opening word database");
    SqliteStore::open(path).with_context(|| format!("failed to open {}", path.display()))
}
