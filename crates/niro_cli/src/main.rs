//! `niro` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the local note store.
//! - Dispatch subcommands to `niro_core` use-cases.
//!
//! # Invariants
//! - Logging failures never abort a command.
//! - Summarization failures are reported and the command continues.

mod commands;

use clap::{Parser, Subcommand};
use log::info;
use niro_core::db::open_db;
use niro_core::{
    init_logging, AppConfig, GeminiSummarizer, KvNoteRepository, NoteColor, NoteService,
    SortMode, SqliteKeyValueStore, Summarizer,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "niro")]
#[command(author, version, about = "Local note taking with optional AI summaries")]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite file holding the notes (overrides NIRO_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute log directory (overrides NIRO_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides NIRO_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, optionally filtered and sorted
    List {
        /// Case-insensitive text matched against title and content
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort order: modified|created|title
        #[arg(long, default_value = "modified")]
        sort: SortMode,
    },

    /// Show one note in full
    Show {
        id: String,
    },

    /// Create a note
    New {
        #[arg(short, long, default_value = "")]
        title: String,

        /// Note body; `-` reads it from stdin
        #[arg(short, long, default_value = "")]
        content: String,

        /// Palette color name or hex value
        #[arg(long, value_parser = parse_color, default_value = "red")]
        color: NoteColor,

        /// Append an AI summary of the content before saving
        #[arg(long)]
        summarize: bool,
    },

    /// Edit an existing note; omitted fields are kept
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        /// Note body; `-` reads it from stdin
        #[arg(short, long)]
        content: Option<String>,

        #[arg(long, value_parser = parse_color)]
        color: Option<NoteColor>,

        /// Append an AI summary of the content before saving
        #[arg(long)]
        summarize: bool,
    },

    /// Delete a note after confirmation
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List the color palette
    Colors,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::New { .. } => "new",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Colors => "colors",
        }
    }
}

fn parse_color(value: &str) -> Result<NoteColor, String> {
    NoteColor::parse(value).ok_or_else(|| {
        let names = NoteColor::ALL.map(NoteColor::name).join("|");
        format!("unknown color `{value}`; expected {names} or a palette hex value")
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }
    let log_level = cli.log_level.as_deref().unwrap_or(config.log_level);

    if let Err(err) = init_logging(log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );
    if let Commands::Colors = cli.command {
        commands::colors();
        return Ok(());
    }

    let conn = open_db(&config.db_path)?;
    let store = SqliteKeyValueStore::try_new(&conn)?;
    let mut service = NoteService::load(KvNoteRepository::new(store));
    let gemini = GeminiSummarizer::new(config.gemini.clone());
    let summarizer: &dyn Summarizer = &gemini;

    match cli.command {
        Commands::List { search, sort } => commands::list(&service, &search, sort),
        Commands::Show { id } => commands::show(&service, &id),
        Commands::New {
            title,
            content,
            color,
            summarize,
        } => {
            let edits = commands::DraftEdits {
                title: Some(title),
                content: Some(content),
                color: Some(color),
            };
            commands::create(&mut service, edits, summarize.then_some(summarizer)).await
        }
        Commands::Edit {
            id,
            title,
            content,
            color,
            summarize,
        } => {
            let edits = commands::DraftEdits {
                title,
                content,
                color,
            };
            commands::edit(&mut service, &id, edits, summarize.then_some(summarizer)).await
        }
        Commands::Delete { id, yes } => commands::delete(&mut service, &id, yes),
        Commands::Colors => {
            commands::colors();
            Ok(())
        }
    }
}
