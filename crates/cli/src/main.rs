mod commands;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use commands::Backend;
use std::path::PathBuf;
use uuid::Uuid;

/// Backup medium the in-memory store is restored from and backed up to
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StorageKind {
    Json,
    Sqlite,
}

/// CLI tool to manage personas held in an in-memory store backed by a file
#[derive(Parser, Debug)]
#[command(name = "personas-cli")]
#[command(about = "Manages personas, restoring from and backing up to a JSON or SQLite file")]
struct Cli {
    /// Backup medium
    #[arg(long, value_enum, env = "PERSONAS_STORAGE", default_value = "json")]
    storage: StorageKind,

    /// Path of the backup file
    #[arg(long, env = "PERSONAS_BACKUP_PATH", default_value = "personas.json")]
    backup_path: PathBuf,

    /// Log filter (e.g. `info`, `debug`); defaults to RUST_LOG
    #[arg(long, env = "PERSONAS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every persona
    List,
    /// Show one persona
    Get { id: Uuid },
    /// List personas with the given national ID
    Find { national_id: String },
    /// Add a new persona
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        national_id: String,
    },
    /// Change fields of an existing persona
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        national_id: Option<String>,
    },
    /// Delete a persona
    Delete { id: Uuid },
    /// Print the personas held by the backup medium
    Restore,
    /// Rewrite the backup medium from its own contents
    Backup,
}

impl Command {
    fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add { .. } | Command::Update { .. } | Command::Delete { .. } | Command::Backup
        )
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Instantiate the concrete secondary adapter and restore it into a fresh store
    let backend = Backend::new(cli.storage, cli.backup_path);
    let (mut controller, restored) = commands::open_store(backend)?;

    let stdout = std::io::stdout();
    commands::execute(&mut controller, &restored, cli.command, &mut stdout.lock())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.log_level.as_deref()).context("invalid log level") {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    // Execute the requested command against the restored store
    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
