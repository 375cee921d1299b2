//! Trickle CLI - Command-line interface for bounded-memory table traversal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trickle::{TrickleConfig, TrickleDb};

mod commands;

#[derive(Parser)]
#[command(name = "trickle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long)]
    db_path: Option<PathBuf>,

    /// Table to read users from
    #[arg(short, long)]
    table: Option<String>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream users one at a time
    Stream {
        /// Stop after this many users
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Stream users in fixed-size batches
    Batches {
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Stream users older than the age threshold, read in batches
    Process {
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Page through users with LIMIT/OFFSET
    Paginate {
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Stop after this many pages
        #[arg(short, long)]
        max_pages: Option<usize>,
    },

    /// Stream the age column
    Ages {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Average age across all users
    Average,
}

fn load_config(cli: &Cli) -> Result<TrickleConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<TrickleConfig>(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => TrickleConfig::new(PathBuf::from("./users.db")),
    };

    if let Some(path) = &cli.db_path {
        config.source.path = path.clone();
    }
    if let Some(table) = &cli.table {
        config.source.table = table.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pure JSON lines
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = load_config(&cli)?;
    let stream_config = config.stream.clone();
    tracing::debug!(
        path = %config.source.path.display(),
        table = %config.source.table,
        "loaded config"
    );
    let db = TrickleDb::open_with_config(config).context("Failed to open database")?;

    let out = commands::JsonLines::stdout();
    let result = match cli.command {
        Commands::Stream { limit } => commands::stream::users(&db, limit, out),
        Commands::Ages { limit } => commands::stream::ages(&db, limit, out),
        Commands::Batches { batch_size } => commands::batches::batches(
            &db,
            batch_size.unwrap_or(stream_config.batch_size),
            out,
        ),
        Commands::Process { batch_size } => commands::batches::process(
            &db,
            batch_size.unwrap_or(stream_config.batch_size),
            out,
        ),
        Commands::Paginate {
            page_size,
            max_pages,
        } => commands::paginate::execute(
            &db,
            page_size.unwrap_or(stream_config.page_size),
            max_pages,
            out,
        ),
        Commands::Average => commands::average::execute(&db, out),
    };

    commands::ignore_broken_pipe(result)
}
