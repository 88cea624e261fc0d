//! # TaskNet Workspace CLI (`tasknet`)
//!
//! ## Usage
//!
//! ```bash
//! tasknet --config ./config/tasknet.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tasknet init` | Create the SQLite database and its tables |
//! | `tasknet search "<query>"` | Search all workspace content |
//! | `tasknet serve` | Start the HTTP search server |
//! | `tasknet export` | Dump the workspace as a JSON snapshot |
//! | `tasknet import <file>` | Load a JSON snapshot (upsert by id) |
//! | `tasknet stats` | Show per-table row counts |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tasknet::{config, export, import, logging, migrate, search, server, stats};

/// TaskNet Workspace search: one query across notes, tasks, projects,
/// wikis and documents.
#[derive(Parser)]
#[command(
    name = "tasknet",
    about = "TaskNet Workspace: enterprise search across notes, tasks, projects, wikis and documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/tasknet.toml`. See
    /// `config/tasknet.example.toml` for every setting.
    #[arg(long, global = true, default_value = "./config/tasknet.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it multiple times is safe.
    Init,

    /// Search workspace content.
    Search {
        /// The search query string.
        query: String,

        /// Restrict to one content type: `all`, `notes`, `tasks`,
        /// `projects`, `wikis` or `documents`.
        #[arg(long = "type")]
        source_type: Option<String>,

        /// Maximum number of results (clamped to the configured maximum).
        #[arg(long)]
        limit: Option<i64>,

        /// Print the full JSON response instead of a listing.
        #[arg(long)]
        json: bool,

        /// Search a snapshot file in memory instead of the database.
        #[arg(long, value_name = "SNAPSHOT")]
        offline: Option<PathBuf>,
    },

    /// Start the HTTP search server on `[server].bind`.
    Serve,

    /// Export all records as a JSON snapshot.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a JSON snapshot, overwriting records with the same id.
    Import {
        /// Snapshot file produced by `tasknet export`.
        file: PathBuf,
    },

    /// Show database statistics.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Offline search works without a config file, but a config file that
    // exists must still parse.
    let cfg = match &cli.command {
        Commands::Search {
            offline: Some(_), ..
        } if !cli.config.exists() => config::Config::minimal(),
        _ => config::load_config(&cli.config)?,
    };
    logging::init_tracing(&cfg.logging);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Search {
            query,
            source_type,
            limit,
            json,
            offline,
        } => {
            search::run_search(
                &cfg,
                &query,
                source_type.as_deref(),
                limit,
                json,
                offline.as_deref(),
            )
            .await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref()).await?;
        }
        Commands::Import { file } => {
            import::run_import(&cfg, &file).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
