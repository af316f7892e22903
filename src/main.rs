//! # Typesense Sync CLI (`tsync`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tsync sync <entity\|all>` | Full sync of one entity (or all) into Typesense |
//! | `tsync schemas push` | Create collections missing from Typesense |
//! | `tsync schemas list` | List collections on the Typesense server |
//! | `tsync entities` | Show entity jobs and their batch sizes |
//!
//! ## Examples
//!
//! ```bash
//! # Create missing collections from ./schemas/*.json
//! tsync schemas push
//!
//! # Sync movies with a smaller batch
//! tsync sync movies --batch-size 20000
//!
//! # Check what a playlist sync would read, without touching Typesense
//! tsync sync playlists --dry-run
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use typesense_sync::config::{self, DEFAULT_CONFIG_PATH};
use typesense_sync::progress::ProgressMode;
use typesense_sync::schemas::{self, SchemaOutcome};
use typesense_sync::entity_list;
use typesense_sync::sync::{self, SyncOptions};

/// Typesense Sync: full batch sync from PostgreSQL into Typesense.
///
/// Connection settings come from an optional TOML file and the environment
/// (`POSTGRES_CONNECTION_STRING`, `TYPESENSE_HOST`, `TYPESENSE_PORT`,
/// `TYPESENSE_PROTOCOL`, `TYPESENSE_API_KEY`). A `.env` file is read if present.
#[derive(Parser)]
#[command(
    name = "tsync",
    about = "Full batch sync from PostgreSQL into Typesense collections",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Optional unless given explicitly.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full sync job.
    ///
    /// Streams every row of the entity's extraction query through a
    /// server-side cursor, reshapes each into a search document, and upserts
    /// them batch by batch. Existing documents are replaced; documents for
    /// deleted rows are left alone.
    Sync {
        /// Entity to sync: `movies`, `persons`, `tv_series`, `playlists`,
        /// `users`, or `all`.
        entity: String,

        /// Rows per fetch and per import request (overrides config).
        #[arg(long)]
        batch_size: Option<usize>,

        /// Fetch and transform without importing anything.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr: `off`, `human`, or `json`.
        /// Defaults to `human` when stderr is a terminal.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Manage collection schemas.
    Schemas {
        #[command(subcommand)]
        action: SchemasAction,
    },

    /// List entity jobs with their target collection and batch size.
    Entities,
}

#[derive(Subcommand)]
enum SchemasAction {
    /// Create every locally defined collection that does not exist yet.
    ///
    /// Existing collections are never modified. A failed create does not
    /// stop the remaining schemas.
    Push {
        /// Directory of `*.json` schema files (overrides config).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Only report which collections would be created.
        #[arg(long)]
        dry_run: bool,
    },

    /// List collections that exist on the server.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path, true)?,
        None => config::load_config(&PathBuf::from(DEFAULT_CONFIG_PATH), false)?,
    };

    match cli.command {
        Commands::Sync {
            entity,
            batch_size,
            dry_run,
            progress,
        } => {
            let options = SyncOptions {
                batch_size,
                dry_run,
                progress: ProgressMode::from_flag(progress.as_deref())?,
            };
            let reports = sync::run_sync(&cfg, &entity, &options).await?;
            let failed = reports.iter().filter(|r| !r.is_ok()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} sync jobs stopped with an error", failed, reports.len());
            }
        }
        Commands::Schemas { action } => match action {
            SchemasAction::Push { dir, dry_run } => {
                let report = schemas::run_push(&cfg, dir, dry_run).await?;
                let failed = report.count(&SchemaOutcome::Failed(String::new()));
                if failed > 0 {
                    anyhow::bail!("{} collection(s) could not be created", failed);
                }
            }
            SchemasAction::List => {
                schemas::run_list(&cfg).await?;
            }
        },
        Commands::Entities => {
            entity_list::list_entities(&cfg);
        }
    }

    Ok(())
}
