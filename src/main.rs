//! Stock Records CLI
//!
//! Commands:
//! - `load` - ingest a JSON export of daily stock data into the database
//! - `serve` - run the REST API until Ctrl-C

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use stock_records::api::ApiServer;
use stock_records::ingest::{self, IngestMode, DEFAULT_DATA_FILE};
use stock_records::{fetch_config, AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "stock-records",
    about = "Stock Records - daily stock market data loader and REST API"
)]
struct Cli {
    /// SQLite database file. Overrides STOCKS_DATABASE_PATH.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a JSON array of stock records into the database.
    Load {
        /// JSON file to load.
        #[arg(default_value = DEFAULT_DATA_FILE)]
        path: PathBuf,

        /// What to do with records that fail to parse. Overrides STOCKS_INGEST_MODE.
        #[arg(long, value_enum)]
        mode: Option<IngestMode>,
    },
    /// Serve the REST API.
    Serve {
        /// Bind host. Overrides STOCKS_HOST.
        #[arg(long)]
        host: Option<String>,

        /// Bind port. Overrides STOCKS_PORT.
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Layer command line flags over the environment configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(database) = &self.database {
            config.database_path = database.clone();
        }

        match &self.command {
            Commands::Load { mode, .. } => {
                if let Some(mode) = mode {
                    config.ingest_mode = *mode;
                }
            }
            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_records=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = fetch_config().context("failed to read configuration")?;
    cli.apply(&mut config);

    match cli.command {
        Commands::Load { path, .. } => {
            let mode = config.ingest_mode;
            let state = AppState::new(config).context("failed to open database")?;

            // Each skipped record is logged by the loader
            let report = ingest::ingest_file(&state.sqlite, &path, mode)
                .with_context(|| format!("failed to load {}", path.display()))?;

            tracing::info!(
                "Done: {} inserted, {} skipped, {} total",
                report.inserted,
                report.skipped.len(),
                report.total
            );
        }
        Commands::Serve { .. } => {
            let state = Arc::new(AppState::new(config).context("failed to open database")?);

            let mut server = ApiServer::new(state);
            server.start().await.context("failed to start API server")?;

            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;

            tracing::info!("Ctrl-C received, stopping");
            server.shutdown().await;
        }
    }

    Ok(())
}
