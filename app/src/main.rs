// In app/src/main.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use api_client::{LogReplaySource, SnapshotSource};
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::{Column, SortState};
use engine::{Dashboard, Normalizer, RefreshTask};
use signals::SignalClassifier;
use store::{FileStore, KeyValueStore, MemoryStore, SnapshotLog};
use tracing_subscriber::prelude::*;
use web_server::AppState;

mod table;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Ranks crypto assets by market data and technical signals.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the periodic refresh task and the dashboard web server.
    Run {
        /// Replay today's snapshot log instead of calling the API.
        #[arg(long)]
        offline: bool,
    },

    /// Fetches one snapshot and prints the ranked table.
    Fetch,

    /// Ranks the last snapshot of a log file and prints the table.
    Rank {
        /// Path to a `coingecko-YYYY-MM-DD.json` log file.
        #[arg(short, long)]
        file: PathBuf,

        /// Column to sort by (e.g. "price", "marketCap", "trendPct").
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort low to high instead of high to low.
        #[arg(long)]
        ascending: bool,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Starting coin ranker");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Run { offline } => run_app(settings, offline).await?,
        Commands::Fetch => handle_fetch(settings).await?,
        Commands::Rank {
            file,
            sort,
            ascending,
        } => handle_rank(settings, file, sort, ascending)?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn normalizer(settings: &Settings) -> Normalizer {
    Normalizer::new(
        SignalClassifier::new(settings.signals.clone()),
        settings.indicators.clone(),
    )
}

// --- "Run" Subcommand Logic ---

/// Starts the refresh task and the web server. Runs until one of them stops.
async fn run_app(settings: Settings, offline: bool) -> Result<()> {
    let prefs: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&settings.storage.preferences_path));
    let dashboard = Dashboard::new(prefs, normalizer(&settings)).shared();
    let log = SnapshotLog::new(&settings.storage.log_dir);

    let source: Arc<dyn SnapshotSource> = if offline {
        tracing::warn!(dir = %log.dir().display(), "Offline mode: replaying the snapshot log.");
        Arc::new(LogReplaySource::new(log.clone()))
    } else {
        Arc::new(api_client::new(&settings.coingecko)?)
    };
    let task_log = (settings.storage.log_snapshots && !offline).then(|| log.clone());
    let interval = Duration::from_secs(settings.poller.interval_secs.max(1));

    let refresh_task = RefreshTask::new(source, dashboard.clone(), task_log, interval);
    let app_state = AppState { dashboard, log };

    tracing::info!("Launching refresh task and web server...");
    let refresh_handle = tokio::spawn(async move { refresh_task.run().await });
    let server_handle =
        tokio::spawn(async move { web_server::run(&settings.server, app_state).await });

    // In a healthy state, neither task completes.
    tokio::select! {
        refresh_result = refresh_handle => {
            tracing::error!(?refresh_result, "Refresh task has terminated unexpectedly.");
        }
        server_result = server_handle => {
            tracing::error!(?server_result, "Web server task has terminated unexpectedly.");
        }
    }

    anyhow::bail!("A critical task terminated. Shutting down.");
}

// --- "Fetch" Subcommand Logic ---

async fn handle_fetch(settings: Settings) -> Result<()> {
    let client = api_client::new(&settings.coingecko)?;
    let snapshot = client.latest_snapshot().await?;

    if settings.storage.log_snapshots {
        let path = SnapshotLog::new(&settings.storage.log_dir).append(&snapshot)?;
        tracing::info!(path = %path.display(), "Snapshot logged.");
    }

    let prefs: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&settings.storage.preferences_path));
    let mut dashboard = Dashboard::new(prefs, normalizer(&settings));
    let view = dashboard.refresh(&snapshot)?;
    print!("{}", table::render(&view));
    Ok(())
}

// --- "Rank" Subcommand Logic ---

/// Ranks a logged snapshot without touching the persisted preferences.
fn handle_rank(settings: Settings, file: PathBuf, sort: Option<String>, ascending: bool) -> Result<()> {
    let Some(snapshot) = store::snapshot_log::read_latest(&file)? else {
        anyhow::bail!("No snapshot found in {}", file.display());
    };

    let prefs: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
    if let Some(name) = sort {
        let column: Column = name.parse()?;
        let Some(key) = column.sort_key() else {
            anyhow::bail!("Column '{}' cannot be sorted", column);
        };
        store::set_json(prefs.as_ref(), engine::ranking::SORT_STATE_KEY, &SortState { key, ascending })?;
    }

    let mut dashboard = Dashboard::new(prefs, normalizer(&settings));
    let view = dashboard.refresh(&snapshot)?;
    print!("{}", table::render(&view));
    Ok(())
}
