use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flowpulse::config::FlowPulseConfig;
use flowpulse::{InsightEngine, Snapshot};

#[derive(Parser)]
#[command(
    name = "flowpulse",
    about = "Heuristic insights over workflow execution history",
    version,
    long_about = None
)]
struct Cli {
    /// Config file (overrides FLOWPULSE_CONFIG and the system path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute insights for a snapshot
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Show the date range covered by a snapshot
    Range {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Import a snapshot JSON file into the store
    Import {
        /// Snapshot JSON file
        #[arg(long)]
        input: PathBuf,

        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Start the HTTP API
    Serve {
        /// Bind address
        #[arg(long)]
        bind: Option<String>,

        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Snapshot JSON file, already limited to the period of interest
    #[arg(long, conflicts_with = "db")]
    input: Option<PathBuf>,

    /// Database path (defaults to the configured store)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Days of history to load from the database
    #[arg(long)]
    days: Option<u32>,
}

fn init_tracing(cfg: &FlowPulseConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cfg.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    Snapshot::from_json(&content)
        .with_context(|| format!("failed to parse snapshot: {}", path.display()))
}

fn db_path(explicit: Option<PathBuf>, cfg: &FlowPulseConfig) -> Result<String> {
    let path = explicit.unwrap_or_else(|| cfg.storage.db_path.clone());
    path.to_str()
        .map(str::to_string)
        .with_context(|| format!("database path is not valid UTF-8: {}", path.display()))
}

fn load_source(source: SourceArgs, cfg: &FlowPulseConfig) -> Result<Snapshot> {
    let snapshot = match source.input {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading snapshot file");
            read_snapshot(&path)?
        }
        None => {
            let db = db_path(source.db, cfg)?;
            let days = source.days.or(cfg.analysis.window_days);
            tracing::info!(%db, ?days, "Loading snapshot from store");
            let pool = flowpulse::storage::open_pool(&db)?;
            flowpulse::storage::load_window(&pool, days)?
        }
    };
    snapshot.ensure_data()?;
    Ok(snapshot)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = FlowPulseConfig::resolve(cli.config.as_deref())?;
    init_tracing(&cfg);

    let engine = InsightEngine::new().with_excluded_type(cfg.analysis.excluded_workflow_type.clone());

    match cli.command {
        Commands::Analyze { source, json } => {
            let snapshot = load_source(source, &cfg)?;
            let insights = engine.generate(&snapshot);
            let range = flowpulse::date_range(&snapshot.executions);
            if json {
                let output = serde_json::json!({ "range": range, "insights": insights });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", flowpulse::report::format_report(&insights, &range));
            }
        }
        Commands::Range { source } => {
            let snapshot = load_source(source, &cfg)?;
            let range = flowpulse::date_range(&snapshot.executions);
            println!("{} - {} ({} days)", range.start, range.end, range.days);
        }
        Commands::Import { input, db } => {
            let snapshot = read_snapshot(&input)?;
            let db = db_path(db, &cfg)?;
            let pool = flowpulse::storage::open_pool(&db)?;
            let summary = flowpulse::storage::import_snapshot(&pool, &snapshot)?;
            println!(
                "Imported {} workflows, {} executions, {} forms into {}",
                summary.workflows, summary.executions, summary.forms, db
            );
        }
        Commands::Serve { bind, db } => {
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            let db = db_path(db, &cfg)?;
            tracing::info!(%bind, "Starting FlowPulse API");
            flowpulse::serve(&bind, &db, engine, cfg.analysis.window_days).await?;
        }
    }

    Ok(())
}
