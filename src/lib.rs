//! FlowPulse -- heuristic insights over workflow execution history.
//!
//! This crate provides the insight engine (failure, usage, runtime, and
//! data-quality detectors), a SQLite snapshot store, a text report renderer,
//! and an HTTP API serving the results.

pub mod api;
pub mod config;
pub mod detect;
pub mod records;
pub mod report;
pub mod storage;

pub use detect::{date_range, DateRange, Insight, InsightEngine, Insights, Severity};
pub use records::Snapshot;

use anyhow::Result;

/// Start the HTTP API over the snapshot store at `db_path`.
pub async fn serve(bind: &str, db_path: &str, engine: InsightEngine, default_days: Option<u32>) -> Result<()> {
    tracing::info!(%db_path, "Opening snapshot store");
    let pool = storage::open_pool(db_path)?;

    let state = api::state::AppState {
        pool,
        engine,
        default_days,
    };
    let app = api::router(state);

    let addr: std::net::SocketAddr = bind.parse()?;
    tracing::info!(%addr, "FlowPulse listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
