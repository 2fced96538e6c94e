//! SQLite snapshot store -- schema, import, and windowed loading.

pub mod schema;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use r2d2::Pool as R2D2Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::records::{ExecutionRecord, FormRecord, Snapshot, WorkflowRecord};

/// Connection Pool type
pub type Pool = R2D2Pool<SqliteConnectionManager>;

/// Open (or create) the SQLite database and return a connection pool.
pub fn open_pool(path: &str) -> Result<Pool> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.execute_batch(
            "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA temp_store = MEMORY;
                 PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = R2D2Pool::new(manager)?;

    // Run migrations on a single connection
    let conn = pool.get()?;
    schema::migrate(&conn)?;

    Ok(pool)
}

/// Rows written by [`import_snapshot`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub workflows: usize,
    pub executions: usize,
    pub forms: usize,
}

/// Upsert every record of `snapshot`, keyed by id, in one transaction.
pub fn import_snapshot(pool: &Pool, snapshot: &Snapshot) -> Result<ImportSummary> {
    let mut conn = pool.get()?;
    let tx = conn.transaction()?;

    for w in &snapshot.workflows {
        tx.execute(
            "INSERT OR REPLACE INTO workflows (id, record_json) VALUES (?1, ?2)",
            params![w.id, serde_json::to_string(w)?],
        )
        .with_context(|| format!("failed to store workflow {}", w.id))?;
    }
    for f in &snapshot.forms {
        tx.execute(
            "INSERT OR REPLACE INTO forms (id, record_json) VALUES (?1, ?2)",
            params![f.id, serde_json::to_string(f)?],
        )
        .with_context(|| format!("failed to store form {}", f.id))?;
    }
    for e in &snapshot.executions {
        let created_ms = e.created().map(|t| t.timestamp_millis());
        tx.execute(
            "INSERT OR REPLACE INTO executions (id, workflow_id, created_ms, record_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![e.id, e.workflow.id, created_ms, serde_json::to_string(e)?],
        )
        .with_context(|| format!("failed to store execution {}", e.id))?;
    }
    tx.commit()?;

    let summary = ImportSummary {
        workflows: snapshot.workflows.len(),
        executions: snapshot.executions.len(),
        forms: snapshot.forms.len(),
    };
    info!(?summary, "Imported snapshot");
    Ok(summary)
}

/// Load all workflows and forms plus the executions created in the last
/// `days` days. Without a window every execution is loaded; with one,
/// executions lacking a usable creation time are left out. A window reaching
/// past the earliest representable date keeps every dated execution.
pub fn load_window(pool: &Pool, days: Option<u32>) -> Result<Snapshot> {
    let conn = pool.get()?;

    let workflows: Vec<WorkflowRecord> = load_json(&conn, "SELECT record_json FROM workflows ORDER BY id", [])
        .context("failed to load workflows")?;
    let forms: Vec<FormRecord> = load_json(&conn, "SELECT record_json FROM forms ORDER BY id", [])
        .context("failed to load forms")?;

    let executions: Vec<ExecutionRecord> = match days {
        Some(days) => {
            let cutoff = match Utc::now().checked_sub_signed(Duration::days(i64::from(days))) {
                Some(start) => start.timestamp_millis(),
                None => {
                    debug!(days, "Window starts before the earliest date; not bounding it");
                    i64::MIN
                }
            };
            load_json(
                &conn,
                "SELECT record_json FROM executions WHERE created_ms >= ?1 ORDER BY created_ms, id",
                params![cutoff],
            )
        }
        None => load_json(
            &conn,
            "SELECT record_json FROM executions ORDER BY created_ms, id",
            [],
        ),
    }
    .context("failed to load executions")?;

    debug!(
        ?days,
        workflows = workflows.len(),
        executions = executions.len(),
        forms = forms.len(),
        "Loaded snapshot window"
    );
    Ok(Snapshot {
        workflows,
        executions,
        forms,
    })
}

fn load_json<T: DeserializeOwned, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(serde_json::from_str(&r?)?);
    }
    Ok(out)
}
