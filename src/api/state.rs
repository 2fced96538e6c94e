use crate::detect::InsightEngine;
use crate::storage::Pool;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub engine: InsightEngine,
    /// Window used when a request does not pass `days`.
    pub default_days: Option<u32>,
}
