//! Heuristic constants shared by the detectors.

/// Workflow type left out of all analysis unless overridden.
pub const DEFAULT_EXCLUDED_WORKFLOW_TYPE: &str = "system";

/// Fraction of a chronologically sorted sample treated as "historical".
pub const HISTORY_SPLIT_RATIO: f64 = 0.7;

// High failure rate
pub const FAILURE_RATE_MIN_EXECUTIONS: usize = 5;
pub const FAILURE_RATE_PCT: f64 = 30.0;
pub const FAILURE_RATE_CRITICAL_PCT: f64 = 50.0;

// Consecutive failures
pub const CONSECUTIVE_WINDOW: usize = 5;
pub const CONSECUTIVE_MIN_STREAK: usize = 3;

// Per-workflow task usage spike
pub const SPIKE_MIN_EXECUTIONS: usize = 10;
pub const SPIKE_MIN_HISTORICAL: usize = 5;
pub const SPIKE_MIN_RECENT: usize = 3;
pub const SPIKE_RATIO: f64 = 2.0;
pub const SPIKE_CRITICAL_PCT: f64 = 200.0;

// Dashboard-wide task usage spike
pub const OVERALL_SPIKE_MIN_EXECUTIONS: usize = 20;
pub const OVERALL_SPIKE_RATIO: f64 = 1.5;
pub const OVERALL_SPIKE_HIGH_PCT: f64 = 100.0;

// Execution rate drop
pub const RATE_DROP_MIN_EXECUTIONS: usize = 10;
pub const RATE_DROP_MIN_HISTORICAL: usize = 5;
pub const RATE_DROP_MIN_RECENT: usize = 2;
pub const RATE_DROP_MIN_DAILY_RATE: f64 = 1.0;
pub const RATE_DROP_RATIO: f64 = 0.5;
pub const RATE_DROP_HIGH_PCT: f64 = 80.0;
pub const MIN_SPAN_DAYS: f64 = 1.0;

// Task usage drop
pub const TASK_DROP_MIN_EXECUTIONS: usize = 10;
pub const TASK_DROP_MIN_HISTORICAL: usize = 5;
pub const TASK_DROP_MIN_RECENT: usize = 3;
pub const TASK_DROP_MIN_BASELINE: f64 = 5.0;
pub const TASK_DROP_ZERO_MEAN: f64 = 1.0;
pub const TASK_DROP_RATIO: f64 = 0.5;
pub const TASK_DROP_HIGH_PCT: f64 = 80.0;

// Slow workflows
pub const SLOW_MIN_SAMPLES: usize = 5;
pub const SLOW_MEAN_SECS: f64 = 60.0;

// Unused resources, per scan
pub const ACTIVITY_CAP: usize = 5;

/// History shorter than this many days earns a warning in the report.
pub const SHORT_HISTORY_DAYS: i64 = 7;
