//! Slow-workflow detection.

use std::cmp::Ordering;

use crate::detect::aggregate::Grouped;
use crate::detect::anomaly::TimeSeries;
use crate::detect::thresholds::{SLOW_MEAN_SECS, SLOW_MIN_SAMPLES};
use crate::detect::{Insight, InsightKind, Severity};

/// Workflows whose mean runtime exceeds a minute, slowest first.
pub fn detect(grouped: &Grouped<'_>) -> Vec<Insight> {
    let mut found: Vec<Insight> = grouped
        .by_workflow
        .values()
        .filter(|agg| agg.runtimes.len() >= SLOW_MIN_SAMPLES)
        .filter_map(|agg| {
            let mean = TimeSeries::new(agg.runtimes.clone()).mean();
            if mean <= SLOW_MEAN_SECS {
                return None;
            }
            let mut insight = Insight::new(
                InsightKind::SlowWorkflow,
                Severity::Medium,
                format!("Slow workflow: {} average", format_duration(mean)),
                format!(
                    "{} takes {} per run on average across {} timed executions.",
                    agg.name,
                    format_duration(mean),
                    agg.runtimes.len()
                ),
            )
            .for_workflow(agg.resource());
            insight.avg_runtime_secs = Some(mean);
            insight.execution_count = Some(agg.total());
            Some(insight)
        })
        .collect();

    found.sort_by(|a, b| {
        b.avg_runtime_secs
            .unwrap_or(0.0)
            .partial_cmp(&a.avg_runtime_secs.unwrap_or(0.0))
            .unwrap_or(Ordering::Equal)
    });
    found
}

/// Render seconds as `45s`, `2m 5s`, or `1h 3m`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}h {}m", h, m)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}
