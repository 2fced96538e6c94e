//! Attention detectors: failures, usage spikes, and drops.

use std::cmp::Ordering;

use crate::detect::aggregate::{Grouped, WorkflowAggregate};
use crate::detect::anomaly::{chronological, daily_rate, pct_decrease, pct_increase, split_history, TimeSeries};
use crate::detect::thresholds::*;
use crate::detect::{Insight, InsightKind, Severity};
use crate::records::ExecutionRecord;

/// Run every attention rule over the grouped data.
///
/// High failure rate findings are ordered by failure rate (then failed count).
/// Consecutive failures, spikes and drops follow in detection order.
pub fn detect(grouped: &Grouped<'_>) -> Vec<Insight> {
    let mut found: Vec<Insight> = grouped.by_workflow.values().filter_map(high_failure_rate).collect();
    found.sort_by(by_failure_rate);

    for agg in grouped.by_workflow.values() {
        found.extend(consecutive_failures(agg));
    }
    for agg in grouped.by_workflow.values() {
        found.extend(task_usage_spike(agg));
    }
    found.extend(overall_task_usage_spike(&grouped.executions));
    for agg in grouped.by_workflow.values() {
        found.extend(execution_rate_drop(agg));
        found.extend(task_usage_drop(agg));
    }
    found
}

fn by_failure_rate(a: &Insight, b: &Insight) -> Ordering {
    let rate_a = a.failure_rate.unwrap_or(0.0);
    let rate_b = b.failure_rate.unwrap_or(0.0);
    rate_b
        .partial_cmp(&rate_a)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.failed_count.unwrap_or(0).cmp(&a.failed_count.unwrap_or(0)))
}

pub fn high_failure_rate(agg: &WorkflowAggregate<'_>) -> Option<Insight> {
    let total = agg.total();
    if total < FAILURE_RATE_MIN_EXECUTIONS {
        return None;
    }
    let rate = agg.failed as f64 / total as f64 * 100.0;
    if rate < FAILURE_RATE_PCT {
        return None;
    }
    let severity = if rate >= FAILURE_RATE_CRITICAL_PCT {
        Severity::Critical
    } else {
        Severity::High
    };
    let mut insight = Insight::new(
        InsightKind::HighFailureRate,
        severity,
        format!("{:.0}% failure rate", rate),
        format!(
            "{} failed {} of {} executions ({:.1}%).",
            agg.name, agg.failed, total, rate
        ),
    )
    .for_workflow(agg.resource());
    insight.failure_rate = Some(rate);
    insight.failed_count = Some(agg.failed);
    insight.execution_count = Some(total);
    Some(insight)
}

pub fn consecutive_failures(agg: &WorkflowAggregate<'_>) -> Option<Insight> {
    let mut newest_first = chronological(&agg.executions);
    newest_first.reverse();
    let streak = newest_first
        .iter()
        .take(CONSECUTIVE_WINDOW)
        .take_while(|e| e.is_failed())
        .count();
    if streak < CONSECUTIVE_MIN_STREAK {
        return None;
    }
    let mut insight = Insight::new(
        InsightKind::ConsecutiveFailures,
        Severity::High,
        format!("{} consecutive failures", streak),
        format!(
            "The last {} executions of {} all failed.",
            streak, agg.name
        ),
    )
    .for_workflow(agg.resource());
    insight.failed_count = Some(streak);
    Some(insight)
}

pub fn task_usage_spike(agg: &WorkflowAggregate<'_>) -> Option<Insight> {
    if agg.total() < SPIKE_MIN_EXECUTIONS {
        return None;
    }
    let (historical, recent) = split_history(&agg.executions);
    if historical.len() < SPIKE_MIN_HISTORICAL || recent.len() < SPIKE_MIN_RECENT {
        return None;
    }
    let before = TimeSeries::tasks_of(&historical).mean();
    let after = TimeSeries::tasks_of(&recent).mean();
    if before <= 0.0 || after < before * SPIKE_RATIO {
        return None;
    }
    let increase = pct_increase(before, after);
    let severity = if increase >= SPIKE_CRITICAL_PCT {
        Severity::Critical
    } else {
        Severity::High
    };
    let mut insight = Insight::new(
        InsightKind::TaskUsageSpike,
        severity,
        format!("Task usage up {:.0}%", increase),
        format!(
            "{} now averages {:.1} tasks per run, up from {:.1}.",
            agg.name, after, before
        ),
    )
    .for_workflow(agg.resource());
    insight.change_pct = Some(increase);
    insight.execution_count = Some(agg.total());
    Some(insight)
}

/// Dashboard-wide variant of [`task_usage_spike`] across every execution.
pub fn overall_task_usage_spike(executions: &[&ExecutionRecord]) -> Option<Insight> {
    if executions.len() < OVERALL_SPIKE_MIN_EXECUTIONS {
        return None;
    }
    let (historical, recent) = split_history(executions);
    let before = TimeSeries::tasks_of(&historical).mean();
    let after = TimeSeries::tasks_of(&recent).mean();
    if before <= 0.0 || after < before * OVERALL_SPIKE_RATIO {
        return None;
    }
    let increase = pct_increase(before, after);
    let severity = if increase >= OVERALL_SPIKE_HIGH_PCT {
        Severity::High
    } else {
        Severity::Medium
    };
    let mut insight = Insight::new(
        InsightKind::OverallTaskUsageSpike,
        severity,
        format!("Overall task usage up {:.0}%", increase),
        format!(
            "Recent executions average {:.1} tasks per run across all workflows, up from {:.1}.",
            after, before
        ),
    );
    insight.change_pct = Some(increase);
    insight.execution_count = Some(executions.len());
    Some(insight)
}

pub fn execution_rate_drop(agg: &WorkflowAggregate<'_>) -> Option<Insight> {
    if agg.total() < RATE_DROP_MIN_EXECUTIONS {
        return None;
    }
    let (historical, recent) = split_history(&agg.executions);
    if historical.len() < RATE_DROP_MIN_HISTORICAL || recent.len() < RATE_DROP_MIN_RECENT {
        return None;
    }
    let before = daily_rate(&historical);
    let after = daily_rate(&recent);
    if before < RATE_DROP_MIN_DAILY_RATE || after >= before * RATE_DROP_RATIO {
        return None;
    }
    let drop = pct_decrease(before, after);
    let severity = if drop >= RATE_DROP_HIGH_PCT {
        Severity::High
    } else {
        Severity::Medium
    };
    let mut insight = Insight::new(
        InsightKind::ExecutionRateDrop,
        severity,
        format!("Execution rate down {:.0}%", drop),
        format!(
            "{} runs {:.1} times per day, down from {:.1}.",
            agg.name, after, before
        ),
    )
    .for_workflow(agg.resource());
    insight.change_pct = Some(drop);
    insight.execution_count = Some(agg.total());
    Some(insight)
}

pub fn task_usage_drop(agg: &WorkflowAggregate<'_>) -> Option<Insight> {
    if agg.total() < TASK_DROP_MIN_EXECUTIONS {
        return None;
    }
    let (historical, recent) = split_history(&agg.executions);
    if historical.len() < TASK_DROP_MIN_HISTORICAL || recent.len() < TASK_DROP_MIN_RECENT {
        return None;
    }
    let before = TimeSeries::tasks_of(&historical).mean();
    if before < TASK_DROP_MIN_BASELINE {
        return None;
    }
    let after = TimeSeries::tasks_of(&recent).mean();
    let drop = pct_decrease(before, after);

    let (severity, title, description) = if after < TASK_DROP_ZERO_MEAN {
        (
            Severity::Critical,
            "Task usage dropped to zero".to_string(),
            format!(
                "{} used {:.1} tasks per run and now uses almost none. It may have stopped doing work.",
                agg.name, before
            ),
        )
    } else if after < before * TASK_DROP_RATIO {
        let severity = if drop >= TASK_DROP_HIGH_PCT {
            Severity::High
        } else {
            Severity::Medium
        };
        (
            severity,
            format!("Task usage down {:.0}%", drop),
            format!(
                "{} now averages {:.1} tasks per run, down from {:.1}.",
                agg.name, after, before
            ),
        )
    } else {
        return None;
    };

    let mut insight = Insight::new(InsightKind::TaskUsageDrop, severity, title, description)
        .for_workflow(agg.resource());
    insight.change_pct = Some(drop);
    insight.execution_count = Some(agg.total());
    Some(insight)
}
