//! Small statistics helpers used by the spike and drop detectors.

use crate::detect::thresholds::{HISTORY_SPLIT_RATIO, MIN_SPAN_DAYS};
use crate::records::ExecutionRecord;

/// A simple series of samples.
pub struct TimeSeries {
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Tasks consumed by each execution, in the order given.
    pub fn tasks_of(executions: &[&ExecutionRecord]) -> Self {
        Self::new(executions.iter().map(|e| e.tasks()).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Copy of `executions` ordered by creation time, oldest first.
/// Records with an unusable creation timestamp sort to the front.
pub fn chronological<'a>(executions: &[&'a ExecutionRecord]) -> Vec<&'a ExecutionRecord> {
    let mut sorted = executions.to_vec();
    sorted.sort_by_key(|e| e.created());
    sorted
}

/// Split a sample into (historical, recent) at the 70th-percentile index.
pub fn split_history<'a>(
    executions: &[&'a ExecutionRecord],
) -> (Vec<&'a ExecutionRecord>, Vec<&'a ExecutionRecord>) {
    let mut sorted = chronological(executions);
    let cut = (sorted.len() as f64 * HISTORY_SPLIT_RATIO).floor() as usize;
    let recent = sorted.split_off(cut);
    (sorted, recent)
}

/// Executions per day across the span of a chronological segment.
/// Spans shorter than a day count as one day.
pub fn daily_rate(segment: &[&ExecutionRecord]) -> f64 {
    if segment.is_empty() {
        return 0.0;
    }
    let first = segment.first().and_then(|e| e.created());
    let last = segment.last().and_then(|e| e.created());
    let span_days = match (first, last) {
        (Some(a), Some(b)) => (b - a).num_milliseconds() as f64 / 86_400_000.0,
        _ => 0.0,
    };
    segment.len() as f64 / span_days.max(MIN_SPAN_DAYS)
}

/// Percentage increase from `baseline` to `current`; zero for a zero baseline.
pub fn pct_increase(baseline: f64, current: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (current - baseline) / baseline * 100.0
}

/// Percentage decrease from `baseline` to `current`; zero for a zero baseline.
pub fn pct_decrease(baseline: f64, current: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (baseline - current) / baseline * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_at(day: u32, tasks: f64) -> ExecutionRecord {
        ExecutionRecord {
            id: format!("e{}", day),
            created_at: Some(format!("2024-03-{:02}T12:00:00Z", day)),
            tasks_used: Some(tasks),
            ..Default::default()
        }
    }

    #[test]
    fn test_mean() {
        let ts = TimeSeries::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ts.mean(), 3.0);
        assert_eq!(TimeSeries::new(vec![]).mean(), 0.0);
    }

    #[test]
    fn test_split_is_seventy_thirty_and_chronological() {
        let execs: Vec<ExecutionRecord> = (1..=10).rev().map(|d| exec_at(d, d as f64)).collect();
        let refs: Vec<&ExecutionRecord> = execs.iter().collect();
        let (historical, recent) = split_history(&refs);
        assert_eq!(historical.len(), 7);
        assert_eq!(recent.len(), 3);
        assert_eq!(historical[0].id, "e1");
        assert_eq!(recent[2].id, "e10");
        // Caller's order untouched.
        assert_eq!(refs[0].id, "e10");
    }

    #[test]
    fn test_daily_rate_uses_minimum_span() {
        let execs = [exec_at(1, 0.0), exec_at(1, 0.0), exec_at(1, 0.0)];
        let refs: Vec<&ExecutionRecord> = execs.iter().collect();
        assert_eq!(daily_rate(&refs), 3.0);

        let spread = [exec_at(1, 0.0), exec_at(5, 0.0)];
        let refs: Vec<&ExecutionRecord> = spread.iter().collect();
        assert_eq!(daily_rate(&refs), 0.5);
    }

    #[test]
    fn test_pct_helpers_guard_zero() {
        assert_eq!(pct_increase(10.0, 25.0), 150.0);
        assert_eq!(pct_decrease(10.0, 1.0), 90.0);
        assert_eq!(pct_increase(0.0, 5.0), 0.0);
        assert_eq!(pct_decrease(0.0, 5.0), 0.0);
    }
}
