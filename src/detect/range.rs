//! Date span covered by a set of executions.

use serde::{Deserialize, Serialize};

use crate::detect::thresholds::SHORT_HISTORY_DAYS;
use crate::records::ExecutionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub days: i64,
}

impl DateRange {
    fn unavailable() -> Self {
        Self {
            start: "N/A".to_string(),
            end: "N/A".to_string(),
            days: 0,
        }
    }

    /// Less history than the detectors are tuned for.
    pub fn is_short(&self) -> bool {
        self.days < SHORT_HISTORY_DAYS
    }
}

/// First and last creation date (`M/D/YYYY`) and the whole days between them,
/// rounded up. Unparsable timestamps are ignored.
pub fn date_range(executions: &[ExecutionRecord]) -> DateRange {
    let mut stamps = executions.iter().filter_map(ExecutionRecord::created);
    let Some(first) = stamps.next() else {
        return DateRange::unavailable();
    };
    let (min, max) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));

    let millis = (max - min).num_milliseconds();
    let days = (millis as f64 / 86_400_000.0).ceil() as i64;
    DateRange {
        start: min.format("%-m/%-d/%Y").to_string(),
        end: max.format("%-m/%-d/%Y").to_string(),
        days,
    }
}
