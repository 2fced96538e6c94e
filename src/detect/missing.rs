//! Workflows without a time-saved estimate.

use crate::detect::aggregate::Grouped;
use crate::detect::{Insight, InsightKind, ResourceRef, Severity};
use crate::records::WorkflowRecord;

/// Every workflow, excluded types included, whose human-seconds-saved value
/// is absent or not positive. Output keeps input order.
pub fn detect(workflows: &[WorkflowRecord], grouped: &Grouped<'_>) -> Vec<Insight> {
    workflows
        .iter()
        .filter(|w| !w.human_seconds_saved.is_some_and(|s| s > 0.0))
        .map(|w| {
            let count = grouped.by_workflow.get(&w.id).map_or(0, |agg| agg.total());
            let mut insight = Insight::new(
                InsightKind::MissingTimeSaved,
                Severity::Info,
                "Missing time saved".to_string(),
                format!(
                    "{} has no time-saved estimate, so its {} execution{} add nothing to time-saved totals.",
                    w.name,
                    count,
                    if count == 1 { "" } else { "s" }
                ),
            )
            .for_workflow(ResourceRef {
                id: w.id.clone(),
                name: w.name.clone(),
                link: w.link.clone(),
            });
            insight.execution_count = Some(count);
            insight
        })
        .collect()
}
