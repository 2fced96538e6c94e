//! Unused workflows and forms.

use std::collections::HashSet;

use crate::detect::aggregate::Grouped;
use crate::detect::thresholds::ACTIVITY_CAP;
use crate::detect::{Insight, InsightKind, ResourceRef, Severity};
use crate::records::{ExecutionRecord, FormRecord, WorkflowRecord};

/// Up to five idle workflows followed by up to five forms nobody submitted.
pub fn detect(
    workflows: &[&WorkflowRecord],
    grouped: &Grouped<'_>,
    executions: &[ExecutionRecord],
    forms: &[FormRecord],
) -> Vec<Insight> {
    let mut found: Vec<Insight> = workflows
        .iter()
        .filter(|w| !grouped.by_workflow.contains_key(&w.id))
        .take(ACTIVITY_CAP)
        .map(|w| {
            Insight::new(
                InsightKind::NoExecutions,
                Severity::Low,
                "No executions".to_string(),
                format!("{} has not run in the selected period.", w.name),
            )
            .for_workflow(ResourceRef {
                id: w.id.clone(),
                name: w.name.clone(),
                link: w.link.clone(),
            })
        })
        .collect();

    let submitted: HashSet<&str> = executions
        .iter()
        .filter_map(ExecutionRecord::submitted_form_id)
        .collect();

    found.extend(
        forms
            .iter()
            .filter(|f| !submitted.contains(f.id.as_str()))
            .take(ACTIVITY_CAP)
            .map(|f| {
                Insight::new(
                    InsightKind::UnusedForm,
                    Severity::Low,
                    "No submissions".to_string(),
                    format!("{} has not been submitted in the selected period.", f.name),
                )
                .for_form(ResourceRef {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    link: f.link.clone(),
                })
            }),
    );
    found
}
