//! Grouping pass: roll executions up into one aggregate per workflow.

use std::collections::{BTreeMap, HashMap};

use crate::detect::ResourceRef;
use crate::records::{ExecutionRecord, ExecutionStatus, WorkflowRecord};

/// Per-workflow rollup built from a window of executions.
#[derive(Debug, Clone)]
pub struct WorkflowAggregate<'a> {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
    pub executions: Vec<&'a ExecutionRecord>,
    pub succeeded: usize,
    pub failed: usize,
    pub runtimes: Vec<f64>,
}

impl<'a> WorkflowAggregate<'a> {
    fn new(workflow: &WorkflowRecord) -> Self {
        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            link: workflow.link.clone(),
            executions: Vec::new(),
            succeeded: 0,
            failed: 0,
            runtimes: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.executions.len()
    }

    pub fn resource(&self) -> ResourceRef {
        ResourceRef {
            id: self.id.clone(),
            name: self.name.clone(),
            link: self.link.clone(),
        }
    }

    fn push(&mut self, exec: &'a ExecutionRecord) {
        match exec.status() {
            ExecutionStatus::Succeeded => self.succeeded += 1,
            ExecutionStatus::Failed => self.failed += 1,
            ExecutionStatus::Other => {}
        }
        if let Some(secs) = exec.runtime_secs() {
            self.runtimes.push(secs);
        }
        self.executions.push(exec);
    }
}

/// Aggregates keyed by workflow id, plus every execution that survived filtering.
#[derive(Debug, Default)]
pub struct Grouped<'a> {
    pub by_workflow: BTreeMap<String, WorkflowAggregate<'a>>,
    pub executions: Vec<&'a ExecutionRecord>,
}

pub(crate) fn is_excluded(kind: Option<&str>, excluded_type: &str) -> bool {
    kind.is_some_and(|k| k.trim().eq_ignore_ascii_case(excluded_type))
}

/// Workflows that take part in analysis.
pub fn analyzable_workflows<'a>(
    workflows: &'a [WorkflowRecord],
    excluded_type: &str,
) -> Vec<&'a WorkflowRecord> {
    workflows
        .iter()
        .filter(|w| !is_excluded(w.kind.as_deref(), excluded_type))
        .collect()
}

/// Group executions under their owning workflow.
///
/// Executions of an excluded type, or whose workflow is unknown (deleted or
/// excluded), are dropped.
pub fn group_executions<'a>(
    workflows: &[&WorkflowRecord],
    executions: &'a [ExecutionRecord],
    excluded_type: &str,
) -> Grouped<'a> {
    let known: HashMap<&str, &WorkflowRecord> =
        workflows.iter().map(|w| (w.id.as_str(), *w)).collect();

    let mut grouped = Grouped::default();
    for exec in executions {
        if is_excluded(exec.workflow.kind.as_deref(), excluded_type) {
            continue;
        }
        let Some(workflow) = known.get(exec.workflow.id.as_str()) else {
            continue;
        };
        grouped
            .by_workflow
            .entry(workflow.id.clone())
            .or_insert_with(|| WorkflowAggregate::new(workflow))
            .push(exec);
        grouped.executions.push(exec);
    }
    grouped
}
