use crate::detect::aggregate::{analyzable_workflows, group_executions};
use crate::detect::thresholds::DEFAULT_EXCLUDED_WORKFLOW_TYPE;
use crate::detect::{activity, attention, missing, optimization, Insights};
use crate::records::Snapshot;
use tracing::{debug, info};

/// Turns a snapshot of workflows, executions, and forms into insights.
#[derive(Debug, Clone)]
pub struct InsightEngine {
    excluded_type: String,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self {
            excluded_type: DEFAULT_EXCLUDED_WORKFLOW_TYPE.to_string(),
        }
    }
}

impl InsightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave workflows of `kind` out of the analysis instead of the default.
    pub fn with_excluded_type(mut self, kind: impl Into<String>) -> Self {
        self.excluded_type = kind.into();
        self
    }

    pub fn excluded_type(&self) -> &str {
        &self.excluded_type
    }

    /// Run every detector over the snapshot. Inputs are only read.
    pub fn generate(&self, snapshot: &Snapshot) -> Insights {
        let workflows = analyzable_workflows(&snapshot.workflows, &self.excluded_type);
        let grouped = group_executions(&workflows, &snapshot.executions, &self.excluded_type);
        debug!(
            workflows = workflows.len(),
            grouped = grouped.by_workflow.len(),
            executions = grouped.executions.len(),
            "Grouped executions"
        );

        let insights = Insights {
            attention: attention::detect(&grouped),
            optimization: optimization::detect(&grouped),
            activity: activity::detect(&workflows, &grouped, &snapshot.executions, &snapshot.forms),
            missing: missing::detect(&snapshot.workflows, &grouped),
        };

        info!(
            attention = insights.attention.len(),
            optimization = insights.optimization.len(),
            activity = insights.activity.len(),
            missing = insights.missing.len(),
            "Insight scan complete"
        );
        insights
    }
}
