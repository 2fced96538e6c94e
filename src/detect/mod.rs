//! Insight detection over a window of workflow executions.

pub mod activity;
pub mod aggregate;
pub mod anomaly;
pub mod attention;
pub mod engine;
pub mod missing;
pub mod optimization;
pub mod range;
pub mod thresholds;

pub use engine::InsightEngine;
pub use range::{date_range, DateRange};

use serde::{Deserialize, Serialize};

/// Severity levels for detected insights, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.pad(s)
    }
}

/// What kind of finding an insight is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    HighFailureRate,
    ConsecutiveFailures,
    TaskUsageSpike,
    OverallTaskUsageSpike,
    ExecutionRateDrop,
    TaskUsageDrop,
    SlowWorkflow,
    NoExecutions,
    UnusedForm,
    MissingTimeSaved,
}

/// Identity of the workflow or form an insight points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub kind: InsightKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<ResourceRef>,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_runtime_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<usize>,
}

impl Insight {
    pub fn new(kind: InsightKind, severity: Severity, title: String, description: String) -> Self {
        Self {
            kind,
            workflow: None,
            form: None,
            title,
            description,
            severity,
            failure_rate: None,
            failed_count: None,
            change_pct: None,
            avg_runtime_secs: None,
            execution_count: None,
        }
    }

    pub fn for_workflow(mut self, workflow: ResourceRef) -> Self {
        self.workflow = Some(workflow);
        self
    }

    pub fn for_form(mut self, form: ResourceRef) -> Self {
        self.form = Some(form);
        self
    }
}

/// All four insight categories for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub attention: Vec<Insight>,
    pub optimization: Vec<Insight>,
    pub activity: Vec<Insight>,
    pub missing: Vec<Insight>,
}

impl Insights {
    pub fn total(&self) -> usize {
        self.attention.len() + self.optimization.len() + self.activity.len() + self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_insight_serializes_without_empty_fields() {
        let insight = Insight::new(
            InsightKind::NoExecutions,
            Severity::Low,
            "No executions".to_string(),
            "Workflow has not run".to_string(),
        );
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"], "no_executions");
        assert_eq!(json["severity"], "low");
        assert!(json.get("failureRate").is_none());
        assert!(json.get("workflow").is_none());
    }
}
