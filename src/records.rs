//! Input records -- workflows, executions, forms -- and the snapshot bundle
//! handed to the insight engine.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no input data available")]
    NoData,
}

/// Identity of a workflow as embedded in an execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowRef {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Identity of a form as linked from an execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerInfo {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub form_id: Option<String>,
}

/// One workflow run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionRecord {
    pub id: String,
    pub workflow: WorkflowRef,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub tasks_used: Option<f64>,
    pub trigger: Option<TriggerInfo>,
    pub form: Option<FormRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowRecord {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub human_seconds_saved: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRecord {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
}

/// Normalized execution outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Succeeded,
    Failed,
    Other,
}

impl ExecutionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "succeeded" | "success" | "completed" => Self::Succeeded,
            "failed" | "failure" | "error" => Self::Failed,
            _ => Self::Other,
        }
    }
}

impl ExecutionRecord {
    pub fn status(&self) -> ExecutionStatus {
        ExecutionStatus::parse(&self.status)
    }

    pub fn is_failed(&self) -> bool {
        self.status() == ExecutionStatus::Failed
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }

    /// Tasks consumed by this run; a missing counter reads as zero.
    pub fn tasks(&self) -> f64 {
        self.tasks_used.filter(|t| t.is_finite()).unwrap_or(0.0)
    }

    /// Wall-clock runtime in seconds, when both timestamps are usable.
    pub fn runtime_secs(&self) -> Option<f64> {
        let created = self.created()?;
        let updated = self.updated()?;
        Some((updated - created).num_milliseconds() as f64 / 1000.0)
    }

    /// Form this run was submitted through, if it was a form submission.
    pub fn submitted_form_id(&self) -> Option<&str> {
        let trigger = self.trigger.as_ref()?;
        let is_form = trigger
            .kind
            .as_deref()
            .is_some_and(|k| k.trim().eq_ignore_ascii_case("form submission"));
        if !is_form {
            return None;
        }
        trigger
            .form_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.form.as_ref().map(|f| f.id.as_str()).filter(|id| !id.is_empty()))
    }
}

/// Parse a timestamp in any of the formats the upstream exports use:
/// RFC 3339, SQLite `YYYY-MM-DD HH:MM:SS` (UTC), or epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// The three collections the engine works from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub workflows: Vec<WorkflowRecord>,
    pub executions: Vec<ExecutionRecord>,
    pub forms: Vec<FormRecord>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty() && self.executions.is_empty() && self.forms.is_empty()
    }

    /// Callers check this before running the engine.
    pub fn ensure_data(&self) -> Result<(), SnapshotError> {
        if self.is_empty() {
            Err(SnapshotError::NoData)
        } else {
            Ok(())
        }
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_normalization() {
        assert_eq!(ExecutionStatus::parse("SUCCEEDED"), ExecutionStatus::Succeeded);
        assert_eq!(ExecutionStatus::parse("Completed"), ExecutionStatus::Succeeded);
        assert_eq!(ExecutionStatus::parse(" success "), ExecutionStatus::Succeeded);
        assert_eq!(ExecutionStatus::parse("FAILED"), ExecutionStatus::Failed);
        assert_eq!(ExecutionStatus::parse("running"), ExecutionStatus::Other);
        assert_eq!(ExecutionStatus::parse(""), ExecutionStatus::Other);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let a = parse_timestamp("2024-03-05T10:00:00Z").unwrap();
        let b = parse_timestamp("2024-03-05 10:00:00").unwrap();
        let c = parse_timestamp(&a.timestamp_millis().to_string()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_runtime_requires_both_timestamps() {
        let mut exec = ExecutionRecord {
            created_at: Some("2024-03-05T10:00:00Z".into()),
            updated_at: Some("2024-03-05T10:01:30Z".into()),
            ..Default::default()
        };
        assert_eq!(exec.runtime_secs(), Some(90.0));
        exec.updated_at = Some("garbage".into());
        assert_eq!(exec.runtime_secs(), None);
    }

    #[test]
    fn test_submitted_form_falls_back_to_linked_form() {
        let exec = ExecutionRecord {
            trigger: Some(TriggerInfo {
                kind: Some("Form Submission".into()),
                form_id: None,
            }),
            form: Some(FormRef {
                id: "form-1".into(),
                name: None,
            }),
            ..Default::default()
        };
        assert_eq!(exec.submitted_form_id(), Some("form-1"));

        let scheduled = ExecutionRecord {
            trigger: Some(TriggerInfo {
                kind: Some("Schedule".into()),
                form_id: Some("form-2".into()),
            }),
            ..Default::default()
        };
        assert_eq!(scheduled.submitted_form_id(), None);
    }

    #[test]
    fn test_snapshot_json_and_empty_check() {
        let json = r#"{
            "workflows": [{"id": "w1", "name": "Onboard", "type": "standard", "humanSecondsSaved": 120}],
            "executions": [{"id": "e1", "workflow": {"id": "w1", "name": "Onboard"}, "status": "SUCCEEDED",
                            "createdAt": "2024-03-05T10:00:00Z", "tasksUsed": 4}]
        }"#;
        let snap = Snapshot::from_json(json).unwrap();
        assert_eq!(snap.workflows[0].human_seconds_saved, Some(120.0));
        assert_eq!(snap.executions[0].tasks(), 4.0);
        assert!(snap.forms.is_empty());
        assert!(snap.ensure_data().is_ok());
        assert_eq!(Snapshot::default().ensure_data(), Err(SnapshotError::NoData));
    }
}
