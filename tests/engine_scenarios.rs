use std::collections::HashSet;

use flowpulse::detect::InsightKind;
use flowpulse::records::{ExecutionRecord, FormRecord, TriggerInfo, WorkflowRecord, WorkflowRef};
use flowpulse::{date_range, InsightEngine, Severity, Snapshot};

fn workflow(id: &str, kind: &str, saved: Option<f64>) -> WorkflowRecord {
    WorkflowRecord {
        id: id.to_string(),
        name: format!("Workflow {}", id),
        link: Some(format!("/workflows/{}", id)),
        kind: Some(kind.to_string()),
        human_seconds_saved: saved,
    }
}

fn execution(id: usize, workflow_id: &str, kind: &str, status: &str, day: u32, tasks: f64) -> ExecutionRecord {
    ExecutionRecord {
        id: format!("e{}", id),
        workflow: WorkflowRef {
            id: workflow_id.to_string(),
            name: format!("Workflow {}", workflow_id),
            link: None,
            kind: Some(kind.to_string()),
        },
        status: status.to_string(),
        created_at: Some(format!("2024-04-{:02}T08:00:00Z", day)),
        updated_at: Some(format!("2024-04-{:02}T08:03:00Z", day)),
        tasks_used: Some(tasks),
        trigger: None,
        form: None,
    }
}

/// A month of data touching every detector.
fn busy_month() -> Snapshot {
    let workflows = vec![
        workflow("flaky", "standard", Some(120.0)),
        workflow("growing", "standard", None),
        workflow("internal", "system", Some(0.0)),
        workflow("idle", "standard", Some(60.0)),
    ];

    let mut executions = Vec::new();
    let mut next = 0;
    let mut push = |wf: &str, kind: &str, status: &str, day: u32, tasks: f64, out: &mut Vec<ExecutionRecord>| {
        out.push(execution(next, wf, kind, status, day, tasks));
        next += 1;
    };

    // Half of its runs fail, ending in a streak.
    for day in 1..=10 {
        let status = if day > 5 { "FAILED" } else { "SUCCEEDED" };
        push("flaky", "standard", status, day, 2.0, &mut executions);
    }
    // Task usage climbs sharply in the last third.
    for day in 1..=10 {
        let tasks = if day <= 7 { 5.0 } else { 20.0 };
        push("growing", "standard", "succeeded", day, tasks, &mut executions);
    }
    // Excluded type: would trip every failure rule.
    for day in 1..=10 {
        push("internal", "system", "failed", day, 1.0, &mut executions);
    }
    // Orphan of a deleted workflow.
    push("deleted", "standard", "failed", 3, 1.0, &mut executions);

    let mut submission = execution(999, "growing", "standard", "succeeded", 11, 5.0);
    submission.trigger = Some(TriggerInfo {
        kind: Some("Form Submission".to_string()),
        form_id: Some("used".to_string()),
    });
    executions.push(submission);

    let forms = vec![
        FormRecord {
            id: "used".to_string(),
            name: "Signup".to_string(),
            link: None,
        },
        FormRecord {
            id: "stale".to_string(),
            name: "Survey".to_string(),
            link: None,
        },
    ];

    Snapshot {
        workflows,
        executions,
        forms,
    }
}

#[test]
fn test_every_category_populated() {
    let snapshot = busy_month();
    let insights = InsightEngine::new().generate(&snapshot);

    let kinds: Vec<InsightKind> = insights.attention.iter().map(|i| i.kind).collect();
    assert_eq!(kinds[0], InsightKind::HighFailureRate);
    assert!(kinds.contains(&InsightKind::ConsecutiveFailures));
    assert!(kinds.contains(&InsightKind::TaskUsageSpike));

    let flaky = &insights.attention[0];
    assert_eq!(flaky.workflow.as_ref().unwrap().id, "flaky");
    assert_eq!(flaky.failure_rate, Some(50.0));
    assert_eq!(flaky.severity, Severity::Critical);

    // Every grouped workflow runs three minutes per execution.
    assert_eq!(insights.optimization.len(), 2);
    assert!(insights.optimization.iter().all(|i| i.avg_runtime_secs == Some(180.0)));

    let activity: Vec<(InsightKind, String)> = insights
        .activity
        .iter()
        .map(|i| {
            let id = i.workflow.as_ref().or(i.form.as_ref()).unwrap().id.clone();
            (i.kind, id)
        })
        .collect();
    assert_eq!(
        activity,
        vec![
            (InsightKind::NoExecutions, "idle".to_string()),
            (InsightKind::UnusedForm, "stale".to_string()),
        ]
    );

    let missing: Vec<&str> = insights
        .missing
        .iter()
        .map(|i| i.workflow.as_ref().unwrap().id.as_str())
        .collect();
    assert_eq!(missing, vec!["growing", "internal"]);
    assert_eq!(insights.missing[0].execution_count, Some(11));
    assert_eq!(insights.missing[1].execution_count, Some(0));
}

#[test]
fn test_ids_come_from_filtered_inputs() {
    let snapshot = busy_month();
    let insights = InsightEngine::new().generate(&snapshot);

    let analyzable: HashSet<&str> = snapshot
        .workflows
        .iter()
        .filter(|w| w.kind.as_deref() != Some("system"))
        .map(|w| w.id.as_str())
        .collect();
    let forms: HashSet<&str> = snapshot.forms.iter().map(|f| f.id.as_str()).collect();

    for insight in insights
        .attention
        .iter()
        .chain(&insights.optimization)
        .chain(&insights.activity)
    {
        if let Some(w) = &insight.workflow {
            assert!(analyzable.contains(w.id.as_str()), "unexpected workflow {}", w.id);
        }
        if let Some(f) = &insight.form {
            assert!(forms.contains(f.id.as_str()), "unexpected form {}", f.id);
        }
    }
}

#[test]
fn test_repeat_runs_match_and_leave_input_alone() {
    let snapshot = busy_month();
    let pristine = snapshot.clone();
    let engine = InsightEngine::new();

    let first = engine.generate(&snapshot);
    let second = engine.generate(&snapshot);
    assert_eq!(first, second);
    assert_eq!(snapshot, pristine);
}

#[test]
fn test_date_range_over_month() {
    let snapshot = busy_month();
    let range = date_range(&snapshot.executions);
    assert_eq!(range.start, "4/1/2024");
    assert_eq!(range.end, "4/11/2024");
    assert_eq!(range.days, 10);
    assert!(!range.is_short());
}
