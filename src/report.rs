//! Plain-text rendering of an insight run.

use crate::detect::{DateRange, Insight, Insights};

/// Format the full insight report for a terminal.
pub fn format_report(insights: &Insights, range: &DateRange) -> String {
    let mut out = String::new();
    out.push_str("\n=== FlowPulse Insights ===\n");
    out.push_str(&format!(
        "Period: {} - {} ({} day{})\n",
        range.start,
        range.end,
        range.days,
        if range.days == 1 { "" } else { "s" }
    ));
    if range.is_short() {
        out.push_str("Warning: less than 7 days of history; trend insights may be unreliable.\n");
    }

    push_section(&mut out, "Needs attention", &insights.attention);
    push_section(&mut out, "Optimization", &insights.optimization);
    push_section(&mut out, "Activity", &insights.activity);
    push_missing(&mut out, &insights.missing);

    if insights.is_empty() {
        out.push_str("\nNo insights for this period.\n");
    }
    out
}

fn push_section(out: &mut String, heading: &str, items: &[Insight]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{} ({})\n", heading, items.len()));
    for item in items {
        out.push_str(&format!("  [{:<8}] {}\n", item.severity, item.title));
        out.push_str(&format!("             {}\n", item.description));
    }
}

fn push_missing(out: &mut String, items: &[Insight]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\nMissing time saved ({})\n", items.len()));
    out.push_str(&format!("  {:<40} | Executions\n", "Workflow"));
    out.push_str(&format!("  {:-<40}-|-{:-<10}\n", "", ""));
    for item in items {
        let name = item.workflow.as_ref().map(|w| w.name.as_str()).unwrap_or("-");
        out.push_str(&format!(
            "  {:<40} | {}\n",
            name,
            item.execution_count.unwrap_or(0)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{InsightKind, ResourceRef, Severity};

    fn range(days: i64) -> DateRange {
        DateRange {
            start: "3/1/2024".to_string(),
            end: "3/20/2024".to_string(),
            days,
        }
    }

    #[test]
    fn test_report_sections() {
        let mut missing = Insight::new(
            InsightKind::MissingTimeSaved,
            Severity::Info,
            "Missing time saved".to_string(),
            "n/a".to_string(),
        )
        .for_workflow(ResourceRef {
            id: "w1".to_string(),
            name: "Invoices".to_string(),
            link: None,
        });
        missing.execution_count = Some(12);

        let insights = Insights {
            attention: vec![Insight::new(
                InsightKind::HighFailureRate,
                Severity::Critical,
                "60% failure rate".to_string(),
                "Invoices failed 3 of 5 executions (60.0%).".to_string(),
            )],
            missing: vec![missing],
            ..Default::default()
        };
        let text = format_report(&insights, &range(19));
        assert!(text.contains("Needs attention (1)"));
        assert!(text.contains("[critical] 60% failure rate"));
        assert!(text.contains("Invoices"));
        assert!(text.contains("| 12"));
        assert!(!text.contains("Optimization"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_short_history_warning() {
        let text = format_report(&Insights::default(), &range(3));
        assert!(text.contains("less than 7 days"));
        assert!(text.contains("No insights for this period."));
    }
}
