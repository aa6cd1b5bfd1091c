//! Markdown report renderer.
//!
//! Renders a saved run report (JSON) as a standalone markdown document.
//! Input is treated defensively: this renderer may be fed hand-edited or
//! older report files, so every list field coerces non-lists to empty and
//! missing text fields get documented defaults.

use serde_json::Value;

/// Renders run report JSON into a markdown document
pub struct MarkdownReport;

impl MarkdownReport {
    pub fn render(report: &Value) -> String {
        let mut doc = String::new();

        let question = str_or(report, "question", "Unknown question");
        doc.push_str(&format!("# LLM Council Report\n\n## {question}\n\n"));

        let chairman = str_or(report, "chairman", "Unknown chairman");
        let council: Vec<String> = list_or(report, "council")
            .iter()
            .map(|v| item_text(v))
            .collect();
        doc.push_str(&format!("**Chairman:** {chairman}\n\n"));
        if !council.is_empty() {
            doc.push_str(&format!("**Council:** {}\n\n", council.join(", ")));
        }

        let started = str_or(report, "run_started_at", "unknown time");
        let duration = report
            .get("run_duration_seconds")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        doc.push_str(&format!("*Run started {started}, took {duration:.1}s.*\n\n"));

        doc.push_str("## Verdict\n\n");
        doc.push_str(&str_or(report, "summary", "No answer provided."));
        doc.push_str("\n\n");

        let confidence = str_or(report, "confidence", "unknown");
        let confidence_note = str_or(report, "confidence_note", "");
        doc.push_str(&format!("**Confidence:** {confidence}"));
        if !confidence_note.is_empty() {
            doc.push_str(&format!(" - {confidence_note}"));
        }
        doc.push_str("\n\n");

        Self::bullet_section(&mut doc, report, "key_points", "Key Points");

        Self::record_section(&mut doc, report, "success_criteria", "Success Criteria", |v| {
            format!(
                "**{}** -> {} ({})",
                field(v, "metric", "unspecified"),
                field(v, "target", "no target"),
                field(v, "rationale", "no rationale"),
            )
        });

        Self::record_section(&mut doc, report, "risks", "Risks", |v| {
            format!(
                "**{}** [{}] - {}",
                field(v, "risk", "unspecified"),
                field(v, "severity", "unrated"),
                field(v, "mitigation", "no mitigation"),
            )
        });

        Self::record_section(&mut doc, report, "disagreements", "Disagreements", |v| {
            format!(
                "**{}**: {} *Chairman's verdict:* {}",
                field(v, "topic", "unspecified"),
                field(v, "summary", "no summary"),
                field(v, "chairman_verdict", "none given"),
            )
        });

        let answers = list_or(report, "individual_answers");
        if !answers.is_empty() {
            doc.push_str("## Individual Answers\n\n");
            for answer in &answers {
                doc.push_str(&format!(
                    "### {}\n\n{}\n\n",
                    field(answer, "model", "Unknown model"),
                    field(answer, "answer", "No answer provided."),
                ));
            }
        }

        let reviews = list_or(report, "peer_reviews");
        if !reviews.is_empty() {
            doc.push_str("## Peer Reviews\n\n");
            for review in &reviews {
                doc.push_str(&format!(
                    "### Review by {}\n\n{}\n\n",
                    field(review, "reviewer", "Unknown reviewer"),
                    field(review, "review", "No review provided."),
                ));
            }
        } else if report
            .get("stage2_skipped")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            doc.push_str("## Peer Reviews\n\n*Skipped (fast mode).*\n\n");
        }

        let errors = list_or(report, "errors");
        if !errors.is_empty() {
            doc.push_str("## Errors\n\n");
            for error in &errors {
                doc.push_str(&format!(
                    "- **{}**: {}\n",
                    field(error, "source", "unknown"),
                    field(error, "reason", "unknown error"),
                ));
            }
            doc.push('\n');
        }

        doc
    }

    fn bullet_section(doc: &mut String, report: &Value, key: &str, title: &str) {
        let items = list_or(report, key);
        if items.is_empty() {
            return;
        }
        doc.push_str(&format!("## {title}\n\n"));
        for item in &items {
            doc.push_str(&format!("- {}\n", item_text(item)));
        }
        doc.push('\n');
    }

    fn record_section(
        doc: &mut String,
        report: &Value,
        key: &str,
        title: &str,
        line: fn(&Value) -> String,
    ) {
        let items = list_or(report, key);
        if items.is_empty() {
            return;
        }
        doc.push_str(&format!("## {title}\n\n"));
        for item in &items {
            doc.push_str(&format!("- {}\n", line(item)));
        }
        doc.push('\n');
    }
}

/// Top-level text field: strings pass through, other non-null scalars are
/// stringified, null/missing take the default
fn str_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(Value::String(_)) => default.to_string(),
        Some(other) => other.to_string(),
    }
}

/// List field: non-list values are coerced to empty
fn list_or(value: &Value, key: &str) -> Vec<Value> {
    match value.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn field(item: &Value, key: &str, default: &str) -> String {
    str_or(item, key, default)
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_complete_report() {
        let report = json!({
            "question": "Should we ship?",
            "summary": "Ship next week.",
            "key_points": ["tests first"],
            "risks": [{"risk": "regressions", "severity": "medium", "mitigation": "canary"}],
            "confidence": "medium",
            "confidence_note": "some gaps",
            "individual_answers": [{"model": "Alpha 70B", "answer": "ship it"}],
            "peer_reviews": [{"reviewer": "Beta R1", "review": "Model A is rash"}],
            "chairman": "The Chairman",
            "council": ["Alpha 70B", "Beta R1"],
            "stage2_skipped": false,
            "run_started_at": "2026-08-07T12:00:00Z",
            "run_duration_seconds": 42.5,
            "errors": []
        });
        let doc = MarkdownReport::render(&report);
        assert!(doc.contains("## Should we ship?"));
        assert!(doc.contains("Ship next week."));
        assert!(doc.contains("**regressions** [medium] - canary"));
        assert!(doc.contains("### Review by Beta R1"));
        assert!(doc.contains("took 42.5s"));
    }

    #[test]
    fn test_missing_text_fields_get_documented_defaults() {
        let report = json!({});
        let doc = MarkdownReport::render(&report);
        assert!(doc.contains("Unknown question"));
        assert!(doc.contains("No answer provided."));
    }

    #[test]
    fn test_non_list_fields_coerce_to_empty() {
        let report = json!({
            "question": "Q",
            "summary": "S",
            "key_points": "not a list",
            "risks": 42,
            "individual_answers": {"model": "not in an array"}
        });
        let doc = MarkdownReport::render(&report);
        assert!(!doc.contains("Key Points"));
        assert!(!doc.contains("Risks"));
        assert!(!doc.contains("Individual Answers"));
    }

    #[test]
    fn test_answer_items_are_defensive_too() {
        let report = json!({
            "question": "Q",
            "summary": "S",
            "individual_answers": [{"model": null}]
        });
        let doc = MarkdownReport::render(&report);
        assert!(doc.contains("Unknown model"));
        assert!(doc.contains("No answer provided."));
    }

    #[test]
    fn test_skipped_reviews_are_noted() {
        let report = json!({
            "question": "Q",
            "summary": "S",
            "peer_reviews": [],
            "stage2_skipped": true
        });
        let doc = MarkdownReport::render(&report);
        assert!(doc.contains("Skipped (fast mode)"));
    }
}
