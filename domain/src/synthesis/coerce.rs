//! Per-field shape coercion for extracted synthesis JSON.
//!
//! Every expected field is checked against its expected shape. A text field
//! of the wrong shape is replaced by the raw value stringified; a list field
//! of the wrong shape becomes the empty list. Coercion never fails once a
//! JSON object was extracted.

use super::{Confidence, Criterion, Disagreement, Risk, Synthesis};
use serde_json::Value;

/// Coerce an extracted JSON object into the fixed synthesis field set
pub fn coerce_synthesis(value: &Value) -> Synthesis {
    Synthesis {
        summary: text_field(value, "summary", ""),
        key_points: string_list(value, "key_points"),
        success_criteria: record_list(value, "success_criteria", criterion_from),
        risks: record_list(value, "risks", risk_from),
        disagreements: record_list(value, "disagreements", disagreement_from),
        confidence: Confidence::parse(&text_field(value, "confidence", "unknown")),
        confidence_note: text_field(value, "confidence_note", ""),
    }
}

/// Text field: strings pass through, null/missing take the default,
/// anything else is stringified rather than dropped
fn text_field(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// List of strings: non-arrays coerce to empty
fn string_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items.iter().map(item_text).collect(),
        _ => Vec::new(),
    }
}

/// List of typed sub-records: non-arrays coerce to empty, unusable items
/// are skipped
fn record_list<T>(value: &Value, key: &str, from: fn(&Value) -> Option<T>) -> Vec<T> {
    match value.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(from).collect(),
        _ => Vec::new(),
    }
}

fn risk_from(value: &Value) -> Option<Risk> {
    match value {
        Value::Object(_) => Some(Risk {
            risk: text_field(value, "risk", ""),
            severity: text_field(value, "severity", ""),
            mitigation: text_field(value, "mitigation", ""),
        }),
        Value::String(s) => Some(Risk {
            risk: s.clone(),
            ..Risk::default()
        }),
        _ => None,
    }
}

fn disagreement_from(value: &Value) -> Option<Disagreement> {
    match value {
        Value::Object(_) => Some(Disagreement {
            topic: text_field(value, "topic", ""),
            summary: text_field(value, "summary", ""),
            chairman_verdict: text_field(value, "chairman_verdict", ""),
        }),
        Value::String(s) => Some(Disagreement {
            topic: s.clone(),
            ..Disagreement::default()
        }),
        _ => None,
    }
}

fn criterion_from(value: &Value) -> Option<Criterion> {
    match value {
        Value::Object(_) => Some(Criterion {
            metric: text_field(value, "metric", ""),
            target: text_field(value, "target", ""),
            rationale: text_field(value, "rationale", ""),
        }),
        Value::String(s) => Some(Criterion {
            metric: s.clone(),
            ..Criterion::default()
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_well_formed_object() {
        let value = json!({
            "summary": "The council concurs.",
            "key_points": ["p1", "p2"],
            "success_criteria": [{"metric": "latency", "target": "<10ms", "rationale": "UX"}],
            "risks": [{"risk": "drift", "severity": "medium", "mitigation": "pin versions"}],
            "disagreements": [{"topic": "rollout", "summary": "pace", "chairman_verdict": "staged"}],
            "confidence": "medium",
            "confidence_note": "some gaps"
        });
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.summary, "The council concurs.");
        assert_eq!(synthesis.key_points.len(), 2);
        assert_eq!(synthesis.success_criteria[0].metric, "latency");
        assert_eq!(synthesis.risks[0].severity, "medium");
        assert_eq!(synthesis.disagreements[0].chairman_verdict, "staged");
        assert_eq!(synthesis.confidence, Confidence::Medium);
    }

    #[test]
    fn test_wrong_shape_text_field_is_stringified() {
        let value = json!({"summary": 42, "confidence_note": ["a", "b"]});
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.summary, "42");
        assert_eq!(synthesis.confidence_note, r#"["a","b"]"#);
    }

    #[test]
    fn test_wrong_shape_list_field_is_emptied() {
        let value = json!({
            "summary": "ok",
            "key_points": "not a list",
            "risks": {"risk": "not in an array"}
        });
        let synthesis = coerce_synthesis(&value);
        assert!(synthesis.key_points.is_empty());
        assert!(synthesis.risks.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let value = json!({"summary": "just a summary"});
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.summary, "just a summary");
        assert!(synthesis.key_points.is_empty());
        assert!(synthesis.risks.is_empty());
        assert_eq!(synthesis.confidence, Confidence::Unknown);
        assert_eq!(synthesis.confidence_note, "");
    }

    #[test]
    fn test_string_items_promote_to_records() {
        let value = json!({
            "summary": "ok",
            "risks": ["unpinned dependency"],
            "success_criteria": ["ship by Q3"]
        });
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.risks[0].risk, "unpinned dependency");
        assert_eq!(synthesis.risks[0].severity, "");
        assert_eq!(synthesis.success_criteria[0].metric, "ship by Q3");
    }

    #[test]
    fn test_unusable_list_items_are_skipped() {
        let value = json!({
            "summary": "ok",
            "disagreements": [42, null, {"topic": "kept"}]
        });
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.disagreements.len(), 1);
        assert_eq!(synthesis.disagreements[0].topic, "kept");
    }

    #[test]
    fn test_mixed_key_point_items_are_stringified() {
        let value = json!({"summary": "ok", "key_points": ["a", 7, true]});
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.key_points, vec!["a", "7", "true"]);
    }

    #[test]
    fn test_null_confidence_maps_to_unknown() {
        let value = json!({"summary": "ok", "confidence": null});
        let synthesis = coerce_synthesis(&value);
        assert_eq!(synthesis.confidence, Confidence::Unknown);
    }
}
