//! Layered JSON extraction from free-text chairman replies.
//!
//! Three strategies, tried in order, first success wins:
//!
//! 1. Parse the entire trimmed reply as JSON
//! 2. Parse the interior of a fenced code block (with or without a
//!    language tag)
//! 3. Parse the outermost `{...}` span (first `{` to last `}`)
//!
//! Each strategy is a pure function from text to `Option<Value>` and only
//! succeeds on a JSON *object*; scalar or array JSON falls through so the
//! caller's coercion always starts from an object.

use serde_json::Value;

/// Run the layered extraction. `None` means the caller should degrade to
/// the raw-text fallback.
pub fn extract_object(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    parse_direct(raw)
        .or_else(|| parse_fenced(raw))
        .or_else(|| parse_braced(raw))
}

fn as_object(value: Value) -> Option<Value> {
    value.is_object().then_some(value)
}

/// Strategy 1: the whole reply is JSON
fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok().and_then(as_object)
}

/// Strategy 2: JSON inside a ``` fence, language tag optional
fn parse_fenced(raw: &str) -> Option<Value> {
    let mut in_block = false;
    let mut block = String::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            in_block = false;
            if let Some(value) = serde_json::from_str(block.trim()).ok().and_then(as_object) {
                return Some(value);
            }
            // Not JSON; keep scanning for a later fence
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    None
}

/// Strategy 3: greedy outermost brace span
fn parse_braced(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok().and_then(as_object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_parse() {
        let value = extract_object(r#"  {"summary": "clean"}  "#).unwrap();
        assert_eq!(value["summary"], "clean");
    }

    #[test]
    fn test_direct_parse_rejects_non_object() {
        assert!(parse_direct("42").is_none());
        assert!(parse_direct(r#"["a", "b"]"#).is_none());
    }

    #[test]
    fn test_fenced_with_language_tag() {
        let raw = "Here is the verdict:\n```json\n{\"summary\": \"fenced\"}\n```\nDone.";
        let value = extract_object(raw).unwrap();
        assert_eq!(value["summary"], "fenced");
    }

    #[test]
    fn test_fenced_without_language_tag() {
        let raw = "```\n{\"summary\": \"plain fence\"}\n```";
        let value = extract_object(raw).unwrap();
        assert_eq!(value["summary"], "plain fence");
    }

    #[test]
    fn test_fenced_skips_non_json_blocks() {
        let raw = "```\nnot json\n```\n\n```json\n{\"summary\": \"second block\"}\n```";
        let value = extract_object(raw).unwrap();
        assert_eq!(value["summary"], "second block");
    }

    #[test]
    fn test_braced_span_with_leading_prose() {
        let raw = "After weighing all answers, my verdict is {\"summary\": \"trailing\", \"nested\": {\"ok\": true}}";
        let value = extract_object(raw).unwrap();
        assert_eq!(value["summary"], "trailing");
        assert_eq!(value["nested"]["ok"], true);
    }

    #[test]
    fn test_pure_prose_yields_none() {
        assert!(extract_object("No structure here at all.").is_none());
    }

    #[test]
    fn test_truncated_json_yields_none() {
        assert!(extract_object(r#"{"summary": "never closed"#).is_none());
    }

    #[test]
    fn test_reversed_braces_yield_none() {
        assert!(extract_object("} backwards {").is_none());
    }
}
