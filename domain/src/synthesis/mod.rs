//! Chairman synthesis - structured verdict types and best-effort parsing.
//!
//! The chairman replies in free text that *should* be a single JSON object.
//! [`parse_synthesis`] runs the layered extraction in [`extract`] and the
//! per-field shape coercion in [`coerce`]; when no JSON object can be
//! recovered it degrades to a raw-text record instead of failing the run.

pub mod coerce;
pub mod extract;

use serde::{Deserialize, Serialize};

/// Chairman confidence in the synthesized verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Confidence {
    /// Parse a confidence string; anything unrecognized maps to `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A risk identified by the council
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub risk: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub mitigation: String,
}

/// A disagreement between councilors, with the chairman's ruling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disagreement {
    pub topic: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub chairman_verdict: String,
}

/// A success criterion proposed by the council
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub metric: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub rationale: String,
}

/// The chairman's structured verdict
///
/// The field set is fixed; replies missing fields or carrying wrong shapes
/// are coerced to the documented defaults by [`coerce::coerce_synthesis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    /// Primary narrative field
    pub summary: String,
    /// Points the councilors agreed on
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Measurable criteria for the verdict
    #[serde(default)]
    pub success_criteria: Vec<Criterion>,
    /// Identified risks with severity and mitigation
    #[serde(default)]
    pub risks: Vec<Risk>,
    /// Disagreements and the chairman's ruling on each
    #[serde(default)]
    pub disagreements: Vec<Disagreement>,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub confidence_note: String,
}

impl Synthesis {
    fn degraded(summary: impl Into<String>, note: &str) -> Self {
        Self {
            summary: summary.into(),
            key_points: Vec::new(),
            success_criteria: Vec::new(),
            risks: Vec::new(),
            disagreements: Vec::new(),
            confidence: Confidence::Unknown,
            confidence_note: note.to_string(),
        }
    }

    /// Fixed-shape record for a chairman transport failure
    pub fn failed_chairman(reason: &str) -> Self {
        Self::degraded(
            format!("Chairman failed to respond: {reason}"),
            "Chairman call failed.",
        )
    }

    /// Raw-text fallback when no JSON object could be extracted
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self::degraded(raw, "Chairman response could not be parsed as JSON.")
    }
}

/// Result of the layered parse pipeline
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// A JSON object was extracted and coerced into the fixed field set
    Parsed(Synthesis),
    /// No strategy produced a JSON object; the raw reply is preserved
    Degraded { raw: String },
}

impl ParseOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ParseOutcome::Degraded { .. })
    }

    /// Flatten into a [`Synthesis`], materializing the raw-text fallback
    pub fn into_synthesis(self) -> Synthesis {
        match self {
            ParseOutcome::Parsed(synthesis) => synthesis,
            ParseOutcome::Degraded { raw } => Synthesis::unparsed(raw),
        }
    }
}

/// Parse a chairman reply into a [`Synthesis`], never failing
pub fn parse_synthesis(raw: &str) -> ParseOutcome {
    match extract::extract_object(raw) {
        Some(value) => ParseOutcome::Parsed(coerce::coerce_synthesis(&value)),
        None => ParseOutcome::Degraded {
            raw: raw.to_string(),
        },
    }
}
