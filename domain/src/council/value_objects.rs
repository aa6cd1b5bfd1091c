//! Council value objects - immutable result types for deliberation stages.
//!
//! These types represent the outputs of each stage:
//! - [`CouncilAnswer`] - A councilor's answer from the opinion stage
//! - [`CouncilReview`] - A councilor's critique of the anonymized peers
//! - [`RunError`] - A non-fatal failure recorded in the run report
//! - [`Phase`] - Stage marker for progress reporting

use crate::core::councilor::Councilor;
use serde::{Deserialize, Serialize};

/// A councilor's answer to the original question
///
/// Created during the opinion stage and never mutated afterwards. Only
/// councilors that succeeded produce an answer; failures become
/// [`RunError`] entries instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilAnswer {
    /// The councilor that produced this answer
    pub councilor: Councilor,
    /// The answer content, trimmed
    pub answer: String,
}

impl CouncilAnswer {
    pub fn new(councilor: Councilor, answer: impl Into<String>) -> Self {
        Self {
            councilor,
            answer: answer.into(),
        }
    }
}

/// A councilor's ranked critique of its anonymized peers
///
/// References the reviewing councilor only. The reviewed answers are not
/// recorded here: the per-reviewer label permutation is dropped once the
/// review prompt is built, so nothing downstream can de-anonymize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilReview {
    /// The councilor that performed the review
    pub reviewer: Councilor,
    /// The review content, trimmed
    pub review: String,
}

impl CouncilReview {
    pub fn new(reviewer: Councilor, review: impl Into<String>) -> Self {
        Self {
            reviewer,
            review: review.into(),
        }
    }
}

/// A non-fatal failure collected during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// Display label of the councilor or reviewer that failed
    pub source: String,
    /// Human-readable failure reason
    pub reason: String,
}

impl RunError {
    pub fn new(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            reason: reason.into(),
        }
    }
}

/// Deliberation stage marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Stage 1: gather first opinions
    Opinions,
    /// Stage 2: anonymized cross-review
    Reviews,
    /// Stage 3: chairman synthesis
    Synthesis,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Opinions => "opinions",
            Phase::Reviews => "reviews",
            Phase::Synthesis => "synthesis",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_serde_field_names() {
        let err = RunError::new("DeepSeek R1", "HTTP 500 after 3 attempts");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["source"], "DeepSeek R1");
        assert_eq!(json["reason"], "HTTP 500 after 3 attempts");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Opinions.to_string(), "opinions");
        assert_eq!(Phase::Synthesis.as_str(), "synthesis");
    }
}
