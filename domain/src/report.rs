//! The run report - the externally visible artifact of a deliberation.
//!
//! A flat structure: the synthesis fields are flattened to the top level so
//! downstream renderers see one record. Immutable once returned.

use crate::council::value_objects::{CouncilAnswer, CouncilReview, RunError};
use crate::synthesis::Synthesis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One councilor's answer as it appears in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualAnswer {
    /// Display label of the councilor
    pub model: String,
    pub answer: String,
}

impl From<&CouncilAnswer> for IndividualAnswer {
    fn from(answer: &CouncilAnswer) -> Self {
        Self {
            model: answer.councilor.label.clone(),
            answer: answer.answer.clone(),
        }
    }
}

/// One peer review as it appears in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerReviewEntry {
    /// Display label of the reviewing councilor
    pub reviewer: String,
    pub review: String,
}

impl From<&CouncilReview> for PeerReviewEntry {
    fn from(review: &CouncilReview) -> Self {
        Self {
            reviewer: review.reviewer.label.clone(),
            review: review.review.clone(),
        }
    }
}

/// Complete result of a deliberation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The original question
    pub question: String,
    /// Chairman verdict, flattened to the top level
    #[serde(flatten)]
    pub synthesis: Synthesis,
    /// Raw answers from the opinion stage, roster order
    pub individual_answers: Vec<IndividualAnswer>,
    /// Raw reviews from the review stage; empty when skipped or all failed
    pub peer_reviews: Vec<PeerReviewEntry>,
    /// Chairman display label
    pub chairman: String,
    /// Display labels of the full configured council
    pub council: Vec<String>,
    /// Whether the review stage was skipped (fast mode)
    pub stage2_skipped: bool,
    pub run_started_at: DateTime<Utc>,
    pub run_duration_seconds: f64,
    /// Non-fatal failures collected across all stages
    pub errors: Vec<RunError>,
}

impl RunReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        question: impl Into<String>,
        synthesis: Synthesis,
        answers: &[CouncilAnswer],
        reviews: &[CouncilReview],
        chairman: impl Into<String>,
        council: Vec<String>,
        stage2_skipped: bool,
        run_started_at: DateTime<Utc>,
        run_duration_seconds: f64,
        errors: Vec<RunError>,
    ) -> Self {
        Self {
            question: question.into(),
            synthesis,
            individual_answers: answers.iter().map(IndividualAnswer::from).collect(),
            peer_reviews: reviews.iter().map(PeerReviewEntry::from).collect(),
            chairman: chairman.into(),
            council,
            stage2_skipped,
            run_started_at,
            run_duration_seconds,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::councilor::Councilor;
    use crate::synthesis::Confidence;

    fn sample_report() -> RunReport {
        let councilor = Councilor::new("alpha", "prov/alpha", "Alpha 70B", "Advisor");
        let answers = vec![CouncilAnswer::new(councilor.clone(), "answer text")];
        let reviews = vec![CouncilReview::new(councilor, "review text")];
        let mut synthesis = Synthesis::unparsed("raw");
        synthesis.summary = "verdict".to_string();
        RunReport::new(
            "Should we ship?",
            synthesis,
            &answers,
            &reviews,
            "Chairman X",
            vec!["Alpha 70B".to_string()],
            false,
            Utc::now(),
            12.5,
            vec![RunError::new("Beta", "HTTP 500")],
        )
    }

    #[test]
    fn test_synthesis_fields_flatten_to_top_level() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["question"], "Should we ship?");
        assert_eq!(json["summary"], "verdict");
        assert_eq!(json["confidence"], "unknown");
        assert!(json.get("synthesis").is_none(), "must not nest synthesis");
    }

    #[test]
    fn test_report_wire_field_names() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["individual_answers"][0]["model"], "Alpha 70B");
        assert_eq!(json["individual_answers"][0]["answer"], "answer text");
        assert_eq!(json["peer_reviews"][0]["reviewer"], "Alpha 70B");
        assert_eq!(json["chairman"], "Chairman X");
        assert_eq!(json["stage2_skipped"], false);
        assert_eq!(json["errors"][0]["source"], "Beta");
        assert_eq!(json["run_duration_seconds"], 12.5);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        let mut report = sample_report();
        report.synthesis.confidence = Confidence::High;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["confidence"], "high");
    }
}
