//! Anonymized review bundle construction.
//!
//! Each reviewer sees every *other* surviving answer, shuffled and relabeled
//! `Model A`, `Model B`, ... in the shuffled order. The randomness source is
//! an explicit handle so tests can inject a fixed seed; the shuffle must
//! differ per reviewer, which callers get by reusing one RNG across
//! successive [`AnonymizedBundle::build`] calls.

use crate::core::councilor::CouncilorId;
use crate::council::value_objects::CouncilAnswer;
use rand::Rng;
use rand::seq::SliceRandom;

/// One relabeled peer answer inside a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizedAnswer {
    /// Opaque label, e.g. "Model A"
    pub label: String,
    /// The peer's answer text, unchanged
    pub text: String,
}

/// The permuted, relabeled set of peer answers shown to one reviewer
///
/// Invariants:
/// - the reviewer's own answer is excluded, matched by [`CouncilorId`]
/// - every other surviving answer appears exactly once
/// - labels carry no information about identity, role, or roster order
#[derive(Debug, Clone)]
pub struct AnonymizedBundle {
    entries: Vec<AnonymizedAnswer>,
}

impl AnonymizedBundle {
    /// Build the bundle for one reviewer from the surviving answers
    pub fn build<R: Rng + ?Sized>(
        answers: &[CouncilAnswer],
        reviewer: &CouncilorId,
        rng: &mut R,
    ) -> Self {
        let mut others: Vec<&CouncilAnswer> = answers
            .iter()
            .filter(|a| &a.councilor.id != reviewer)
            .collect();
        // Shuffle so models can't pattern-match on ordering
        others.shuffle(rng);

        let entries = others
            .iter()
            .enumerate()
            .map(|(i, other)| AnonymizedAnswer {
                label: format!("Model {}", (b'A' + i as u8) as char),
                text: other.answer.clone(),
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[AnonymizedAnswer] {
        &self.entries
    }

    /// Opaque labels in bundle order, for prompt instructions
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Render the bundle as a prompt block
    pub fn to_prompt_block(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("**{}:**\n{}", e.label, e.text))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}
