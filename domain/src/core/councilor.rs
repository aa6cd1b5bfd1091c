//! Councilor and roster value objects
//!
//! A [`Councilor`] is one of the independent models consulted during the
//! opinion stage. The [`Chairman`] is the designated synthesizer. Both are
//! immutable for the duration of a run and are configured statically.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Stable identifier for a councilor (Value Object)
///
/// Used to match a reviewer against its own answer during anonymization;
/// never shown to other models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouncilorId(String);

impl CouncilorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CouncilorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CouncilorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Provider-facing model identifier, e.g. `deepseek/deepseek-r1-0528:free`
///
/// Model names are free-form routing strings, so this stays an opaque
/// newtype rather than an enum of known variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// One of the independent answer-generating models consulted in the
/// opinion stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Councilor {
    /// Stable identifier, used for self-exclusion during anonymization
    pub id: CouncilorId,
    /// Model routed to the provider
    pub model: ModelId,
    /// Human-readable display label
    pub label: String,
    /// Role tag, e.g. "Reasoner" or "Generalist"
    pub role: String,
}

impl Councilor {
    pub fn new(
        id: impl Into<CouncilorId>,
        model: impl Into<String>,
        label: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            model: ModelId::new(model),
            label: label.into(),
            role: role.into(),
        }
    }
}

impl From<String> for CouncilorId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The designated synthesizer for the final verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chairman {
    pub id: CouncilorId,
    pub model: ModelId,
    pub label: String,
}

impl Chairman {
    pub fn new(
        id: impl Into<CouncilorId>,
        model: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            model: ModelId::new(model),
            label: label.into(),
        }
    }
}

/// Static roster for a single run: councilors plus chairman
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilRoster {
    pub councilors: Vec<Councilor>,
    pub chairman: Chairman,
}

impl CouncilRoster {
    /// Build a roster, rejecting an empty council
    pub fn new(councilors: Vec<Councilor>, chairman: Chairman) -> Result<Self, DomainError> {
        if councilors.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        Ok(Self {
            councilors,
            chairman,
        })
    }

    /// The default deployment: four free-tier models and a chairman
    pub fn default_roster() -> Self {
        Self {
            councilors: vec![
                Councilor::new(
                    "deepseek-r1",
                    "deepseek/deepseek-r1-0528:free",
                    "DeepSeek R1",
                    "Reasoner",
                ),
                Councilor::new(
                    "hermes-405b",
                    "nousresearch/hermes-3-llama-3.1-405b:free",
                    "Hermes 3 405B",
                    "Knowledge",
                ),
                Councilor::new(
                    "qwen3-coder",
                    "qwen/qwen3-coder:free",
                    "Qwen3 Coder 480B",
                    "Structuralist",
                ),
                Councilor::new(
                    "llama-33-70b",
                    "meta-llama/llama-3.3-70b-instruct:free",
                    "Llama 3.3 70B",
                    "Generalist",
                ),
            ],
            chairman: Chairman::new(
                "kimi-k2.5",
                "moonshotai/kimi-k2.5:free",
                "Kimi K2.5 (Chairman)",
            ),
        }
    }

    /// Display labels of all councilors, in roster order
    pub fn labels(&self) -> Vec<String> {
        self.councilors.iter().map(|c| c.label.clone()).collect()
    }

    /// Position of a councilor in the roster, for stable result ordering
    pub fn position(&self, id: &CouncilorId) -> usize {
        self.councilors
            .iter()
            .position(|c| &c.id == id)
            .unwrap_or(usize::MAX)
    }
}
