//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file and
//! resolve into domain/application types. An empty `[council]` section
//! falls back to the built-in default roster.

use council_application::use_cases::run_council::CouncilPolicy;
use council_application::use_cases::transport::RetryPolicy;
use council_domain::{Chairman, CouncilRoster, Councilor};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One councilor entry in the `[[council.councilors]]` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilorConfig {
    pub id: String,
    pub model: String,
    pub label: String,
    pub role: String,
}

/// The `[council.chairman]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChairmanConfig {
    pub id: String,
    pub model: String,
    pub label: String,
}

/// The `[council]` section: roster and chairman
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    pub councilors: Vec<FileCouncilorConfig>,
    pub chairman: FileChairmanConfig,
}

/// The `[behavior]` section: quorum, retries, timeouts, sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Minimum councilors that must answer for the run to continue
    pub min_quorum: usize,
    /// Retries after the first attempt of every call
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    /// Whether the cross-review stage runs by default
    pub enable_review: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            min_quorum: 2,
            max_retries: 2,
            request_timeout_secs: 120,
            enable_review: true,
            max_tokens: 1500,
            temperature: 0.7,
        }
    }
}

/// The `[provider]` section. The API key is intentionally absent: it comes
/// from the `OPENROUTER_API_KEY` environment variable only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub base_url: String,
    pub referer: String,
    pub title: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            referer: "https://github.com/llm-council/llm-council".to_string(),
            title: "LLM Council".to_string(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub council: FileCouncilConfig,
    pub behavior: FileBehaviorConfig,
    pub provider: FileProviderConfig,
}

impl FileConfig {
    /// Resolve the configured roster, falling back to the built-in default
    /// when the config names no councilors
    pub fn resolve_roster(&self) -> CouncilRoster {
        let defaults = CouncilRoster::default_roster();

        let councilors: Vec<Councilor> = self
            .council
            .councilors
            .iter()
            .filter(|c| !c.model.trim().is_empty())
            .map(|c| Councilor::new(c.id.as_str(), c.model.clone(), c.label.clone(), c.role.clone()))
            .collect();

        let chairman = if self.council.chairman.model.trim().is_empty() {
            defaults.chairman.clone()
        } else {
            Chairman::new(
                self.council.chairman.id.as_str(),
                self.council.chairman.model.clone(),
                self.council.chairman.label.clone(),
            )
        };

        if councilors.is_empty() {
            CouncilRoster {
                councilors: defaults.councilors,
                chairman,
            }
        } else {
            CouncilRoster {
                councilors,
                chairman,
            }
        }
    }

    /// Execution policy derived from the `[behavior]` section
    pub fn policy(&self) -> CouncilPolicy {
        CouncilPolicy {
            min_quorum: self.behavior.min_quorum,
            retry: RetryPolicy {
                max_retries: self.behavior.max_retries,
                ..RetryPolicy::default()
            },
            max_tokens: self.behavior.max_tokens,
            temperature: self.behavior.temperature,
        }
    }

    /// Per-call timeout for the HTTP client
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.behavior.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.behavior.min_quorum, 2);
        assert_eq!(config.behavior.max_retries, 2);
        assert_eq!(config.behavior.request_timeout_secs, 120);
        assert!(config.behavior.enable_review);
        assert!(config.council.councilors.is_empty());
    }

    #[test]
    fn test_empty_council_resolves_to_default_roster() {
        let roster = FileConfig::default().resolve_roster();
        assert_eq!(roster.councilors.len(), 4);
        assert_eq!(roster.chairman.label, "Kimi K2.5 (Chairman)");
    }

    #[test]
    fn test_configured_council_overrides_defaults() {
        let toml = r#"
            [[council.councilors]]
            id = "custom"
            model = "some/model"
            label = "Custom Model"
            role = "Advisor"

            [council.chairman]
            id = "boss"
            model = "other/model"
            label = "The Boss"

            [behavior]
            min_quorum = 1
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        let roster = config.resolve_roster();
        assert_eq!(roster.councilors.len(), 1);
        assert_eq!(roster.councilors[0].label, "Custom Model");
        assert_eq!(roster.chairman.label, "The Boss");
        assert_eq!(config.policy().min_quorum, 1);
    }

    #[test]
    fn test_blank_model_entries_are_dropped() {
        let toml = r#"
            [[council.councilors]]
            id = "ghost"
            model = "  "
            label = "Ghost"
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        let roster = config.resolve_roster();
        // The single blank entry is unusable, so the defaults apply
        assert_eq!(roster.councilors.len(), 4);
    }

    #[test]
    fn test_policy_carries_retry_budget() {
        let mut config = FileConfig::default();
        config.behavior.max_retries = 5;
        assert_eq!(config.policy().retry.max_retries, 5);
    }
}
