//! Chat gateway port
//!
//! Defines the interface for one-shot chat completions against an LLM
//! provider: send a request, get the reply text back. Retry policy lives
//! above this port (see `use_cases::transport`); adapters classify each
//! attempt's outcome so the caller can decide whether to retry.

use async_trait::async_trait;
use council_domain::ModelId;
use std::time::Duration;
use thiserror::Error;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged message in a chat request
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: ModelId,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(model: ModelId, messages: Vec<ChatMessage>) -> Self {
        Self {
            model,
            messages,
            max_tokens: 1500,
            temperature: 0.7,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Classified outcome of one failed gateway attempt
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Provider asked us to back off; may carry a Retry-After hint in seconds
    #[error("HTTP 429")]
    RateLimited { retry_after: Option<u64> },

    #[error("HTTP {status}")]
    ServerError {
        status: u16,
        retry_after: Option<u64>,
    },

    /// 4xx responses other than rate limiting; not worth retrying
    #[error("HTTP {status}: {message}")]
    ClientError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// A 200 response whose body did not contain usable content.
    /// Deliberately terminal: structurally invalid success is not retried.
    #[error("Invalid API response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited { .. }
                | GatewayError::ServerError { .. }
                | GatewayError::Network(_)
                | GatewayError::Timeout
        )
    }

    /// Server-supplied backoff hint, if any
    pub fn retry_hint(&self) -> Option<Duration> {
        match self {
            GatewayError::RateLimited {
                retry_after: Some(secs),
            }
            | GatewayError::ServerError {
                retry_after: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// Gateway for chat completions
///
/// This port defines how the application layer talks to LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Perform one chat completion and return the reply text
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError>;
}
