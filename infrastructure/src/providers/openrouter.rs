//! OpenRouter chat-completions adapter.
//!
//! Implements the [`ChatGateway`] port over the OpenRouter HTTP API. One
//! call per `complete`: retries are the transport caller's job, this
//! adapter only classifies each attempt's outcome. A 200 response is
//! accepted only when it carries at least one choice with non-null message
//! content; anything else is a malformed response.

use async_trait::async_trait;
use council_application::ports::chat_gateway::{ChatGateway, ChatRequest, GatewayError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the OpenRouter gateway
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    api_key: String,
    pub base_url: String,
    /// Sent as `HTTP-Referer`, identifies the calling app to OpenRouter
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
    /// Per-call timeout; a timed-out call is not retried with a longer budget
    pub timeout: Duration,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: "https://github.com/llm-council/llm-council".to_string(),
            title: "LLM Council".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenRouter implementation of the chat gateway port
pub struct OpenRouterGateway {
    config: OpenRouterConfig,
    client: reqwest::Client,
}

impl OpenRouterGateway {
    pub fn new(config: OpenRouterConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl ChatGateway for OpenRouterGateway {
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
        let body = WireRequest::from(&request);
        debug!("POST {} model={}", self.completions_url(), request.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let retry_after = parse_retry_after(
            response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
        );
        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimited { retry_after });
        }
        if status.is_server_error() {
            return Err(GatewayError::ServerError {
                status: status.as_u16(),
                retry_after,
            });
        }
        if !status.is_success() {
            let message = truncate(&response.text().await.unwrap_or_default(), 200);
            return Err(GatewayError::ClientError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: WireResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        extract_content(payload)
    }
}

fn classify_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

/// Parse a `Retry-After` header value as whole seconds
fn parse_retry_after(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Validate the response structure and pull out the reply text
fn extract_content(payload: WireResponse) -> Result<String, GatewayError> {
    let choice = payload.choices.into_iter().next().ok_or_else(|| {
        GatewayError::MalformedResponse("missing or empty choices".to_string())
    })?;
    choice
        .message
        .content
        .ok_or_else(|| GatewayError::MalformedResponse("missing message content".to_string()))
}

// ==================== Wire types ====================

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatRequest> for WireRequest<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            model: request.model.as_str(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct WireChoice {
    #[serde(default)]
    message: WireChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct WireChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_application::ports::chat_gateway::ChatMessage;
    use council_domain::ModelId;

    #[test]
    fn test_wire_request_shape() {
        let request = ChatRequest::new(
            ModelId::new("deepseek/deepseek-r1-0528:free"),
            vec![
                ChatMessage::system("be brief"),
                ChatMessage::user("hello"),
            ],
        )
        .with_max_tokens(256)
        .with_temperature(0.2);

        let wire = WireRequest::from(&request);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["model"], "deepseek/deepseek-r1-0528:free");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn test_extract_content_happy_path() {
        let payload: WireResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "the answer"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(payload).unwrap(), "the answer");
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let payload: WireResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = extract_content(payload).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
        assert!(err.to_string().contains("missing or empty choices"));
    }

    #[test]
    fn test_extract_content_no_choices_field() {
        let payload: WireResponse = serde_json::from_str(r#"{"id": "gen-123"}"#).unwrap();
        assert!(extract_content(payload).is_err());
    }

    #[test]
    fn test_extract_content_null_content() {
        let payload: WireResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        let err = extract_content(payload).unwrap_err();
        assert!(err.to_string().contains("missing message content"));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after(Some("7")), Some(7));
        assert_eq!(parse_retry_after(Some(" 30 ")), Some(30));
        assert_eq!(parse_retry_after(Some("soon")), None);
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 200), "short");
        let long = "é".repeat(300);
        let cut = truncate(&long, 9);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 12);
    }

    #[test]
    fn test_config_defaults() {
        let config = OpenRouterConfig::new("sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
