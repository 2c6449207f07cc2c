//! Chat Completions Client
//!
//! HTTP client for OpenAI-compatible `/v1/chat/completions` endpoints
//! (Cerebras by default). One attempt per request; callers own fallback.

use super::{CompletionRequest, GeneratorError, SummaryGenerator};
use crate::config::GeneratorConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Summary generator backed by a chat completions API
pub struct ChatCompletionsClient {
    client: Client,
    config: GeneratorConfig,
}

impl ChatCompletionsClient {
    /// Create a client with the given configuration
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Full chat completions URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SummaryGenerator for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GeneratorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GeneratorError::MissingCredentials)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else if e.is_connect() {
                    GeneratorError::Unavailable
                } else {
                    GeneratorError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let text = response.text().await.map_err(GeneratorError::Request)?;
        let content = parse_completion(&text)?;

        tracing::debug!(model = %self.config.model, chars = content.len(), "Completion received");

        Ok(content)
    }
}

/// Extract the first choice's message content from a response body
fn parse_completion(body: &str) -> Result<String, GeneratorError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

    if let Some(usage) = &parsed.usage {
        tracing::debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Generator token usage"
        );
    }

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(GeneratorError::MalformedResponse(
            "response contained no message content".to_string(),
        ));
    }

    Ok(content)
}

/// Prefer the API's own error message over the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string())
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, base_url: &str) -> GeneratorConfig {
        GeneratorConfig {
            api_key: api_key.map(String::from),
            base_url: base_url.to_string(),
            request_timeout_ms: 500,
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint() {
        let client = ChatCompletionsClient::new(config(None, "https://api.cerebras.ai/")).unwrap();
        assert_eq!(client.endpoint(), "https://api.cerebras.ai/v1/chat/completions");
        assert_eq!(client.name(), "llama3.1-8b");
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let client = ChatCompletionsClient::new(config(None, "http://127.0.0.1:1")).unwrap();
        let result = client.complete(CompletionRequest::new("system", "prompt")).await;
        assert!(matches!(result, Err(GeneratorError::MissingCredentials)));

        let client = ChatCompletionsClient::new(config(Some(""), "http://127.0.0.1:1")).unwrap();
        let result = client.complete(CompletionRequest::new("system", "prompt")).await;
        assert!(matches!(result, Err(GeneratorError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = ChatCompletionsClient::new(config(Some("key"), "http://127.0.0.1:1")).unwrap();
        let result = client.complete(CompletionRequest::new("system", "prompt")).await;
        assert!(matches!(
            result,
            Err(GeneratorError::Unavailable | GeneratorError::Timeout | GeneratorError::Request(_))
        ));
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "  You slept well this week.  "}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 9}
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "You slept well this week.");
    }

    #[test]
    fn test_parse_completion_rejects_empty_and_invalid() {
        let empty = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        assert!(matches!(parse_completion(empty), Err(GeneratorError::MalformedResponse(_))));

        let no_choices = r#"{"choices": []}"#;
        assert!(matches!(parse_completion(no_choices), Err(GeneratorError::MalformedResponse(_))));

        assert!(matches!(parse_completion("<html>"), Err(GeneratorError::MalformedResponse(_))));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
        assert_eq!(api_error_message(body), "Invalid API key");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "llama3.1-8b",
            messages: [
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
            temperature: 0.5,
            max_tokens: 100,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["model"], "llama3.1-8b");
    }
}
