// src/llm/client.rs
// =============================================================================
// This module sends one prompt to the language model and returns its reply.
//
// Groq exposes an OpenAI-compatible chat completions API:
//   POST {base_url}/chat/completions
//   Authorization: Bearer <GROQ_API_KEY>
//   {"model": "...", "messages": [{"role": "user", "content": "..."}]}
//
// The API key is checked at call time, not when the client is created,
// so a run without a key still crawls its root page.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::CrawlError;

/// Anything that can turn a free-text prompt into a free-text answer
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CrawlError>;
}

/// Chat-completions client for Groq (or any OpenAI-compatible endpoint)
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(config: &LlmConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CrawlError::ResourceAcquisition(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

// Never prints the API key, only whether one is set
impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, CrawlError> {
        let api_key = self.api_key.as_deref().ok_or(CrawlError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CrawlError::ClassifierInvocation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(CrawlError::ClassifierInvocation(format!(
                "{} returned {}: {}",
                self.model, status, text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CrawlError::ClassifierInvocation(format!("unreadable response: {}", e)))?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(model = %self.model, chars = answer.len(), "model answered");
        Ok(answer)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODEL;

    fn config(base_url: String, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            base_url,
            max_prompt_chars: 1000,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": DEFAULT_MODEL,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"[\"https://a.com\"]"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = GroqClient::new(&config(server.url(), Some("gsk_test"))).unwrap();
        let answer = client.complete("hello").await.unwrap();

        assert_eq!(answer, r#"["https://a.com"]"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_first_use() {
        let client = GroqClient::new(&config("http://127.0.0.1:9".to_string(), None)).unwrap();
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, CrawlError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_error_status_is_invocation_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let client = GroqClient::new(&config(server.url(), Some("bad"))).unwrap();
        let err = client.complete("hello").await.unwrap_err();

        match err {
            CrawlError::ClassifierInvocation(message) => assert!(message.contains("401")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(&config(server.url(), Some("gsk_test"))).unwrap();
        assert_eq!(client.complete("hello").await.unwrap(), "");
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let client =
            GroqClient::new(&config("http://127.0.0.1:9".to_string(), Some("gsk_secret"))).unwrap();

        let printed = format!("{:?}", client);

        assert!(!printed.contains("gsk_secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains(DEFAULT_MODEL));
    }
}
