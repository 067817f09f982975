//! OpenAI-compatible chat-completion client
//!
//! Defaults to Groq's endpoint; any server speaking the `/chat/completions`
//! dialect (OpenRouter, vLLM, ...) works by changing the base URL.

use crate::config::GroqConfig;
use crate::error::{Error, Result};
use crate::llm_client::LlmClient;
use crate::types::TokenUsage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Chat-completion API client
pub struct GroqClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: GroqConfig,
    /// `{base_url}/chat/completions`, computed once
    endpoint: String,
}

impl GroqClient {
    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GroqConfig::from_env()?;
        Self::new(config)
    }

    /// Create a new client with the given configuration
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/chat/completions",
            config.base_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Send a completion request
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            max_tokens = ?request.max_tokens,
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::completion(format!(
                "Request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(completion)
    }

    /// Get the configuration
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        GroqClient::complete(self, request).await
    }

    fn client_type(&self) -> &str {
        "groq"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<Message>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens for completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// Completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Unique identifier
    #[serde(default)]
    pub id: String,
    /// Model used
    pub model: String,
    /// Choices
    pub choices: Vec<Choice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Text of the first choice
    ///
    /// An empty choice list and a first choice with `content: null` are
    /// reported as distinct errors.
    pub fn first_content(&self) -> Result<&str> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| Error::completion("response contained no choices"))?;
        choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| Error::completion("first choice had no content"))
    }

    /// Token usage, zeroed when the service omitted it
    pub fn token_usage(&self) -> TokenUsage {
        self.usage.clone().map(TokenUsage::from).unwrap_or_default()
    }
}

/// Choice in completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Index of the choice
    #[serde(default)]
    pub index: u32,
    /// Message content
    pub message: ChoiceMessage,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice; content may be null
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Role of the sender
    pub role: Role,
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u64,
    /// Completion tokens
    pub completion_tokens: u64,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: u64,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        TokenUsage::new(usage.prompt_tokens, usage.completion_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn client_for(server: &mockito::Server) -> GroqClient {
        let config = GroqConfig::new("test-key")
            .with_base_url(Url::parse(&server.url()).unwrap());
        GroqClient::new(config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            "llama-3.3-70b-versatile",
            vec![Message::system("You are Agent A."), Message::user("Open.")],
        )
        .with_temperature(0.7)
        .with_max_tokens(1000)
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Open.");
        assert_eq!(json["max_tokens"], 1000);

        let bare = serde_json::to_value(CompletionRequest::new("m", vec![])).unwrap();
        assert!(bare.get("temperature").is_none());
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let config = GroqConfig::new("k")
            .with_base_url(Url::parse("https://api.groq.com/openai/v1/").unwrap());
        let client = GroqClient::new(config).unwrap();
        assert_eq!(
            LlmClient::endpoint(&client),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": "chatcmpl-1",
                    "model": "llama-3.3-70b-versatile",
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": "First, I argue."}, "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client.complete(request()).await.unwrap();

        assert_eq!(response.first_content().unwrap(), "First, I argue.");
        assert_eq!(response.token_usage(), TokenUsage::new(42, 7));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, Error::Completion(_)));
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.complete(request()).await,
            Err(Error::Http(_))
        ));
    }
}
