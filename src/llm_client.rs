//! Completion-service trait shared by the real client and test doubles

use crate::error::Result;
use crate::groq::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// Unified trait for chat-completion clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the client type for debugging/logging
    fn client_type(&self) -> &str;

    /// Get the endpoint the client talks to
    fn endpoint(&self) -> &str;
}
