//! Scripted completion client shared by unit tests

use crate::error::{Error, Result};
use crate::groq::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, Role, Usage};
use crate::llm_client::LlmClient;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted outcome
pub(crate) enum Scripted {
    Reply(String),
    Fail(String),
    NoChoices,
    NullContent,
}

/// Replays scripted outcomes in order, then answers `reply {n}`
pub(crate) struct ScriptedClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for reply in replies {
            client.push(Scripted::Reply(reply.into()));
        }
        client
    }

    pub(crate) fn push(&self, outcome: Scripted) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// User message of the n-th request
    pub(crate) fn user_prompt(&self, n: usize) -> String {
        self.requests()[n].messages[1].content.clone()
    }
}

fn choice(content: Option<String>) -> Choice {
    Choice {
        index: 0,
        message: ChoiceMessage {
            role: Role::Assistant,
            content,
        },
        finish_reason: Some("stop".to_string()),
    }
}

fn response(choices: Vec<Choice>) -> CompletionResponse {
    CompletionResponse {
        id: "scripted".to_string(),
        model: "scripted-model".to_string(),
        choices,
        usage: Some(Usage {
            prompt_tokens: 12,
            completion_tokens: 8,
            total_tokens: 20,
        }),
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(text)) => Ok(response(vec![choice(Some(text))])),
            Some(Scripted::Fail(message)) => Err(Error::completion(message)),
            Some(Scripted::NoChoices) => Ok(response(Vec::new())),
            Some(Scripted::NullContent) => Ok(response(vec![choice(None)])),
            None => Ok(response(vec![choice(Some(format!("reply {}", n)))])),
        }
    }

    fn client_type(&self) -> &str {
        "scripted"
    }

    fn endpoint(&self) -> &str {
        "http://localhost"
    }
}
