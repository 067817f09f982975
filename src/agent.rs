//! Debate agents: a completion wrapper plus the debater operations built on it

use crate::config::{ModelConfig, TokenBudgets};
use crate::error::{Error, Result};
use crate::groq::{CompletionRequest, Message};
use crate::llm_client::LlmClient;
use crate::reasoning::{self, Extraction, PromptParams, Technique};
use crate::turns::Speaker;
use crate::types::{AgentId, TokenUsage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Context given to debaters for their opening statement
pub const DEBATE_CONTEXT: &str = "You are participating in a structured debate.";

/// Actions offered to a debater when rebutting
pub const REBUTTAL_ACTIONS: [&str; 4] = [
    "Analyze opponent's logical structure",
    "Identify fallacies or weak points",
    "Provide counter-evidence",
    "State your refined position",
];

/// Outcome of one completion call
///
/// Failures are data: the debate carries on with the error text in place of
/// an argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    /// The service produced text
    Generated {
        /// Generated text
        text: String,
        /// Model that answered
        model: String,
        /// Tokens consumed
        usage: TokenUsage,
    },
    /// The call failed
    Failed {
        /// Description of the failure
        error: String,
    },
}

impl Completion {
    /// Text to show for this completion; failures read `Error: ...`
    pub fn content(&self) -> String {
        match self {
            Self::Generated { text, .. } => text.clone(),
            Self::Failed { error } => format!("Error: {}", error),
        }
    }

    /// Whether the call failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Model that answered, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Generated { model, .. } => Some(model),
            Self::Failed { .. } => None,
        }
    }

    /// Token usage, zero on failure
    pub fn usage(&self) -> TokenUsage {
        match self {
            Self::Generated { usage, .. } => *usage,
            Self::Failed { .. } => TokenUsage::default(),
        }
    }
}

/// A completion tagged with who produced it and how it was prompted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Who spoke
    pub speaker: Speaker,
    /// Technique used to prompt and parse
    pub technique: Technique,
    /// Raw outcome
    pub completion: Completion,
    /// Structure parsed from the content
    pub extraction: Option<Extraction>,
}

impl AgentResponse {
    /// Tag a completion and run the technique's parser over its content
    ///
    /// Failed completions are parsed too, so an error text still yields
    /// whatever defaults the parser produces.
    pub fn new(speaker: Speaker, technique: Technique, completion: Completion) -> Self {
        let extraction = reasoning::parse(technique, &completion.content());
        Self {
            speaker,
            technique,
            completion,
            extraction,
        }
    }

    /// Tag a completion without parsing it
    pub fn unparsed(speaker: Speaker, technique: Technique, completion: Completion) -> Self {
        Self {
            speaker,
            technique,
            completion,
            extraction: None,
        }
    }

    /// Text to show for this response
    pub fn content(&self) -> String {
        self.completion.content()
    }

    /// Whether the underlying completion failed
    pub fn is_error(&self) -> bool {
        self.completion.is_error()
    }
}

/// A named persona bound to a model and a completion client
pub struct Agent {
    /// Unique identifier for this agent instance
    pub id: AgentId,
    /// Name used in the system instruction
    pub name: String,
    /// Role used in the system instruction
    pub role: String,
    /// LLM model configuration
    pub model: ModelConfig,
    client: Arc<dyn LlmClient>,
}

impl Agent {
    /// Create a new agent builder
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// System instruction sent with every request
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}, {}.\n\
             Your task is to think through your response step by step:\n\
             1. Analyze the question/statement\n\
             2. Identify key points to address\n\
             3. Generate your argument with logical flow\n\
             4. Review and refine your position\n\n\
             Be clear about your reasoning process.",
            self.name, self.role
        )
    }

    /// Send `user_prompt` and return the outcome, never an error
    pub async fn issue(&self, user_prompt: &str, max_tokens: u32) -> Completion {
        match self.try_issue(user_prompt, max_tokens).await {
            Ok(completion) => completion,
            Err(err) => {
                tracing::warn!(agent = %self.name, error = %err, "completion failed");
                Completion::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Send `user_prompt` with the model's default budget
    pub async fn issue_default(&self, user_prompt: &str) -> Completion {
        self.issue(user_prompt, self.model.max_tokens).await
    }

    async fn try_issue(&self, user_prompt: &str, max_tokens: u32) -> Result<Completion> {
        let messages = vec![Message::system(self.system_prompt()), Message::user(user_prompt)];
        let request = CompletionRequest::new(&self.model.model, messages)
            .with_temperature(self.model.temperature)
            .with_max_tokens(max_tokens);

        tracing::debug!(
            agent = %self.name,
            client = self.client.client_type(),
            max_tokens,
            "issuing completion"
        );

        let response = self.client.complete(request).await?;
        let text = response.first_content()?.to_string();

        Ok(Completion::Generated {
            text,
            model: response.model.clone(),
            usage: response.token_usage(),
        })
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("model", &self.model)
            .field("client", &self.client.client_type())
            .finish()
    }
}

/// Agent builder
#[derive(Default)]
pub struct AgentBuilder {
    name: Option<String>,
    role: Option<String>,
    model: Option<ModelConfig>,
    client: Option<Arc<dyn LlmClient>>,
}

impl AgentBuilder {
    /// Create a new agent builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the agent name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the agent role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the model configuration
    pub fn model(mut self, model: ModelConfig) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the completion client
    pub fn client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the agent
    ///
    /// Without an explicit client, a Groq client is built from the environment.
    pub fn build(self) -> Result<Agent> {
        let name = self.name.ok_or_else(|| Error::config("Agent name is required"))?;
        let role = self.role.ok_or_else(|| Error::config("Agent role is required"))?;

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(crate::groq::GroqClient::from_env()?) as Arc<dyn LlmClient>,
        };

        Ok(Agent {
            id: AgentId::new(),
            name,
            role,
            model: self.model.unwrap_or_default(),
            client,
        })
    }
}

/// A debater defending a fixed position
#[derive(Debug)]
pub struct DebateAgent {
    agent: Agent,
    speaker: Speaker,
    position: String,
    budgets: TokenBudgets,
}

impl DebateAgent {
    /// Create the debater speaking as `speaker`
    pub fn new(
        speaker: Speaker,
        position: impl Into<String>,
        model: ModelConfig,
        budgets: TokenBudgets,
        client: Arc<dyn LlmClient>,
    ) -> Result<Self> {
        if speaker == Speaker::Moderator {
            return Err(Error::config("the moderator cannot defend a position"));
        }
        let position = position.into();

        let agent = Agent::builder()
            .name(speaker.name())
            .role(format!("a debate agent defending the position: {}", position))
            .model(model)
            .client(client)
            .build()?;

        Ok(Self {
            agent,
            speaker,
            position,
            budgets,
        })
    }

    /// Who this debater speaks as
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// Position being defended
    pub fn position(&self) -> &str {
        &self.position
    }

    /// Underlying completion wrapper
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Chain-of-Thought opening statement on `topic`
    pub async fn opening_statement(&self, topic: &str) -> AgentResponse {
        let task = format!(
            "Debate Topic: {topic}\nYour Position: {position}\n\n\
             Provide a compelling opening statement that:\n\
             1. Clearly states your viewpoint\n\
             2. Provides 2-3 key arguments\n\
             3. Uses evidence or logical reasoning\n\
             4. Sets a strong foundation for debate",
            position = self.position
        );
        let params = PromptParams::new().with_context(DEBATE_CONTEXT);

        self.run(Technique::ChainOfThought, &task, &params, self.budgets.opening)
            .await
    }

    /// ReAct rebuttal of `opponent_argument`
    pub async fn respond_to_opponent(&self, opponent_argument: &str, topic: &str) -> AgentResponse {
        let task = format!(
            "Your opponent just argued:\n\"{opponent_argument}\"\n\n\
             Debate Topic: {topic}\nYour Position: {position}\n\n\
             Generate a strong rebuttal that addresses their points and strengthens your position.\n\
             Use the Reason-Act-Observe cycle to structure your thinking.",
            position = self.position
        );
        let params = PromptParams::new().with_actions(REBUTTAL_ACTIONS);

        self.run(Technique::ReAct, &task, &params, self.budgets.rebuttal)
            .await
    }

    /// Self-Correction critique of `initial_response`
    pub async fn self_critique(
        &self,
        initial_response: &str,
        counter_argument: Option<&str>,
    ) -> AgentResponse {
        let mut params = PromptParams::new();
        if let Some(counter) = counter_argument {
            params = params.with_counter_argument(counter);
        }

        self.run(
            Technique::SelfCorrection,
            initial_response,
            &params,
            self.budgets.critique,
        )
        .await
    }

    /// Reflective assessment of this debater's position
    pub async fn reflect_on_position(&self, debate_context: &str) -> AgentResponse {
        let params = PromptParams::new().with_position(&self.position);

        self.run(
            Technique::Reflective,
            debate_context,
            &params,
            self.budgets.reflection,
        )
        .await
    }

    async fn run(
        &self,
        technique: Technique,
        task: &str,
        params: &PromptParams,
        max_tokens: u32,
    ) -> AgentResponse {
        let prompt = reasoning::build_prompt(technique, task, params);
        let completion = self.agent.issue(&prompt, max_tokens).await;
        AgentResponse::new(self.speaker, technique, completion)
    }
}
