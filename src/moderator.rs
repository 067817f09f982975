//! Neutral moderator: round analysis, conclusion, quality and fairness checks

use crate::agent::{Agent, AgentResponse};
use crate::config::{ModelConfig, TokenBudgets};
use crate::error::Result;
use crate::llm_client::LlmClient;
use crate::reasoning::{self, reflective, PromptParams, Technique};
use crate::turns::Speaker;
use std::sync::Arc;

/// Context given to the moderator when analysing a round
pub const ANALYSIS_CONTEXT: &str = "You are a neutral moderator analyzing debate quality.";

/// Actions offered to the moderator when concluding
pub const CONCLUSION_ACTIONS: [&str; 5] = [
    "Identify common ground",
    "Evaluate argument quality",
    "Recognize valid perspectives",
    "Synthesize evidence",
    "Form balanced conclusion",
];

/// The debate moderator
#[derive(Debug)]
pub struct Moderator {
    agent: Agent,
    budgets: TokenBudgets,
}

impl Moderator {
    /// Create the moderator
    pub fn new(model: ModelConfig, budgets: TokenBudgets, client: Arc<dyn LlmClient>) -> Result<Self> {
        let agent = Agent::builder()
            .name(Speaker::Moderator.name())
            .role("a neutral debate moderator and analyst")
            .model(model)
            .client(client)
            .build()?;

        Ok(Self { agent, budgets })
    }

    /// Underlying completion wrapper
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Chain-of-Thought analysis of one pair of arguments
    pub async fn analyze_round(&self, topic: &str, agent_a: &str, agent_b: &str) -> AgentResponse {
        let task = format!(
            "Analyze this debate round objectively:\n\n\
             DEBATE TOPIC: {topic}\n\n\
             AGENT A'S ARGUMENT:\n\"{agent_a}\"\n\n\
             AGENT B'S ARGUMENT:\n\"{agent_b}\"\n\n\
             ANALYSIS STEPS:\n\
             1. Identify the core claim of each agent\n\
             2. Evaluate the strength of evidence presented\n\
             3. Spot logical fallacies or weak reasoning\n\
             4. Score each argument (Clarity: 0-10, Logic: 0-10, Evidence: 0-10)\n\
             5. Provide a balanced assessment\n\n\
             Be impartial and fair to both sides."
        );
        let params = PromptParams::new().with_context(ANALYSIS_CONTEXT);

        self.run(Technique::ChainOfThought, &task, &params, self.budgets.analysis)
            .await
    }

    /// ReAct synthesis over every argument of the debate
    ///
    /// Arguments are listed as `Round i: ...`, numbered from 1 in order.
    pub async fn final_conclusion<S: AsRef<str>>(&self, topic: &str, arguments: &[S]) -> AgentResponse {
        let listed = arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| format!("Round {}: {}", i + 1, arg.as_ref()))
            .collect::<Vec<_>>()
            .join("\n\n");

        let task = format!(
            "Debate Topic: {topic}\n\n\
             All arguments presented throughout the debate:\n{listed}\n\n\
             Your task: Provide a comprehensive, balanced final conclusion that:\n\
             1. Summarizes strongest arguments from both sides\n\
             2. Identifies areas of agreement\n\
             3. Acknowledges validity of different perspectives\n\
             4. Provides nuanced synthesis\n\
             5. Suggests areas for further exploration\n\n\
             Use the Reason-Act-Observe cycle for rigorous analysis."
        );
        let params = PromptParams::new().with_actions(CONCLUSION_ACTIONS);

        self.run(Technique::ReAct, &task, &params, self.budgets.conclusion)
            .await
    }

    /// Grade a rendered transcript; the reply is kept unparsed
    pub async fn evaluate_debate_quality(&self, transcript: &str, topic: &str) -> AgentResponse {
        let prompt = reflective::quality_evaluation_prompt(transcript, topic);
        let completion = self.agent.issue(&prompt, self.budgets.evaluation).await;
        AgentResponse::unparsed(Speaker::Moderator, Technique::Reflective, completion)
    }

    /// Self-Correction pass over the moderator's own fairness
    pub async fn critique_debate_fairness<A, B>(&self, agent_a_args: &[A], agent_b_args: &[B]) -> AgentResponse
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let joined_a = join_lines(agent_a_args);
        let joined_b = join_lines(agent_b_args);

        let review = format!(
            "MODERATOR FAIRNESS CHECK\n\n\
             AGENT A'S ARGUMENTS:\n{joined_a}\n\n\
             AGENT B'S ARGUMENTS:\n{joined_b}\n\n\
             SELF-CRITIQUE:\n\
             1. Have I been fair to both sides?\n\
             2. Which side did I favor (if any)?\n\
             3. What strengths did I miss in each argument?\n\
             4. Am I being biased toward any position?\n\
             5. How can I provide more balanced analysis?"
        );

        self.run(
            Technique::SelfCorrection,
            &review,
            &PromptParams::new(),
            self.budgets.fairness,
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
        AgentResponse::new(Speaker::Moderator, technique, completion)
    }
}

fn join_lines<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}
