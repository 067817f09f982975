//! Values returned by the orchestrator phases

use crate::agent::AgentResponse;
use crate::turns::{ConclusionRecord, DebatePhase, DebateSession, Turn};
use crate::types::TokenUsage;
use serde::{Deserialize, Serialize};

/// Both opening statements, as appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningResult {
    /// Agent A's opening
    pub agent_a: Turn,
    /// Agent B's opening
    pub agent_b: Turn,
}

/// One executed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number given by the caller
    pub round: u32,
    /// Agent A's rebuttal, as appended
    pub agent_a: Turn,
    /// Agent B's rebuttal, as appended
    pub agent_b: Turn,
    /// Moderator analysis; never part of the transcript
    pub analysis: AgentResponse,
}

/// Everything a full run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateReport {
    /// Opening statements
    pub opening: OpeningResult,
    /// Rounds in execution order
    pub rounds: Vec<RoundResult>,
    /// Moderator conclusion
    pub conclusion: ConclusionRecord,
}

/// Counters describing a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateSummary {
    /// Debate topic
    pub topic: String,
    /// Agent A's position
    pub agent_a_position: String,
    /// Agent B's position
    pub agent_b_position: String,
    /// Current phase
    pub phase: DebatePhase,
    /// Number of executed rounds
    pub rounds_executed: u32,
    /// Number of rebuttal turns in the transcript
    pub rebuttal_count: usize,
    /// Number of turns in the transcript
    pub total_turns: usize,
    /// Whether a conclusion has been produced
    pub conclusion_available: bool,
    /// Tokens spent on recorded turns and the conclusion record
    pub total_usage: TokenUsage,
}

impl From<&DebateSession> for DebateSummary {
    fn from(session: &DebateSession) -> Self {
        let mut total_usage = TokenUsage::default();
        let concluding = session.conclusion().into_iter().flat_map(ConclusionRecord::turns);
        for turn in session.transcript().iter().chain(concluding) {
            total_usage.add(turn.usage);
        }

        Self {
            topic: session.topic().to_string(),
            agent_a_position: session.agent_a_position().to_string(),
            agent_b_position: session.agent_b_position().to_string(),
            phase: session.phase(),
            rounds_executed: session.rounds_executed(),
            rebuttal_count: session.transcript().rebuttal_count(),
            total_turns: session.transcript().len(),
            conclusion_available: session.conclusion().is_some(),
            total_usage,
        }
    }
}
