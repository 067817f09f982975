//! Turns, the append-only transcript and the debate session that owns it

use crate::agent::AgentResponse;
use crate::error::{Error, Result};
use crate::reasoning::{Extraction, Technique};
use crate::types::{SessionId, TokenUsage, TurnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// First debater
    #[serde(rename = "Agent A")]
    AgentA,
    /// Second debater
    #[serde(rename = "Agent B")]
    AgentB,
    /// Neutral moderator
    #[serde(rename = "Moderator")]
    Moderator,
}

impl Speaker {
    /// Display name, also used as the agent's name in prompts
    pub fn name(&self) -> &'static str {
        match self {
            Self::AgentA => "Agent A",
            Self::AgentB => "Agent B",
            Self::Moderator => "Moderator",
        }
    }

    /// The other debater; the moderator has no opponent
    pub fn opponent(&self) -> Option<Speaker> {
        match self {
            Self::AgentA => Some(Self::AgentB),
            Self::AgentB => Some(Self::AgentA),
            Self::Moderator => None,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a turn is
///
/// Serialized as its label (`opening`, `rebuttal_round_2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TurnKind {
    /// Opening statement
    Opening,
    /// Rebuttal in the given round
    Rebuttal {
        /// Round number as given by the driver
        round: u32,
    },
    /// Moderator analysis of the given round
    Analysis {
        /// Round number as given by the driver
        round: u32,
    },
    /// Moderator final conclusion
    Conclusion,
    /// Moderator quality evaluation
    QualityEvaluation,
    /// Moderator fairness self-check
    FairnessCheck,
}

impl TurnKind {
    /// Snake-case label
    pub fn label(&self) -> String {
        match self {
            Self::Opening => "opening".to_string(),
            Self::Rebuttal { round } => format!("rebuttal_round_{}", round),
            Self::Analysis { round } => format!("analysis_round_{}", round),
            Self::Conclusion => "conclusion".to_string(),
            Self::QualityEvaluation => "quality_evaluation".to_string(),
            Self::FairnessCheck => "fairness_check".to_string(),
        }
    }

    /// Upper-cased label with spaces, as printed in transcripts
    pub fn heading(&self) -> String {
        self.label().to_uppercase().replace('_', " ")
    }

    /// True for rebuttals
    pub fn is_rebuttal(&self) -> bool {
        matches!(self, Self::Rebuttal { .. })
    }
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<TurnKind> for String {
    fn from(kind: TurnKind) -> Self {
        kind.label()
    }
}

impl TryFrom<String> for TurnKind {
    type Error = Error;

    fn try_from(label: String) -> Result<Self> {
        let round = |prefix: &str| -> Option<u32> { label.strip_prefix(prefix)?.parse().ok() };

        match label.as_str() {
            "opening" => Ok(Self::Opening),
            "conclusion" => Ok(Self::Conclusion),
            "quality_evaluation" => Ok(Self::QualityEvaluation),
            "fairness_check" => Ok(Self::FairnessCheck),
            _ => {
                if let Some(round) = round("rebuttal_round_") {
                    Ok(Self::Rebuttal { round })
                } else if let Some(round) = round("analysis_round_") {
                    Ok(Self::Analysis { round })
                } else {
                    Err(Error::other(format!("unknown turn kind '{}'", label)))
                }
            }
        }
    }
}

/// One immutable entry of a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn identifier
    pub id: TurnId,
    /// Who spoke
    #[serde(rename = "agent")]
    pub speaker: Speaker,
    /// What kind of turn this is
    #[serde(rename = "type")]
    pub kind: TurnKind,
    /// Text shown to readers; `Error: ...` when the completion failed
    pub content: String,
    /// Technique used to prompt and parse
    pub technique: Technique,
    /// Structure recovered from `content`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<Extraction>,
    /// Model that produced the text, absent on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Token usage for this turn
    #[serde(default)]
    pub usage: TokenUsage,
    /// Whether the completion failed
    #[serde(default)]
    pub error: bool,
    /// When the turn was produced
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Build a turn from an agent response
    pub fn from_response(kind: TurnKind, response: AgentResponse) -> Self {
        let content = response.content();
        Self {
            id: TurnId::new(),
            speaker: response.speaker,
            kind,
            model: response.completion.model().map(str::to_string),
            usage: response.completion.usage(),
            error: response.completion.is_error(),
            content,
            technique: response.technique,
            extraction: response.extraction,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return a reference to it
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when nothing has been said yet
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Most recently appended turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Iterate turns in order
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Contents of every turn in order
    pub fn contents(&self) -> Vec<&str> {
        self.turns.iter().map(|turn| turn.content.as_str()).collect()
    }

    /// Contents of the turns spoken by `speaker`, in order
    pub fn contents_by(&self, speaker: Speaker) -> Vec<&str> {
        self.turns
            .iter()
            .filter(|turn| turn.speaker == speaker)
            .map(|turn| turn.content.as_str())
            .collect()
    }

    /// Latest turn spoken by `speaker`
    pub fn last_by(&self, speaker: Speaker) -> Option<&Turn> {
        self.turns.iter().rev().find(|turn| turn.speaker == speaker)
    }

    /// Number of rebuttal turns
    pub fn rebuttal_count(&self) -> usize {
        self.turns.iter().filter(|turn| turn.kind.is_rebuttal()).count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Moderator output of the concluding phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclusionRecord {
    /// Final balanced conclusion
    pub conclusion: Turn,
    /// Quality evaluation of the whole debate
    pub quality_evaluation: Turn,
    /// Moderator fairness self-critique
    pub fairness_check: Turn,
}

impl ConclusionRecord {
    /// Conclusion, quality evaluation and fairness check, in that order
    pub fn turns(&self) -> [&Turn; 3] {
        [&self.conclusion, &self.quality_evaluation, &self.fairness_check]
    }
}

/// Lifecycle phase of a debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "round", rename_all = "snake_case")]
pub enum DebatePhase {
    /// Nothing has happened yet
    NotStarted,
    /// Both opening statements are in
    OpeningDone,
    /// The given round has been executed
    Round(u32),
    /// A conclusion has been produced
    Concluded,
}

/// In-memory state of one debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    /// Unique session identifier
    pub id: SessionId,
    topic: String,
    agent_a_position: String,
    agent_b_position: String,
    transcript: Transcript,
    conclusion: Option<ConclusionRecord>,
    phase: DebatePhase,
    rounds_executed: u32,
    created_at: DateTime<Utc>,
}

impl DebateSession {
    /// Create a session that has not started yet
    pub fn new(
        topic: impl Into<String>,
        agent_a_position: impl Into<String>,
        agent_b_position: impl Into<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            topic: topic.into(),
            agent_a_position: agent_a_position.into(),
            agent_b_position: agent_b_position.into(),
            transcript: Transcript::new(),
            conclusion: None,
            phase: DebatePhase::NotStarted,
            rounds_executed: 0,
            created_at: Utc::now(),
        }
    }

    /// Debate topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Position defended by `speaker`; the moderator has none
    pub fn position(&self, speaker: Speaker) -> Option<&str> {
        match speaker {
            Speaker::AgentA => Some(&self.agent_a_position),
            Speaker::AgentB => Some(&self.agent_b_position),
            Speaker::Moderator => None,
        }
    }

    /// Agent A's position
    pub fn agent_a_position(&self) -> &str {
        &self.agent_a_position
    }

    /// Agent B's position
    pub fn agent_b_position(&self) -> &str {
        &self.agent_b_position
    }

    /// The transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The conclusion record, once concluded
    pub fn conclusion(&self) -> Option<&ConclusionRecord> {
        self.conclusion.as_ref()
    }

    /// Text of the final conclusion, once concluded
    pub fn conclusion_text(&self) -> Option<&str> {
        self.conclusion
            .as_ref()
            .map(|record| record.conclusion.content.as_str())
    }

    /// Current phase
    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    /// Number of `execute_round` calls so far
    pub fn rounds_executed(&self) -> u32 {
        self.rounds_executed
    }

    /// When the session was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn append(&mut self, turn: Turn) -> &Turn {
        self.transcript.push(turn)
    }

    pub(crate) fn set_phase(&mut self, phase: DebatePhase) {
        self.phase = phase;
    }

    pub(crate) fn record_round(&mut self, round: u32) {
        self.rounds_executed += 1;
        self.phase = DebatePhase::Round(round);
    }

    pub(crate) fn set_conclusion(&mut self, record: ConclusionRecord) {
        self.conclusion = Some(record);
    }
}
