//! Debate orchestrator
//!
//! Two debaters and a moderator take turns in a fixed order:
//! openings, then rebuttal rounds, then the moderator's conclusion.
//! Completion failures never stop a debate; their error text is recorded in
//! place of the argument.

use crate::agent::{AgentResponse, DebateAgent};
use crate::config::DebateSettings;
use crate::error::{Error, Result};
use crate::export;
use crate::llm_client::LlmClient;
use crate::moderator::Moderator;
use crate::orchestrator::config::DebateConfig;
use crate::orchestrator::result::{DebateReport, DebateSummary, OpeningResult, RoundResult};
use crate::turns::{
    ConclusionRecord, DebatePhase, DebateSession, Speaker, Transcript, Turn, TurnKind,
};
use chrono::Local;
use std::sync::Arc;

/// Drives one debate session
#[derive(Debug)]
pub struct DebateOrchestrator {
    session: DebateSession,
    agent_a: DebateAgent,
    agent_b: DebateAgent,
    moderator: Moderator,
}

impl DebateOrchestrator {
    /// Create an orchestrator whose participants share `client`
    pub fn new(
        topic: impl Into<String>,
        agent_a_position: impl Into<String>,
        agent_b_position: impl Into<String>,
        settings: &DebateSettings,
        client: Arc<dyn LlmClient>,
    ) -> Result<Self> {
        let session = DebateSession::new(topic, agent_a_position, agent_b_position);

        let agent_a = DebateAgent::new(
            Speaker::AgentA,
            session.agent_a_position(),
            settings.model.clone(),
            settings.budgets,
            client.clone(),
        )?;
        let agent_b = DebateAgent::new(
            Speaker::AgentB,
            session.agent_b_position(),
            settings.model.clone(),
            settings.budgets,
            client.clone(),
        )?;
        let moderator = Moderator::new(settings.model.clone(), settings.budgets, client)?;

        Ok(Self {
            session,
            agent_a,
            agent_b,
            moderator,
        })
    }

    /// Create an orchestrator from a debate file, layering its overrides on `settings`
    pub fn from_config(
        config: &DebateConfig,
        settings: &DebateSettings,
        client: Arc<dyn LlmClient>,
    ) -> Result<Self> {
        config.validate()?;
        Self::new(
            &config.topic,
            &config.agent_a_position,
            &config.agent_b_position,
            &config.apply(settings),
            client,
        )
    }

    /// Both opening statements, A then B
    ///
    /// Only valid before anything else has happened.
    pub async fn start(&mut self) -> Result<OpeningResult> {
        if self.session.phase() != DebatePhase::NotStarted {
            return Err(Error::invalid_state(format!(
                "debate already started (phase {:?})",
                self.session.phase()
            )));
        }

        tracing::info!(topic = %self.session.topic(), "starting debate");
        let topic = self.session.topic().to_string();

        let a = self.agent_a.opening_statement(&topic).await;
        let agent_a = self.record(TurnKind::Opening, a);

        let b = self.agent_b.opening_statement(&topic).await;
        let agent_b = self.record(TurnKind::Opening, b);

        self.session.set_phase(DebatePhase::OpeningDone);
        Ok(OpeningResult { agent_a, agent_b })
    }

    /// One rebuttal round
    ///
    /// Agent A answers the most recent turn, Agent B answers A's rebuttal and
    /// the moderator analyses both. The analysis is returned but not recorded.
    pub async fn execute_round(&mut self, round: u32) -> RoundResult {
        tracing::info!(round, "executing round");
        let topic = self.session.topic().to_string();
        let opponent_argument = self
            .session
            .transcript()
            .last()
            .map(|turn| turn.content.clone())
            .unwrap_or_default();

        let a = self
            .agent_a
            .respond_to_opponent(&opponent_argument, &topic)
            .await;
        let agent_a = self.record(TurnKind::Rebuttal { round }, a);

        let b = self
            .agent_b
            .respond_to_opponent(&agent_a.content, &topic)
            .await;
        let agent_b = self.record(TurnKind::Rebuttal { round }, b);

        let analysis = self
            .moderator
            .analyze_round(&topic, &agent_a.content, &agent_b.content)
            .await;

        self.session.record_round(round);
        RoundResult {
            round,
            agent_a,
            agent_b,
            analysis,
        }
    }

    /// Moderator conclusion, quality evaluation and fairness check
    ///
    /// Replaces any earlier conclusion. Adds no turns to the transcript.
    pub async fn conclude(&mut self) -> ConclusionRecord {
        tracing::info!(turns = self.session.transcript().len(), "concluding debate");
        let topic = self.session.topic().to_string();

        let arguments = self.session.transcript().contents();
        let conclusion = self.moderator.final_conclusion(&topic, &arguments).await;
        let conclusion = Turn::from_response(TurnKind::Conclusion, conclusion);

        let rendered = export::render_with_conclusion(
            &self.session,
            Some(&conclusion.content),
            Local::now().naive_local(),
        );
        let quality = self
            .moderator
            .evaluate_debate_quality(&rendered, &topic)
            .await;

        let transcript = self.session.transcript();
        let fairness = self
            .moderator
            .critique_debate_fairness(
                &transcript.contents_by(Speaker::AgentA),
                &transcript.contents_by(Speaker::AgentB),
            )
            .await;

        let record = ConclusionRecord {
            conclusion,
            quality_evaluation: Turn::from_response(TurnKind::QualityEvaluation, quality),
            fairness_check: Turn::from_response(TurnKind::FairnessCheck, fairness),
        };

        self.session.set_conclusion(record.clone());
        self.session.set_phase(DebatePhase::Concluded);
        record
    }

    /// Start, run rounds `1..=rounds`, then conclude
    pub async fn run(&mut self, rounds: u32) -> Result<DebateReport> {
        let opening = self.start().await?;

        let mut executed = Vec::with_capacity(rounds as usize);
        for round in 1..=rounds {
            executed.push(self.execute_round(round).await);
        }

        let conclusion = self.conclude().await;
        Ok(DebateReport {
            opening,
            rounds: executed,
            conclusion,
        })
    }

    /// Let a debater reflect on its position in light of the debate so far
    ///
    /// The reflection is returned, not recorded.
    pub async fn reflect(&self, speaker: Speaker) -> Result<AgentResponse> {
        let debater = self.debater(speaker)?;
        let transcript = self.session.transcript();

        let context = format!(
            "Debate Topic: {}\nRounds completed: {}\n\nYour latest argument:\n\"{}\"\n\nOpponent's latest argument:\n\"{}\"",
            self.session.topic(),
            self.session.rounds_executed(),
            latest(transcript, speaker),
            speaker.opponent().map(|o| latest(transcript, o)).unwrap_or(""),
        );

        Ok(debater.reflect_on_position(&context).await)
    }

    /// Let a debater critique its latest argument against the opponent's latest
    ///
    /// The critique is returned, not recorded.
    pub async fn self_critique(&self, speaker: Speaker) -> Result<AgentResponse> {
        let debater = self.debater(speaker)?;
        let transcript = self.session.transcript();

        let own = latest(transcript, speaker);
        let counter = speaker
            .opponent()
            .and_then(|o| transcript.last_by(o))
            .map(|turn| turn.content.as_str());

        Ok(debater.self_critique(own, counter).await)
    }

    /// Session state
    pub fn session(&self) -> &DebateSession {
        &self.session
    }

    /// Turns so far
    pub fn transcript(&self) -> &Transcript {
        self.session.transcript()
    }

    /// Current phase
    pub fn phase(&self) -> DebatePhase {
        self.session.phase()
    }

    /// Counters describing the session
    pub fn summary(&self) -> DebateSummary {
        DebateSummary::from(&self.session)
    }

    fn debater(&self, speaker: Speaker) -> Result<&DebateAgent> {
        match speaker {
            Speaker::AgentA => Ok(&self.agent_a),
            Speaker::AgentB => Ok(&self.agent_b),
            Speaker::Moderator => Err(Error::invalid_state(
                "the moderator does not defend a position",
            )),
        }
    }

    fn record(&mut self, kind: TurnKind, response: AgentResponse) -> Turn {
        if response.is_error() {
            tracing::warn!(speaker = %response.speaker, kind = %kind, "recording failed completion");
        }
        self.session
            .append(Turn::from_response(kind, response))
            .clone()
    }
}

fn latest(transcript: &Transcript, speaker: Speaker) -> &str {
    transcript
        .last_by(speaker)
        .map(|turn| turn.content.as_str())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::testing::{Scripted, ScriptedClient};
    use crate::types::TokenUsage;

    fn orchestrator(client: Arc<ScriptedClient>) -> DebateOrchestrator {
        let settings = DebateSettings {
            model: ModelConfig::new("test-model"),
            ..DebateSettings::default()
        };
        DebateOrchestrator::new("X", "Pro-X", "Anti-X", &settings, client).unwrap()
    }

    #[tokio::test]
    async fn test_start_appends_both_openings() {
        let client = Arc::new(ScriptedClient::with_replies(["A opening", "B opening"]));
        let mut debate = orchestrator(client);

        let opening = debate.start().await.unwrap();
        assert_eq!(opening.agent_a.content, "A opening");
        assert_eq!(opening.agent_b.speaker, Speaker::AgentB);
        assert_eq!(debate.phase(), DebatePhase::OpeningDone);
        assert_eq!(debate.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let client = Arc::new(ScriptedClient::new());
        let mut debate = orchestrator(client.clone());

        debate.start().await.unwrap();
        let err = debate.start().await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(debate.transcript().len(), 2);
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_round_appends_rebuttals_not_analysis() {
        let client = Arc::new(ScriptedClient::with_replies([
            "A opening",
            "B opening",
            "A rebuttal",
            "B rebuttal",
            "Moderator analysis",
        ]));
        let mut debate = orchestrator(client.clone());

        debate.start().await.unwrap();
        let round = debate.execute_round(1).await;

        let kinds: Vec<(Speaker, TurnKind)> = debate
            .transcript()
            .iter()
            .map(|turn| (turn.speaker, turn.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (Speaker::AgentA, TurnKind::Opening),
                (Speaker::AgentB, TurnKind::Opening),
                (Speaker::AgentA, TurnKind::Rebuttal { round: 1 }),
                (Speaker::AgentB, TurnKind::Rebuttal { round: 1 }),
            ]
        );
        assert_eq!(round.analysis.content(), "Moderator analysis");
        assert!(debate
            .transcript()
            .iter()
            .all(|turn| turn.content != "Moderator analysis"));

        // A answers B's opening, B answers A's rebuttal
        assert!(client.user_prompt(2).contains("\"B opening\""));
        assert!(client.user_prompt(3).contains("\"A rebuttal\""));
        assert!(client.user_prompt(4).contains("AGENT A'S ARGUMENT:\n\"A rebuttal\""));
        assert_eq!(debate.phase(), DebatePhase::Round(1));
    }

    #[tokio::test]
    async fn test_round_without_start_uses_empty_argument() {
        let client = Arc::new(ScriptedClient::new());
        let mut debate = orchestrator(client.clone());

        let round = debate.execute_round(7).await;
        assert_eq!(round.agent_a.kind, TurnKind::Rebuttal { round: 7 });
        assert!(client.user_prompt(0).contains("Your opponent just argued:\n\"\""));
        assert_eq!(debate.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_completion_recorded_verbatim() {
        let client = Arc::new(ScriptedClient::new());
        client.push(Scripted::Fail("boom".to_string()));
        let mut debate = orchestrator(client);

        let opening = debate.start().await.unwrap();
        assert!(opening.agent_a.error);
        assert_eq!(opening.agent_a.content, "Error: Completion service error: boom");
        assert!(!opening.agent_b.error);
        assert_eq!(debate.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_rebuttal_is_quoted_to_opponent() {
        let client = Arc::new(ScriptedClient::with_replies(["A opening", "B opening"]));
        client.push(Scripted::Fail("boom".to_string()));
        let mut debate = orchestrator(client.clone());

        debate.start().await.unwrap();
        let round = debate.execute_round(1).await;

        assert!(round.agent_a.error);
        assert!(!round.agent_b.error);
        assert!(client
            .user_prompt(3)
            .contains("\"Error: Completion service error: boom\""));
        assert_eq!(debate.transcript().len(), 4);
        assert_eq!(
            debate.transcript().last_by(Speaker::AgentA).map(|t| t.error),
            Some(true)
        );
        assert!(!round.analysis.completion.is_error());
        assert!(client
            .user_prompt(4)
            .contains("AGENT A'S ARGUMENT:\n\"Error: Completion service error: boom\""));
        assert_eq!(debate.phase(), DebatePhase::Round(1));
    }

    #[tokio::test]
    async fn test_failed_conclusion_is_stored_and_rendered() {
        let client = Arc::new(ScriptedClient::with_replies(["A opening", "B opening"]));
        client.push(Scripted::Fail("rate limited".to_string()));
        let mut debate = orchestrator(client);

        debate.start().await.unwrap();
        let record = debate.conclude().await;

        assert!(record.conclusion.error);
        assert_eq!(
            debate.session().conclusion_text(),
            Some("Error: Completion service error: rate limited")
        );
        assert_eq!(debate.phase(), DebatePhase::Concluded);

        let text = export::render_transcript(debate.session(), Local::now().naive_local());
        assert!(text.contains(&format!(
            "MODERATOR FINAL CONCLUSION\n{}\nError: Completion service error: rate limited\n",
            "=".repeat(80)
        )));
    }

    #[tokio::test]
    async fn test_conclude_twice_overwrites() {
        let client = Arc::new(ScriptedClient::new());
        let mut debate = orchestrator(client.clone());

        debate.start().await.unwrap();
        debate.execute_round(1).await;
        let first = debate.conclude().await;
        let turns = debate.transcript().len();
        let second = debate.conclude().await;

        assert_eq!(debate.transcript().len(), turns);
        assert_ne!(first.conclusion.content, second.conclusion.content);
        assert_eq!(
            debate.session().conclusion_text(),
            Some(second.conclusion.content.as_str())
        );
        assert_eq!(debate.phase(), DebatePhase::Concluded);
    }

    #[tokio::test]
    async fn test_conclude_inputs() {
        let client = Arc::new(ScriptedClient::with_replies([
            "A opening",
            "B opening",
            "Final word",
        ]));
        let mut debate = orchestrator(client.clone());

        debate.start().await.unwrap();
        let record = debate.conclude().await;
        assert_eq!(record.conclusion.kind, TurnKind::Conclusion);
        assert_eq!(record.quality_evaluation.kind, TurnKind::QualityEvaluation);
        assert_eq!(record.fairness_check.kind, TurnKind::FairnessCheck);

        assert!(client
            .user_prompt(2)
            .contains("Round 1: A opening\n\nRound 2: B opening"));
        // the evaluated transcript already carries the new conclusion
        assert!(client
            .user_prompt(3)
            .contains("MODERATOR FINAL CONCLUSION\n================"));
        assert!(client.user_prompt(3).contains("Final word"));
        let fairness = client.user_prompt(4);
        assert!(fairness.contains("AGENT A'S ARGUMENTS:\nA opening\n"));
        assert!(fairness.contains("AGENT B'S ARGUMENTS:\nB opening\n"));
    }

    #[tokio::test]
    async fn test_reflect_and_critique_are_not_recorded() {
        let client = Arc::new(ScriptedClient::with_replies(["A opening", "B opening"]));
        let mut debate = orchestrator(client.clone());
        debate.start().await.unwrap();

        let reflection = debate.reflect(Speaker::AgentB).await.unwrap();
        assert_eq!(reflection.speaker, Speaker::AgentB);
        let prompt = client.user_prompt(2);
        assert!(prompt.contains("Your latest argument:\n\"B opening\""));
        assert!(prompt.contains("YOUR POSITION: Anti-X"));

        let critique = debate.self_critique(Speaker::AgentA).await.unwrap();
        assert!(critique.extraction.is_some());
        let prompt = client.user_prompt(3);
        assert!(prompt.contains("YOUR INITIAL RESPONSE:\n\"A opening\""));
        assert!(prompt.contains("OPPONENT'S ARGUMENT:\n\"B opening\""));

        assert_eq!(debate.transcript().len(), 2);
        assert!(debate.reflect(Speaker::Moderator).await.is_err());
    }

    #[tokio::test]
    async fn test_end_to_end_single_round() {
        let client = Arc::new(ScriptedClient::new());
        let mut debate = orchestrator(client);

        let report = debate.run(1).await.unwrap();
        assert_eq!(report.rounds.len(), 1);

        let export = export::DebateExport::from_session(debate.session(), chrono::Utc::now());
        assert_eq!(export.messages.len(), 4);
        assert!(export.conclusion.is_some());
        assert_eq!(export.metadata.topic, "X");
        assert_eq!(export.metadata.agent_a_position, "Pro-X");
        assert_eq!(export.metadata.agent_b_position, "Anti-X");

        let summary = debate.summary();
        assert_eq!(summary.rounds_executed, 1);
        assert_eq!(summary.rebuttal_count, 2);
        assert_eq!(summary.total_turns, 4);
        assert!(summary.conclusion_available);
        // four transcript turns plus three concluding turns, 12 + 8 tokens each
        assert_eq!(summary.total_usage, TokenUsage::new(84, 56));
    }

    #[tokio::test]
    async fn test_from_config_applies_overrides() {
        let client = Arc::new(ScriptedClient::new());
        let mut config = DebateConfig::new("Y", "Pro-Y", "Anti-Y");
        config.model = Some("yaml-model".to_string());

        let mut debate =
            DebateOrchestrator::from_config(&config, &DebateSettings::default(), client.clone())
                .unwrap();
        debate.start().await.unwrap();

        assert_eq!(debate.session().topic(), "Y");
        assert_eq!(client.requests()[0].model, "yaml-model");
    }
}
