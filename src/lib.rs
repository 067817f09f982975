//! # Debate Arena
//!
//! Structured debates between two LLM agents, refereed by an LLM moderator.
//!
//! ## Features
//!
//! - **Reasoning techniques**: Chain of Thought, Tree of Thoughts, ReAct,
//!   Self-Correction and Reflective prompt templates with matching parsers
//! - **Errors as data**: a failed completion becomes an `Error: ...` turn and
//!   the debate continues
//! - **Append-only transcript**: every opening and rebuttal is kept in order,
//!   with the moderator's analyses returned alongside
//! - **Export**: plain-text transcript and JSON snapshot
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use debate_arena::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(GroqClient::from_env()?);
//!     let settings = DebateSettings::from_env()?;
//!
//!     let mut debate = DebateOrchestrator::new(
//!         "Should remote work be the default?",
//!         "Yes, remote work should be the default",
//!         "No, offices should remain the default",
//!         &settings,
//!         client,
//!     )?;
//!
//!     let report = debate.run(settings.rounds).await?;
//!     println!("{}", report.conclusion.conclusion.content);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agent;
pub mod config;
pub mod error;
pub mod export;
pub mod groq;
pub mod llm_client;
pub mod moderator;
pub mod orchestrator;
pub mod reasoning;
pub mod tracing_ext;
pub mod turns;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use agent::{Agent, AgentBuilder, AgentResponse, Completion, DebateAgent};
pub use config::{DebateSettings, GroqConfig, ModelConfig, TokenBudgetOverrides, TokenBudgets};
pub use error::{Error, Result};
pub use export::{render_transcript, write_json, write_transcript, DebateExport};
pub use groq::{CompletionRequest, CompletionResponse, GroqClient};
pub use llm_client::LlmClient;
pub use moderator::Moderator;
pub use orchestrator::{DebateConfig, DebateOrchestrator, DebateReport, DebateSummary};
pub use reasoning::{build_prompt, combine_techniques, parse, Extraction, PromptParams, Technique};
pub use turns::{ConclusionRecord, DebatePhase, DebateSession, Speaker, Transcript, Turn, TurnKind};
pub use types::{AgentId, SessionId, TokenUsage, TurnId};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{AgentResponse, Completion};
    pub use crate::config::{DebateSettings, GroqConfig, ModelConfig};
    pub use crate::error::{Error, Result};
    pub use crate::groq::GroqClient;
    pub use crate::llm_client::LlmClient;
    pub use crate::orchestrator::{DebateConfig, DebateOrchestrator};
    pub use crate::reasoning::Technique;
    pub use crate::turns::{Speaker, Turn, TurnKind};
}
