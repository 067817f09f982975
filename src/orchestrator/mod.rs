//! Orchestrator module - the debate state machine
//!
//! A debate moves through fixed phases:
//!
//! - **NotStarted**: nothing said yet
//! - **OpeningDone**: both debaters gave a Chain-of-Thought opening
//! - **Round(k)**: ReAct rebuttals from A then B, analysed by the moderator
//! - **Concluded**: the moderator's conclusion, quality and fairness checks
//!
//! # Example
//!
//! ```rust,ignore
//! use debate_arena::orchestrator::{DebateConfig, DebateOrchestrator};
//!
//! let config = DebateConfig::from_file("debates/cars.yaml")?;
//! let mut debate = DebateOrchestrator::from_config(&config, &settings, client)?;
//! let report = debate.run(settings.rounds).await?;
//! ```

pub mod config;
pub mod debate;
pub mod result;

// Re-exports
pub use config::DebateConfig;
pub use debate::DebateOrchestrator;
pub use result::{DebateReport, DebateSummary, OpeningResult, RoundResult};
