//! Debate definitions loaded from YAML
//!
//! A debate file names the topic and both positions, and may override the
//! environment-derived settings:
//!
//! ```yaml
//! topic: "Should cities ban cars from their centres?"
//! agent_a_position: "Yes, car-free centres are better"
//! agent_b_position: "No, bans hurt access and commerce"
//! rounds: 2
//! model: llama-3.3-70b-versatile
//! temperature: 0.5
//! budgets:
//!   rebuttal: 600
//! reflection: true
//! ```

use crate::config::{DebateSettings, TokenBudgetOverrides};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One debate, as described in a YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Debate topic
    pub topic: String,
    /// Position defended by Agent A
    pub agent_a_position: String,
    /// Position defended by Agent B
    pub agent_b_position: String,
    /// Number of rebuttal rounds
    #[serde(default)]
    pub rounds: Option<u32>,
    /// Model identifier override
    #[serde(default)]
    pub model: Option<String>,
    /// Sampling temperature override
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Per-operation budget overrides; missing entries keep the base values
    #[serde(default)]
    pub budgets: TokenBudgetOverrides,
    /// Ask both debaters to reflect after the last round
    #[serde(default)]
    pub reflection: bool,
}

impl DebateConfig {
    /// Describe a debate in code
    pub fn new(
        topic: impl Into<String>,
        agent_a_position: impl Into<String>,
        agent_b_position: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            agent_a_position: agent_a_position.into(),
            agent_b_position: agent_b_position.into(),
            rounds: None,
            model: None,
            temperature: None,
            budgets: TokenBudgetOverrides::default(),
            reflection: false,
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Reject blank topics and positions
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("topic", &self.topic),
            ("agent_a_position", &self.agent_a_position),
            ("agent_b_position", &self.agent_b_position),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    /// Apply this file's overrides on top of `base`
    pub fn apply(&self, base: &DebateSettings) -> DebateSettings {
        let mut settings = base.clone();
        if let Some(rounds) = self.rounds {
            settings.rounds = rounds;
        }
        if let Some(model) = &self.model {
            settings.model.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            settings.model.temperature = temperature;
        }
        settings.budgets = self.budgets.apply(settings.budgets);
        settings
    }
}
