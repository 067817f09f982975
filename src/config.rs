//! Configuration types for the debate arena
//!
//! Everything here is read from the process environment (with `.env`
//! support) or built programmatically. Debate-specific files live in
//! [`crate::orchestrator::config`].

use crate::error::{Error, Result};
use dotenvy::dotenv;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default chat-completion endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default number of rebuttal rounds
pub const DEFAULT_ROUNDS: u32 = 3;

/// Model configuration shared by every speaker of a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "llama-3.3-70b-versatile")
    pub model: String,
    /// Temperature for sampling (0.0-2.0)
    pub temperature: f32,
    /// Fallback completion budget for prompts without a dedicated budget
    pub max_tokens: u32,
}

impl ModelConfig {
    /// Create a new model configuration
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: 400,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the fallback maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// Completion budgets (max output tokens) per debate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenBudgets {
    /// Opening statements
    pub opening: u32,
    /// Rebuttals
    pub rebuttal: u32,
    /// Self-critique of an argument
    pub critique: u32,
    /// Reflection on a position
    pub reflection: u32,
    /// Moderator round analysis
    pub analysis: u32,
    /// Moderator final conclusion
    pub conclusion: u32,
    /// Moderator quality evaluation
    pub evaluation: u32,
    /// Moderator fairness critique
    pub fairness: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            opening: 1000,
            rebuttal: 800,
            critique: 1200,
            reflection: 1000,
            analysis: 800,
            conclusion: 1200,
            evaluation: 1000,
            fairness: 1000,
        }
    }
}

/// Partial budget overrides; only the fields that are set replace a base value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenBudgetOverrides {
    /// Opening statements
    pub opening: Option<u32>,
    /// Rebuttals
    pub rebuttal: Option<u32>,
    /// Self-critique of an argument
    pub critique: Option<u32>,
    /// Reflection on a position
    pub reflection: Option<u32>,
    /// Moderator round analysis
    pub analysis: Option<u32>,
    /// Moderator final conclusion
    pub conclusion: Option<u32>,
    /// Moderator quality evaluation
    pub evaluation: Option<u32>,
    /// Moderator fairness critique
    pub fairness: Option<u32>,
}

impl TokenBudgetOverrides {
    /// Apply the set fields on top of `base`
    pub fn apply(&self, base: TokenBudgets) -> TokenBudgets {
        TokenBudgets {
            opening: self.opening.unwrap_or(base.opening),
            rebuttal: self.rebuttal.unwrap_or(base.rebuttal),
            critique: self.critique.unwrap_or(base.critique),
            reflection: self.reflection.unwrap_or(base.reflection),
            analysis: self.analysis.unwrap_or(base.analysis),
            conclusion: self.conclusion.unwrap_or(base.conclusion),
            evaluation: self.evaluation.unwrap_or(base.evaluation),
            fairness: self.fairness.unwrap_or(base.fairness),
        }
    }
}

/// Chat-completion client configuration
#[derive(Clone)]
pub struct GroqConfig {
    /// API key (loaded from environment variable)
    pub api_key: SecretString,
    /// Base URL of the OpenAI-compatible API
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
}

impl GroqConfig {
    /// Create a new configuration with a specific API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: default_base_url(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create a new configuration from the environment
    pub fn from_env() -> Result<Self> {
        // Load .env if present so local development picks up GROQ_API_KEY
        let _ = dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("GROQ_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);
        if let Some(raw) = lookup("GROQ_BASE_URL") {
            let base_url = Url::parse(&raw)
                .map_err(|e| Error::config(format!("Invalid GROQ_BASE_URL '{}': {}", raw, e)))?;
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "GROQ_TIMEOUT_SECS")? {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the API key as a string
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"***REDACTED***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Debate-level settings: model, budgets and the planned round count
#[derive(Debug, Clone, PartialEq)]
pub struct DebateSettings {
    /// Model used by both debaters and the moderator
    pub model: ModelConfig,
    /// Per-operation completion budgets
    pub budgets: TokenBudgets,
    /// Number of rebuttal rounds the driver plans to run
    pub rounds: u32,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            budgets: TokenBudgets::default(),
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl DebateSettings {
    /// Load settings from the environment
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(model) = lookup("GROQ_MODEL_NAME").filter(|m| !m.trim().is_empty()) {
            settings.model.model = model;
        }
        if let Some(temperature) = parse_var::<f32>(&lookup, "TEMPERATURE")? {
            settings.model.temperature = temperature;
        }
        if let Some(max_tokens) = parse_var::<u32>(&lookup, "MAX_TOKENS")? {
            settings.model.max_tokens = max_tokens;
        }
        if let Some(rounds) = parse_var::<u32>(&lookup, "DEBATE_ROUNDS")? {
            settings.rounds = rounds;
        }
        if let Some(opening) = parse_var::<u32>(&lookup, "OPENING_MAX_TOKENS")? {
            settings.budgets.opening = opening;
        }
        if let Some(rebuttal) = parse_var::<u32>(&lookup, "REBUTTAL_MAX_TOKENS")? {
            settings.budgets.rebuttal = rebuttal;
        }
        if let Some(conclusion) = parse_var::<u32>(&lookup, "CONCLUSION_MAX_TOKENS")? {
            settings.budgets.conclusion = conclusion;
        }

        Ok(settings)
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default base URL")
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::config(format!("Invalid value for {}: '{}' ({})", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = DebateSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.model.model, DEFAULT_MODEL);
        assert_eq!(settings.model.temperature, 0.7);
        assert_eq!(settings.model.max_tokens, 400);
        assert_eq!(settings.rounds, 3);
        assert_eq!(settings.budgets, TokenBudgets::default());
    }

    #[test]
    fn test_settings_overrides() {
        let settings = DebateSettings::from_lookup(lookup_from(&[
            ("GROQ_MODEL_NAME", "mixtral-8x7b"),
            ("TEMPERATURE", "0.2"),
            ("DEBATE_ROUNDS", "5"),
            ("REBUTTAL_MAX_TOKENS", "300"),
        ]))
        .unwrap();
        assert_eq!(settings.model.model, "mixtral-8x7b");
        assert_eq!(settings.model.temperature, 0.2);
        assert_eq!(settings.rounds, 5);
        assert_eq!(settings.budgets.rebuttal, 300);
        assert_eq!(settings.budgets.opening, 1000);
    }

    #[test]
    fn test_settings_rejects_garbage_numbers() {
        let err = DebateSettings::from_lookup(lookup_from(&[("DEBATE_ROUNDS", "three")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("DEBATE_ROUNDS"));
    }

    #[test]
    fn test_client_config_requires_key() {
        let err = GroqConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_client_config_redacts_key() {
        let config = GroqConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk-secret"),
            ("GROQ_BASE_URL", "https://openrouter.ai/api/v1"),
        ]))
        .unwrap();
        assert_eq!(config.api_key(), "gsk-secret");
        assert_eq!(config.base_url.as_str(), "https://openrouter.ai/api/v1");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
