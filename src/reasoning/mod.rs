//! Reasoning techniques: prompt templates and response parsers
//!
//! Every technique pairs a fixed prompt skeleton with a best-effort parser
//! that recovers structure from the model's free-text reply.
//!
//! # Techniques
//!
//! - **Chain of Thought**: forced step-by-step decomposition
//! - **Tree of Thoughts**: several scored approaches plus an evaluation
//! - **ReAct**: THOUGHT / ACTION / OBSERVATION / REASONING cycles
//! - **Self-Correction**: critique sections and a confidence score
//! - **Reflective**: meta-reflection on a position (no parser)
//!
//! Parsers never fail. Missing markers produce empty collections, an empty
//! string or the default confidence of 5.

pub mod chain_of_thought;
pub mod react;
pub mod reflective;
pub mod self_correction;
pub mod tree_of_thoughts;

pub use chain_of_thought::extract_reasoning_steps;
pub use react::{format_cycles, parse_react_cycles, ReActCycle};
pub use self_correction::{extract_improvements, Improvements, DEFAULT_CONFIDENCE};
pub use tree_of_thoughts::{evaluate_paths, parse_thought_tree, PathRanking, ThoughtPath, ThoughtTree};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of reasoning techniques
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    /// Chain of Thought
    #[serde(rename = "cot")]
    ChainOfThought,
    /// Tree of Thoughts
    #[serde(rename = "tot")]
    TreeOfThoughts,
    /// Reason + Act cycles
    #[serde(rename = "react")]
    ReAct,
    /// Self-critique and refinement
    #[serde(rename = "self_correction")]
    SelfCorrection,
    /// Reflection on reasoning quality
    #[serde(rename = "reflective")]
    Reflective,
}

impl Technique {
    /// Short machine code (`cot`, `react`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "cot",
            Self::TreeOfThoughts => "tot",
            Self::ReAct => "react",
            Self::SelfCorrection => "self_correction",
            Self::Reflective => "reflective",
        }
    }

    /// Human-readable name shown next to a turn
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "Chain of Thought",
            Self::TreeOfThoughts => "Tree of Thoughts",
            Self::ReAct => "ReAct",
            Self::SelfCorrection => "Self-Correction",
            Self::Reflective => "Reflective Thinking",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Technique-specific prompt parameters
///
/// Fields a technique does not use are ignored.
#[derive(Debug, Clone, Default)]
pub struct PromptParams {
    /// Framing text for Chain of Thought
    pub context: Option<String>,
    /// Number of approaches for Tree of Thoughts (default 3)
    pub num_paths: Option<u32>,
    /// Available actions for ReAct
    pub actions: Vec<String>,
    /// Opponent argument for Self-Correction
    pub counter_argument: Option<String>,
    /// Own position for Reflective
    pub position: Option<String>,
}

impl PromptParams {
    /// Empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the number of paths
    pub fn with_num_paths(mut self, num_paths: u32) -> Self {
        self.num_paths = Some(num_paths);
        self
    }

    /// Set the available actions
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the counter argument
    pub fn with_counter_argument(mut self, counter: impl Into<String>) -> Self {
        self.counter_argument = Some(counter.into());
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }
}

/// Build the prompt for `technique`
///
/// For Self-Correction `task` is the response under critique; for Reflective
/// it is the debate context.
pub fn build_prompt(technique: Technique, task: &str, params: &PromptParams) -> String {
    match technique {
        Technique::ChainOfThought => {
            chain_of_thought::prompt(task, params.context.as_deref().unwrap_or(""))
        }
        Technique::TreeOfThoughts => {
            tree_of_thoughts::prompt(task, params.num_paths.unwrap_or(3))
        }
        Technique::ReAct => react::prompt(task, params.actions.as_slice()),
        Technique::SelfCorrection => {
            self_correction::prompt(task, params.counter_argument.as_deref())
        }
        Technique::Reflective => {
            reflective::prompt(task, params.position.as_deref().unwrap_or(""))
        }
    }
}

/// Chain several techniques into one prompt, each with default parameters
pub fn combine_techniques(task: &str, techniques: &[Technique]) -> String {
    let mut combined = format!(
        "Use multiple reasoning techniques to address this task:\n\n{}\n\n",
        task
    );

    for technique in techniques {
        combined.push_str(&format!("\n--- {} ---\n", technique.code().to_uppercase()));
        combined.push_str(&build_prompt(*technique, task, &PromptParams::default()));
        combined.push('\n');
    }

    combined
}

/// Structured data recovered from a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Extraction {
    /// Chain-of-Thought steps in reply order
    ReasoningSteps(Vec<String>),
    /// ReAct cycles in reply order
    ReactCycles(Vec<ReActCycle>),
    /// Self-Correction sections
    Improvements(Improvements),
    /// Tree-of-Thoughts approaches and evaluation
    ThoughtTree(ThoughtTree),
}

impl Extraction {
    /// Human-readable listing of the recovered structure
    pub fn render(&self) -> String {
        match self {
            Self::ReasoningSteps(steps) => steps
                .iter()
                .enumerate()
                .map(|(i, step)| format!("Step {}:\n{}\n", i + 1, step))
                .collect(),
            Self::ReactCycles(cycles) => format_cycles(cycles),
            Self::Improvements(improvements) => {
                let mut out = String::new();
                if !improvements.weaknesses.is_empty() {
                    out.push_str("Identified weaknesses:\n");
                    for weakness in &improvements.weaknesses {
                        out.push_str(&format!("- {}\n", weakness));
                    }
                }
                if !improvements.valid_points.is_empty() {
                    out.push_str("Valid counter-points:\n");
                    for point in &improvements.valid_points {
                        out.push_str(&format!("- {}\n", point));
                    }
                }
                out.push_str(&format!("Confidence: {}/10\n", improvements.confidence));
                out
            }
            Self::ThoughtTree(tree) => {
                let mut out = String::new();
                for path in &tree.paths {
                    out.push_str(&format!(
                        "Approach {}: {} (strength {}, {} weaknesses)\n",
                        path.index,
                        path.concept,
                        path.strength,
                        path.weaknesses.len()
                    ));
                }
                if let Some(verdict) = &tree.verdict {
                    out.push_str(&format!("Best approach: {}\n", verdict.best_approach));
                }
                out
            }
        }
    }
}

/// Parse `raw` with the parser paired to `technique`
///
/// Reflective replies carry no structure and yield `None`.
pub fn parse(technique: Technique, raw: &str) -> Option<Extraction> {
    match technique {
        Technique::ChainOfThought => Some(Extraction::ReasoningSteps(
            extract_reasoning_steps(raw),
        )),
        Technique::TreeOfThoughts => Some(Extraction::ThoughtTree(parse_thought_tree(raw))),
        Technique::ReAct => Some(Extraction::ReactCycles(parse_react_cycles(raw))),
        Technique::SelfCorrection => Some(Extraction::Improvements(extract_improvements(raw))),
        Technique::Reflective => None,
    }
}
