//! ReAct (Reason + Act) prompting and cycle extraction

use serde::{Deserialize, Serialize};

/// Build a prompt asking for explicit Reason-Act-Observe cycles
pub fn prompt<S: AsRef<str>>(task: &str, available_actions: &[S]) -> String {
    let actions = available_actions
        .iter()
        .map(|action| format!("- {}", action.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an agent engaged in Reason-Act-Observe cycles.

TASK: {task}

AVAILABLE ACTIONS:
{actions}

CYCLE STRUCTURE (repeat as needed):
1. THOUGHT: What do I need to understand next?
2. ACTION: Which action should I take? (format: ACTION: [action name])
3. OBSERVATION: What did I learn from this action?
4. REASONING: How does this inform my argument?

Continue cycling until you have sufficient evidence for a strong conclusion.

Format your response with clear THOUGHT, ACTION, OBSERVATION, REASONING blocks."#
    )
}

/// One THOUGHT → ACTION → OBSERVATION → REASONING cycle
///
/// A field is `Some` as soon as its marker was seen, even with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReActCycle {
    /// What the agent needs to understand next
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    /// The action it chose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// What it learned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// How that informs the argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ReActCycle {
    /// True when no marker has been recorded
    pub fn is_empty(&self) -> bool {
        self.thought.is_none()
            && self.action.is_none()
            && self.observation.is_none()
            && self.reasoning.is_none()
    }

    fn set(&mut self, field: CycleField, value: String) {
        let slot = match field {
            CycleField::Thought => &mut self.thought,
            CycleField::Action => &mut self.action,
            CycleField::Observation => &mut self.observation,
            CycleField::Reasoning => &mut self.reasoning,
        };
        *slot = Some(value);
    }
}

/// Markers in the order they are tested against a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleField {
    Thought,
    Action,
    Observation,
    Reasoning,
}

impl CycleField {
    const ORDER: [CycleField; 4] = [
        CycleField::Thought,
        CycleField::Action,
        CycleField::Observation,
        CycleField::Reasoning,
    ];

    fn marker(self) -> &'static str {
        match self {
            Self::Thought => "THOUGHT:",
            Self::Action => "ACTION:",
            Self::Observation => "OBSERVATION:",
            Self::Reasoning => "REASONING:",
        }
    }

    /// First marker found in `line` and the text following it, up to any
    /// repeat of the same marker
    fn classify(line: &str) -> Option<(CycleField, String)> {
        Self::ORDER.into_iter().find_map(|field| {
            line.split(field.marker())
                .nth(1)
                .map(|value| (field, value.trim().to_string()))
        })
    }
}

/// Extract ReAct cycles from a reply
///
/// Every `THOUGHT:` line closes the open cycle (if anything was recorded) and
/// opens a new one. Other markers fill the open cycle, overwriting repeats.
/// The last open cycle is kept even without a closing `THOUGHT:`.
pub fn parse_react_cycles(response: &str) -> Vec<ReActCycle> {
    let mut cycles = Vec::new();
    let mut current = ReActCycle::default();

    for line in response.lines() {
        let Some((field, value)) = CycleField::classify(line) else {
            continue;
        };

        if field == CycleField::Thought && !current.is_empty() {
            cycles.push(std::mem::take(&mut current));
        }
        current.set(field, value);
    }

    if !current.is_empty() {
        cycles.push(current);
    }

    cycles
}

/// Format cycles as a human-readable trace
pub fn format_cycles(cycles: &[ReActCycle]) -> String {
    let mut output = String::new();

    for (i, cycle) in cycles.iter().enumerate() {
        output.push_str(&format!("=== Cycle {} ===\n", i + 1));

        if let Some(thought) = &cycle.thought {
            output.push_str(&format!("Thought: {}\n", thought));
        }
        if let Some(action) = &cycle.action {
            output.push_str(&format!("Action: {}\n", action));
        }
        if let Some(observation) = &cycle.observation {
            output.push_str(&format!("Observation: {}\n", observation));
        }
        if let Some(reasoning) = &cycle.reasoning {
            output.push_str(&format!("Reasoning: {}\n", reasoning));
        }
        output.push('\n');
    }

    output
}
