//! Self-Correction: critique an argument and extract the refined version

use serde::{Deserialize, Serialize};

/// Confidence reported when the reply gives no usable score
pub const DEFAULT_CONFIDENCE: u8 = 5;

/// Build a self-critique prompt, optionally confronting an opponent argument
pub fn prompt(initial_response: &str, counter_argument: Option<&str>) -> String {
    let counter_section = match counter_argument {
        Some(counter) => format!(
            "\nOPPONENT'S ARGUMENT:\n\"{counter}\"\n\nHow strong are these counter-points? Where are the weaknesses?\n"
        ),
        None => String::new(),
    };

    format!(
        r#"SELF-CRITIQUE: Review and improve your argument

YOUR INITIAL RESPONSE:
"{initial_response}"

{counter_section}

CRITICAL ANALYSIS:
1. What are the LOGICAL WEAKNESSES in my response?
2. What ASSUMPTIONS am I making?
3. What EVIDENCE am I missing?
4. What FALLACIES might I be committing?
5. How could an INTELLIGENT CRITIC attack this argument?

REFINEMENT:
Based on this critique, provide an IMPROVED version that:
- Addresses identified weaknesses
- Provides stronger evidence
- Acknowledges valid counter-points
- Uses more rigorous logic

FORMAT:
=== IDENTIFIED WEAKNESSES ===
[list weaknesses]

=== VALID COUNTER-POINTS ===
[acknowledge what's valid]

=== IMPROVED ARGUMENT ===
[refined response]

=== CONFIDENCE LEVEL ===
[1-10 score for improved argument]"#
    )
}

/// Sections recovered from a self-critique reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvements {
    /// Bullet points under IDENTIFIED WEAKNESSES
    pub weaknesses: Vec<String>,
    /// Bullet points under VALID COUNTER-POINTS
    pub valid_points: Vec<String>,
    /// Non-blank lines under IMPROVED ARGUMENT, each ending in `\n`
    pub improved_argument: String,
    /// Leading digit of the first line under CONFIDENCE LEVEL
    ///
    /// Only one digit is read, so the value is not clamped to the 1-10 scale
    /// the prompt asks for: a leading `0` yields 0 and `10` yields 1.
    pub confidence: u8,
}

impl Default for Improvements {
    fn default() -> Self {
        Self {
            weaknesses: Vec::new(),
            valid_points: Vec::new(),
            improved_argument: String::new(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

/// Section the parser is currently reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Weaknesses,
    ValidPoints,
    ImprovedArgument,
    /// `scored` flips once the first non-blank line has been inspected
    Confidence { scored: bool },
}

impl Section {
    fn from_header(line: &str) -> Option<Section> {
        if line.contains("IDENTIFIED WEAKNESSES") {
            Some(Section::Weaknesses)
        } else if line.contains("VALID COUNTER-POINTS") {
            Some(Section::ValidPoints)
        } else if line.contains("IMPROVED ARGUMENT") {
            Some(Section::ImprovedArgument)
        } else if line.contains("CONFIDENCE LEVEL") {
            Some(Section::Confidence { scored: false })
        } else {
            None
        }
    }
}

fn bullet(line: &str) -> Option<String> {
    line.strip_prefix('-')
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest).to_string())
}

/// Extract improvement data from a self-critique reply
pub fn extract_improvements(critique_response: &str) -> Improvements {
    let mut improvements = Improvements::default();
    let mut section = Section::Outside;

    for line in critique_response.lines() {
        if let Some(next) = Section::from_header(line) {
            section = next;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match section {
            Section::Outside => {}
            Section::Weaknesses => improvements.weaknesses.extend(bullet(trimmed)),
            Section::ValidPoints => improvements.valid_points.extend(bullet(trimmed)),
            Section::ImprovedArgument => {
                improvements.improved_argument.push_str(line);
                improvements.improved_argument.push('\n');
            }
            Section::Confidence { scored: false } => {
                if let Some(score) = trimmed.chars().next().and_then(|c| c.to_digit(10)) {
                    improvements.confidence = score as u8;
                }
                section = Section::Confidence { scored: true };
            }
            Section::Confidence { scored: true } => {}
        }
    }

    improvements
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRITIQUE: &str = "\
=== IDENTIFIED WEAKNESSES ===
- Relies on anecdote
-No data on costs
Some unbulleted musing

=== VALID COUNTER-POINTS ===
- Opponent is right about timing

=== IMPROVED ARGUMENT ===
X is beneficial because of A.

It also enables B.

=== CONFIDENCE LEVEL ===
8/10
3";

    #[test]
    fn test_full_critique() {
        let improvements = extract_improvements(CRITIQUE);
        assert_eq!(
            improvements.weaknesses,
            vec!["Relies on anecdote", "No data on costs"]
        );
        assert_eq!(improvements.valid_points, vec!["Opponent is right about timing"]);
        assert_eq!(
            improvements.improved_argument,
            "X is beneficial because of A.\nIt also enables B.\n"
        );
        assert_eq!(improvements.confidence, 8);
    }

    #[test]
    fn test_unparseable_confidence_falls_back() {
        let improvements = extract_improvements("CONFIDENCE LEVEL\nhigh\n9");
        assert_eq!(improvements.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_confidence_reads_single_digit() {
        assert_eq!(extract_improvements("CONFIDENCE LEVEL\n0 - none").confidence, 0);
        assert_eq!(extract_improvements("CONFIDENCE LEVEL\n10/10").confidence, 1);
    }

    #[test]
    fn test_missing_confidence_line() {
        let improvements = extract_improvements("=== CONFIDENCE LEVEL ===\n\n   \n");
        assert_eq!(improvements.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_no_markers_gives_defaults() {
        let improvements = extract_improvements("I think my argument is fine.\n- a stray bullet");
        assert_eq!(improvements, Improvements::default());
        assert!(improvements.improved_argument.is_empty());
    }

    #[test]
    fn test_prompt_counter_section() {
        let with = prompt("My claim", Some("Their claim"));
        assert!(with.contains("YOUR INITIAL RESPONSE:\n\"My claim\""));
        assert!(with.contains("OPPONENT'S ARGUMENT:\n\"Their claim\""));

        let without = prompt("My claim", None);
        assert!(!without.contains("OPPONENT'S ARGUMENT"));
        assert!(without.contains("=== CONFIDENCE LEVEL ==="));
    }
}
