//! Tree of Thoughts: generate several approaches and pick the strongest

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Build a prompt asking for `num_paths` scored approaches plus an evaluation
pub fn prompt(task: &str, num_paths: u32) -> String {
    format!(
        r#"You are generating multiple approaches to a complex problem.

TASK: {task}

Generate {num_paths} DIFFERENT APPROACHES to this task:

For each approach:
1. State the approach clearly
2. Outline key steps
3. Evaluate strength (1-10)
4. Identify potential weaknesses

Format:
=== APPROACH 1 ===
Concept: [brief description]
Steps: [step by step]
Strength: [score 1-10]
Weaknesses: [list weaknesses]

=== APPROACH 2 ===
[repeat structure]

=== APPROACH 3 ===
[repeat structure]

Then:
=== EVALUATION ===
Best approach: [which is strongest]
Reasoning: [why it's superior]
Final position: [synthesized argument]"#
    )
}

/// One candidate approach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThoughtPath {
    /// Number from the `=== APPROACH n ===` header
    pub index: u32,
    /// Brief description
    pub concept: String,
    /// Outline of the steps
    pub steps: String,
    /// Self-assessed strength, 0 when missing
    pub strength: u32,
    /// Listed weaknesses
    pub weaknesses: Vec<String>,
}

impl ThoughtPath {
    /// Strength minus half a point per weakness
    pub fn score(&self) -> f64 {
        f64::from(self.strength) - self.weaknesses.len() as f64 * 0.5
    }
}

/// The model's own verdict from the `=== EVALUATION ===` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathVerdict {
    /// Which approach the model picked
    pub best_approach: String,
    /// Why it is superior
    pub reasoning: String,
    /// Synthesized argument
    pub final_position: String,
}

/// All approaches in reply order plus the optional verdict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThoughtTree {
    /// Approaches in reply order
    pub paths: Vec<ThoughtPath>,
    /// Evaluation block, when present
    pub verdict: Option<PathVerdict>,
}

/// Result of ranking approaches by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRanking {
    /// Highest-scoring approach
    pub best_path: ThoughtPath,
    /// Every approach with its score, best first
    pub ranked: Vec<(ThoughtPath, f64)>,
}

/// Rank approaches by [`ThoughtPath::score`], best first
///
/// Ties keep reply order. Returns `None` for an empty slice.
pub fn evaluate_paths(paths: &[ThoughtPath]) -> Option<PathRanking> {
    let mut ranked: Vec<(ThoughtPath, f64)> = paths
        .iter()
        .map(|path| (path.clone(), path.score()))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let best_path = ranked.first()?.0.clone();
    Some(PathRanking { best_path, ranked })
}

fn approach_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^=+\s*APPROACH\s+(\d+)\s*=+$").expect("valid regex"))
}

fn evaluation_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^=+\s*EVALUATION\s*=+$").expect("valid regex"))
}

fn first_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Field that continuation lines extend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Concept,
    Steps,
    Strength,
    Weaknesses,
    BestApproach,
    Reasoning,
    FinalPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Preamble,
    Approach,
    Evaluation,
}

struct TreeParser {
    block: Block,
    field: Option<Field>,
    tree: ThoughtTree,
}

impl TreeParser {
    fn new() -> Self {
        Self {
            block: Block::Preamble,
            field: None,
            tree: ThoughtTree::default(),
        }
    }

    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(caps) = approach_header().captures(trimmed) {
            let index = caps[1].parse().unwrap_or(0);
            self.tree.paths.push(ThoughtPath {
                index,
                ..ThoughtPath::default()
            });
            self.block = Block::Approach;
            self.field = None;
            return;
        }
        if evaluation_header().is_match(trimmed) {
            self.tree.verdict = Some(PathVerdict::default());
            self.block = Block::Evaluation;
            self.field = None;
            return;
        }
        if trimmed.is_empty() {
            return;
        }

        match self.block {
            Block::Preamble => {}
            Block::Approach => self.feed_approach(trimmed),
            Block::Evaluation => self.feed_evaluation(trimmed),
        }
    }

    fn feed_approach(&mut self, line: &str) {
        let Some(path) = self.tree.paths.last_mut() else {
            return;
        };

        let labelled = [
            ("Concept:", Field::Concept),
            ("Steps:", Field::Steps),
            ("Strength:", Field::Strength),
            ("Weaknesses:", Field::Weaknesses),
        ]
        .into_iter()
        .find_map(|(label, field)| line.strip_prefix(label).map(|v| (field, v.trim())));

        if let Some((field, value)) = labelled {
            self.field = Some(field);
            match field {
                Field::Concept => path.concept = value.to_string(),
                Field::Steps => path.steps = value.to_string(),
                Field::Strength => {
                    path.strength = first_number()
                        .find(value)
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(0);
                }
                Field::Weaknesses => {
                    if !value.is_empty() {
                        path.weaknesses.push(value.to_string());
                    }
                }
                _ => {}
            }
            return;
        }

        match self.field {
            Some(Field::Concept) => append_line(&mut path.concept, line),
            Some(Field::Steps) => append_line(&mut path.steps, line),
            Some(Field::Weaknesses) => {
                if let Some(rest) = line.strip_prefix('-') {
                    path.weaknesses.push(rest.trim().to_string());
                }
            }
            _ => {}
        }
    }

    fn feed_evaluation(&mut self, line: &str) {
        let Some(verdict) = self.tree.verdict.as_mut() else {
            return;
        };

        let labelled = [
            ("Best approach:", Field::BestApproach),
            ("Reasoning:", Field::Reasoning),
            ("Final position:", Field::FinalPosition),
        ]
        .into_iter()
        .find_map(|(label, field)| line.strip_prefix(label).map(|v| (field, v.trim())));

        if let Some((field, value)) = labelled {
            self.field = Some(field);
            let slot = match field {
                Field::BestApproach => &mut verdict.best_approach,
                Field::Reasoning => &mut verdict.reasoning,
                _ => &mut verdict.final_position,
            };
            *slot = value.to_string();
            return;
        }

        match self.field {
            Some(Field::BestApproach) => append_line(&mut verdict.best_approach, line),
            Some(Field::Reasoning) => append_line(&mut verdict.reasoning, line),
            Some(Field::FinalPosition) => append_line(&mut verdict.final_position, line),
            _ => {}
        }
    }
}

fn append_line(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}

/// Parse approaches and the evaluation block out of a reply
pub fn parse_thought_tree(response: &str) -> ThoughtTree {
    let mut parser = TreeParser::new();
    for line in response.lines() {
        parser.feed(line);
    }
    parser.tree
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "\
Let me explore this.

=== APPROACH 1 ===
Concept: Economic argument
Steps: Show costs
then show benefits
Strength: 7/10
Weaknesses: ignores equity

=== APPROACH 2 ===
Concept: Moral argument
Strength: 8
Weaknesses:
- hard to measure
- contested premises
- culturally specific

=== EVALUATION ===
Best approach: Approach 1
Reasoning: It is grounded
in data.
Final position: X is net positive.";

    #[test]
    fn test_parse_approaches_and_verdict() {
        let tree = parse_thought_tree(REPLY);
        assert_eq!(tree.paths.len(), 2);

        let first = &tree.paths[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.concept, "Economic argument");
        assert_eq!(first.steps, "Show costs\nthen show benefits");
        assert_eq!(first.strength, 7);
        assert_eq!(first.weaknesses, vec!["ignores equity"]);

        let second = &tree.paths[1];
        assert_eq!(second.strength, 8);
        assert_eq!(second.weaknesses.len(), 3);

        let verdict = tree.verdict.unwrap();
        assert_eq!(verdict.best_approach, "Approach 1");
        assert_eq!(verdict.reasoning, "It is grounded\nin data.");
        assert_eq!(verdict.final_position, "X is net positive.");
    }

    #[test]
    fn test_evaluate_paths_penalizes_weaknesses() {
        let tree = parse_thought_tree(REPLY);
        let ranking = evaluate_paths(&tree.paths).unwrap();

        // both score 6.5, so reply order decides
        assert_eq!(ranking.ranked[0].1, 6.5);
        assert_eq!(ranking.ranked[1].1, 6.5);
        assert_eq!(ranking.best_path.index, 1);
    }

    #[test]
    fn test_evaluate_paths_orders_by_score() {
        let weak = ThoughtPath {
            index: 1,
            strength: 4,
            ..ThoughtPath::default()
        };
        let strong = ThoughtPath {
            index: 2,
            strength: 9,
            weaknesses: vec!["minor".to_string()],
            ..ThoughtPath::default()
        };
        let ranking = evaluate_paths(&[weak, strong]).unwrap();
        assert_eq!(ranking.best_path.index, 2);
        assert_eq!(ranking.ranked[1].0.index, 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(evaluate_paths(&[]).is_none());
        assert_eq!(parse_thought_tree("no structure at all"), ThoughtTree::default());
    }

    #[test]
    fn test_prompt_uses_path_count() {
        assert!(prompt("Pick a side", 5).contains("Generate 5 DIFFERENT APPROACHES"));
    }
}
