//! Chain of Thought: force step-by-step decomposition

/// Line prefixes that open a new reasoning step
pub const STEP_MARKERS: [&str; 9] = [
    "1.", "2.", "3.", "4.", "5.", "First", "Second", "Third", "Finally",
];

/// Build a prompt that forces explicit step-by-step reasoning
pub fn prompt(task: &str, context: &str) -> String {
    format!(
        r#"You are a critical thinker engaged in structured reasoning.

{context}

TASK: {task}

INSTRUCTIONS - Think step by step:
1. **UNDERSTAND**: Analyze what is being asked
2. **DECOMPOSE**: Break down the problem into smaller components
3. **ANALYZE**: Examine each component carefully
4. **SYNTHESIZE**: Connect the parts to form a coherent argument
5. **CONCLUDE**: State your final position clearly

Show your thinking process explicitly. Use phrases like:
- "First, I notice that..."
- "This suggests that..."
- "Therefore, I conclude that..."

Provide your structured response below:"#
    )
}

/// Split a reply into reasoning steps
///
/// A step starts at every line whose trimmed text begins with one of
/// [`STEP_MARKERS`] and runs until the next such line. Lines before the first
/// marker form a leading step of their own. Steps are trimmed and empty ones
/// dropped.
pub fn extract_reasoning_steps(response: &str) -> Vec<String> {
    let mut segmenter = StepSegmenter::default();
    for line in response.lines() {
        segmenter.feed(line);
    }
    segmenter.finish()
}

fn is_step_marker(line: &str) -> bool {
    let trimmed = line.trim();
    STEP_MARKERS.iter().any(|marker| trimmed.starts_with(marker))
}

/// Accumulates the lines of the step currently being read
#[derive(Default)]
struct StepSegmenter<'a> {
    current: Vec<&'a str>,
    steps: Vec<String>,
}

impl<'a> StepSegmenter<'a> {
    fn feed(&mut self, line: &'a str) {
        if is_step_marker(line) {
            self.close_step();
        }
        self.current.push(line);
    }

    fn close_step(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let step = self.current.join("\n").trim().to_string();
        if !step.is_empty() {
            self.steps.push(step);
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<String> {
        self.close_step();
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_steps() {
        let response = "1. Understand the claim\nit is about X\n2. Decompose\n\n3. Conclude";
        let steps = extract_reasoning_steps(response);
        assert_eq!(
            steps,
            vec![
                "1. Understand the claim\nit is about X",
                "2. Decompose",
                "3. Conclude",
            ]
        );
    }

    #[test]
    fn test_word_markers_and_indentation() {
        let response = "  First, I notice that X.\n  Second, this suggests Y.\nFinally, Z.";
        let steps = extract_reasoning_steps(response);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], "First, I notice that X.");
        assert_eq!(steps[2], "Finally, Z.");
    }

    #[test]
    fn test_no_markers_yields_whole_text() {
        let response = "\n  Just a plain answer\nspanning two lines.  \n";
        assert_eq!(
            extract_reasoning_steps(response),
            vec!["Just a plain answer\nspanning two lines."]
        );
    }

    #[test]
    fn test_preamble_kept_as_leading_step() {
        let response = "Here is my reasoning:\n1. A\n2. B";
        let steps = extract_reasoning_steps(response);
        assert_eq!(steps, vec!["Here is my reasoning:", "1. A", "2. B"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_reasoning_steps("").is_empty());
        assert!(extract_reasoning_steps("   \n\n  ").is_empty());
    }

    #[test]
    fn test_prompt_interpolates_verbatim() {
        let text = prompt("Debate Topic: {braces} & <tags>", "CONTEXT");
        assert!(text.contains("TASK: Debate Topic: {braces} & <tags>"));
        assert!(text.starts_with(
            "You are a critical thinker engaged in structured reasoning.\n\nCONTEXT\n\nTASK:"
        ));
        assert!(text.ends_with("Provide your structured response below:"));
    }
}
