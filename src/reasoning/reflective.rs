//! Reflective thinking: the agent audits its own reasoning

/// Build a reflection prompt about `agent_position` within `debate_context`
pub fn prompt(debate_context: &str, agent_position: &str) -> String {
    format!(
        r#"REFLECTIVE ANALYSIS: Evaluate the quality of your reasoning

DEBATE CONTEXT: {debate_context}

YOUR POSITION: {agent_position}

REFLECTION QUESTIONS:
1. How CERTAIN am I in this position? (1-10)
2. What would CHANGE my mind?
3. What ASSUMPTIONS am I relying on?
4. How EMOTIONALLY INVESTED am I in this position?
5. What ALTERNATIVE viewpoints have merit?
6. Am I OVERCONFIDENT?
7. What EVIDENCE would I need to see to reconsider?

HONEST SELF-ASSESSMENT:
[Provide genuine reflection, not just defense of position]

AREAS FOR IMPROVEMENT:
[Identify where reasoning could be stronger]

CONCESSIONS:
[What valid points does the opponent have?]

META-ANALYSIS:
[How good is my overall reasoning?]"#
    )
}

/// Prompt used by the moderator to grade a whole transcript
pub fn quality_evaluation_prompt(transcript: &str, topic: &str) -> String {
    format!(
        r#"DEBATE QUALITY EVALUATION

TOPIC: {topic}

DEBATE TRANSCRIPT:
{transcript}

EVALUATION CRITERIA:
1. Argument Quality: How well-structured and logical?
2. Evidence Use: How effectively is evidence used?
3. Logical Fallacies: How many fallacies were present?
4. Engagement: Did agents address opponent's points?
5. Neutrality: Was the moderator fair?
6. Overall Value: Did the debate illuminate the topic?

Provide scores (1-10) and constructive feedback for improvement."#
    )
}
