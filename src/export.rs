//! Transcript rendering and file export

use crate::error::Result;
use crate::turns::{DebateSession, Turn};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

const RULE_WIDTH: usize = 80;
const TURN_RULE_WIDTH: usize = 40;

/// Render `session` as a plain-text transcript stamped with `generated_at`
pub fn render_transcript(session: &DebateSession, generated_at: NaiveDateTime) -> String {
    render_with_conclusion(session, session.conclusion_text(), generated_at)
}

/// Render `session` with an explicit conclusion in place of the stored one
pub(crate) fn render_with_conclusion(
    session: &DebateSession,
    conclusion: Option<&str>,
    generated_at: NaiveDateTime,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let turn_rule = "-".repeat(TURN_RULE_WIDTH);
    let mut out = String::new();

    // writing to a String cannot fail
    let _ = write!(
        out,
        "\n{rule}\nDEBATE TRANSCRIPT\n{rule}\n\n\
         TOPIC: {topic}\n\n\
         Agent A Position: {a}\nAgent B Position: {b}\n\n{rule}\n\n",
        topic = session.topic(),
        a = session.agent_a_position(),
        b = session.agent_b_position(),
    );

    for (i, turn) in session.transcript().iter().enumerate() {
        let _ = write!(
            out,
            "\n[{}] {} - {}\n{}\n{}\n",
            i + 1,
            turn.speaker,
            turn.kind.heading(),
            turn_rule,
            turn.content
        );
    }

    if let Some(conclusion) = conclusion {
        let _ = write!(out, "\n{rule}\nMODERATOR FINAL CONCLUSION\n{rule}\n{conclusion}\n");
    }

    let _ = write!(
        out,
        "\n{rule}\nGenerated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    out
}

/// Metadata block of the JSON export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Debate topic
    pub topic: String,
    /// Agent A's position
    pub agent_a_position: String,
    /// Agent B's position
    pub agent_b_position: String,
    /// Export time
    pub date: DateTime<Utc>,
    /// Number of executed rounds
    pub total_rounds: u32,
}

/// Snapshot of a session for JSON export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateExport {
    /// Debate metadata
    pub metadata: ExportMetadata,
    /// Every turn in order
    pub messages: Vec<Turn>,
    /// Final conclusion text, null before `conclude`
    pub conclusion: Option<String>,
}

impl DebateExport {
    /// Snapshot `session` at `date`
    pub fn from_session(session: &DebateSession, date: DateTime<Utc>) -> Self {
        Self {
            metadata: ExportMetadata {
                topic: session.topic().to_string(),
                agent_a_position: session.agent_a_position().to_string(),
                agent_b_position: session.agent_b_position().to_string(),
                date,
                total_rounds: session.rounds_executed(),
            },
            messages: session.transcript().turns().to_vec(),
            conclusion: session.conclusion_text().map(str::to_string),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write the text transcript of `session` to `path`
pub fn write_transcript(session: &DebateSession, path: impl AsRef<Path>) -> Result<()> {
    let text = render_transcript(session, Local::now().naive_local());
    std::fs::write(path.as_ref(), text)?;
    tracing::info!(path = %path.as_ref().display(), "transcript written");
    Ok(())
}

/// Write the JSON export of `session` to `path`
pub fn write_json(session: &DebateSession, path: impl AsRef<Path>) -> Result<()> {
    let json = DebateExport::from_session(session, Utc::now()).to_json()?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(path = %path.as_ref().display(), "JSON export written");
    Ok(())
}
