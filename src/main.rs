//! Command-line debate runner

use anyhow::{bail, Result};
use clap::Parser;
use debate_arena::tracing_ext::{init_tracing, LogFormat};
use debate_arena::{
    write_json, write_transcript, AgentResponse, DebateConfig, DebateOrchestrator, DebateSettings,
    Extraction, GroqClient, LlmClient, Speaker, TokenUsage, Turn,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run a moderated debate between two LLM agents
#[derive(Debug, Parser)]
#[command(name = "debate-arena", version, about)]
struct Cli {
    /// YAML file describing the debate
    #[arg(short, long, conflicts_with_all = ["topic", "position_a", "position_b"])]
    config: Option<PathBuf>,

    /// Debate topic
    #[arg(short, long, requires_all = ["position_a", "position_b"])]
    topic: Option<String>,

    /// Position defended by Agent A
    #[arg(short = 'a', long)]
    position_a: Option<String>,

    /// Position defended by Agent B
    #[arg(short = 'b', long)]
    position_b: Option<String>,

    /// Number of rebuttal rounds (defaults to DEBATE_ROUNDS or 3)
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Model identifier (defaults to GROQ_MODEL_NAME)
    #[arg(short, long)]
    model: Option<String>,

    /// Ask both debaters to reflect on their positions before the conclusion
    #[arg(long)]
    reflect: bool,

    /// Print the parsed reasoning structure and token usage after each turn
    #[arg(long)]
    show_reasoning: bool,

    /// Write the text transcript to this path
    #[arg(long)]
    transcript_out: Option<PathBuf>,

    /// Write the JSON export to this path
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, env = "DEBATE_LOG_JSON")]
    log_json: bool,
}

impl Cli {
    fn debate_config(&self) -> Result<DebateConfig> {
        let mut config = match (&self.config, &self.topic, &self.position_a, &self.position_b) {
            (Some(path), _, _, _) => DebateConfig::from_file(path)?,
            (None, Some(topic), Some(a), Some(b)) => {
                let config = DebateConfig::new(topic, a, b);
                config.validate()?;
                config
            }
            _ => bail!("either --config or --topic with --position-a and --position-b is required"),
        };

        if self.rounds.is_some() {
            config.rounds = self.rounds;
        }
        if self.model.is_some() {
            config.model = self.model.clone();
        }
        config.reflection |= self.reflect;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format)?;

    let config = cli.debate_config()?;
    let settings = config.apply(&DebateSettings::from_env()?);
    let client: Arc<dyn LlmClient> = Arc::new(GroqClient::from_env()?);
    info!(endpoint = client.endpoint(), model = %settings.model.model, "client ready");

    let mut debate = DebateOrchestrator::from_config(&config, &settings, client)?;

    print_rule('=');
    println!("DEBATE: {}", config.topic);
    println!("Agent A: {}", config.agent_a_position);
    println!("Agent B: {}", config.agent_b_position);
    print_rule('=');

    let show = cli.show_reasoning;

    let opening = debate.start().await?;
    print_turn(&opening.agent_a, show);
    print_turn(&opening.agent_b, show);

    for round in 1..=settings.rounds {
        let result = debate.execute_round(round).await;
        print_turn(&result.agent_a, show);
        print_turn(&result.agent_b, show);
        print_response(&format!("MODERATOR ANALYSIS - ROUND {}", round), &result.analysis, show);
    }

    if config.reflection {
        for speaker in [Speaker::AgentA, Speaker::AgentB] {
            let reflection = debate.reflect(speaker).await?;
            let heading = format!("{} REFLECTION", speaker.name().to_uppercase());
            print_response(&heading, &reflection, show);
        }
    }

    let record = debate.conclude().await;
    for turn in record.turns() {
        print_turn(turn, show);
    }

    let summary = debate.summary();
    print_rule('=');
    println!(
        "Rounds: {} | Rebuttals: {} | Turns: {} | Concluded: {}",
        summary.rounds_executed,
        summary.rebuttal_count,
        summary.total_turns,
        summary.conclusion_available
    );
    println!("Total {}", format_usage(&summary.total_usage));

    if let Some(path) = &cli.transcript_out {
        write_transcript(debate.session(), path)?;
        println!("Transcript saved to {}", path.display());
    }
    if let Some(path) = &cli.json_out {
        write_json(debate.session(), path)?;
        println!("JSON export saved to {}", path.display());
    }

    Ok(())
}

fn print_rule(c: char) {
    println!("{}", c.to_string().repeat(80));
}

fn print_turn(turn: &Turn, show_reasoning: bool) {
    println!();
    println!("[{}] {} ({})", turn.speaker, turn.kind.heading(), turn.technique);
    print_rule('-');
    println!("{}", turn.content);
    if show_reasoning {
        print_reasoning(turn.extraction.as_ref(), &turn.usage);
    }
}

fn print_response(heading: &str, response: &AgentResponse, show_reasoning: bool) {
    println!();
    println!("[{}] {} ({})", response.speaker, heading, response.technique);
    print_rule('-');
    println!("{}", response.content());
    if show_reasoning {
        print_reasoning(response.extraction.as_ref(), &response.completion.usage());
    }
}

fn print_reasoning(extraction: Option<&Extraction>, usage: &TokenUsage) {
    if let Some(extraction) = extraction {
        println!();
        println!("Reasoning:");
        print!("{}", extraction.render());
    }
    println!("{}", format_usage(usage));
}

fn format_usage(usage: &TokenUsage) -> String {
    format!(
        "Tokens: {} prompt + {} completion = {}",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}
