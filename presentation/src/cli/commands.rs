//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with all stages
    Full,
    /// Only the final synthesis
    Synthesis,
    /// JSON output
    Json,
}

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - multiple LLMs answer, rank each other, and a chairman synthesizes")]
#[command(long_about = r#"
llm-council dispatches your question to a council of LLMs and distills
their answers into one response.

The process has three stages:
1. Collect: every council member answers your question in parallel
2. Rank: each member ranks the anonymized answers of its peers
3. Synthesize: a chairman model folds answers and rankings into a final response

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council "What's the best way to handle errors in Rust?"
  llm-council --output full "Compare async/await patterns"
  llm-council --conversation rust-notes "And how do I test them?"
"#)]
pub struct Cli {
    /// The question to ask the council (not required with --show-config)
    #[arg(required_unless_present = "show_config")]
    pub question: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Wait for the complete result instead of streaming stage events
    #[arg(long)]
    pub no_stream: bool,

    /// Conversation id to record this exchange under
    #[arg(long, value_name = "ID")]
    pub conversation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_show_config_parses_without_question() {
        let cli = Cli::try_parse_from(["llm-council", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.question.is_none());
    }

    #[test]
    fn test_question_required_without_show_config() {
        assert!(Cli::try_parse_from(["llm-council"]).is_err());
        let cli = Cli::try_parse_from(["llm-council", "why rust"]).unwrap();
        assert_eq!(cli.question.as_deref(), Some("why rust"));
    }
}
