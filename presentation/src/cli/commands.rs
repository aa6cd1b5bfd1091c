//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with all stages
    Full,
    /// Only the chairman's verdict
    Summary,
    /// JSON output (the raw run report)
    Json,
}

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - Multi-model deliberation via OpenRouter")]
#[command(long_about = r#"
llm-council convenes a council of LLMs to deliberate on a question.

The process has three stages:
1. First Opinions: all councilors answer your question in parallel
2. Cross-Review: each councilor critiques the others' answers anonymously
3. Synthesis: a chairman distills everything into a structured verdict

The OPENROUTER_API_KEY environment variable must be set.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council "What is the best migration strategy for our database?"
  llm-council --fast "Quick sanity check on this plan?"
  llm-council --output json "Should we ship?" > verdict.json
"#)]
pub struct Cli {
    /// The question to deliberate on
    pub question: Option<String>,

    /// Skip the cross-review stage for faster results (5 API calls instead of 9)
    #[arg(short, long)]
    pub fast: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Write the run report as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Write a rendered markdown report to this path
    #[arg(long, value_name = "PATH")]
    pub markdown: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and the header
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
}
