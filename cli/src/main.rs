//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{RunCouncilError, RunCouncilInput, RunCouncilUseCase};
use council_domain::Question;
use council_infrastructure::{ConfigLoader, OpenRouterConfig, OpenRouterGateway};
use council_presentation::{Cli, ConsoleFormatter, MarkdownReport, OutputFormat, ProgressReporter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!("{e}"))?
    };

    let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        bail!("OPENROUTER_API_KEY not set in environment");
    }

    let question = match cli.question {
        Some(q) => Question::try_new(q).context("question cannot be empty")?,
        None => bail!("A question is required. See --help for usage."),
    };

    let roster = config.resolve_roster();

    info!("Convening the council for: {}", question);

    // Print header
    if !cli.quiet {
        eprintln!();
        eprintln!("+============================================================+");
        eprintln!("|                 LLM Council - Deliberation                 |");
        eprintln!("+============================================================+");
        eprintln!();
        eprintln!("Question: {question}");
        eprintln!("Council:  {}", roster.labels().join(", "));
        eprintln!("Chairman: {}", roster.chairman.label);
        if cli.fast {
            eprintln!("Mode:     fast (cross-review skipped)");
        }
        eprintln!();
    }

    // === Dependency Injection ===
    let gateway_config = OpenRouterConfig::new(api_key)
        .with_base_url(config.provider.base_url.clone())
        .with_referer(config.provider.referer.clone())
        .with_title(config.provider.title.clone())
        .with_timeout(config.request_timeout());
    let gateway =
        Arc::new(OpenRouterGateway::new(gateway_config).map_err(|e| anyhow::anyhow!("{e}"))?);

    let mut input = RunCouncilInput::new(question, roster).with_policy(config.policy());
    if cli.fast || !config.behavior.enable_review {
        input = input.without_review();
    }

    let use_case = RunCouncilUseCase::new(gateway);

    let result = if cli.quiet {
        use_case.execute(input).await
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let RunCouncilError::QuorumNotReached { failures, .. } = &e {
                for failure in failures {
                    eprintln!("  x {}: {}", failure.source, failure.reason);
                }
            }
            return Err(e.into());
        }
    };

    if let Some(path) = &cli.save {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("Report saved to {}", path.display());
    }

    if let Some(path) = &cli.markdown {
        let value = serde_json::to_value(&report)?;
        std::fs::write(path, MarkdownReport::render(&value))
            .with_context(|| format!("failed to write markdown to {}", path.display()))?;
        info!("Markdown report written to {}", path.display());
    }

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&report),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };

    println!("{output}");

    Ok(())
}
