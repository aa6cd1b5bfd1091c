//! Console output formatter for run reports

use colored::Colorize;
use council_domain::RunReport;

/// Formats run reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run report
    pub fn format(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            report.question
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Council:".cyan().bold(),
            report.council.join(", ")
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Chairman:".cyan().bold(),
            report.chairman
        ));

        output.push_str(&Self::section_header("Stage 1: First Opinions"));
        for answer in &report.individual_answers {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("-- {} --", answer.model).yellow().bold(),
                answer.answer
            ));
        }

        if report.stage2_skipped {
            output.push_str(&Self::section_header("Stage 2: Cross-Review (skipped)"));
        } else if !report.peer_reviews.is_empty() {
            output.push_str(&Self::section_header("Stage 2: Cross-Review"));
            for review in &report.peer_reviews {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("-- {} reviewed --", review.reviewer).yellow().bold(),
                    review.review
                ));
            }
        }

        output.push_str(&Self::section_header("Stage 3: Chairman Verdict"));
        output.push_str(&Self::synthesis_body(report));

        if !report.errors.is_empty() {
            output.push_str(&format!("\n{}\n", "Errors:".red().bold()));
            for error in &report.errors {
                output.push_str(&format!("  x {}: {}\n", error.source, error.reason));
            }
        }

        output.push_str(&format!(
            "\n{} {:.1}s\n",
            "Completed in".dimmed(),
            report.run_duration_seconds
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &RunReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_summary(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== LLM Council Verdict ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Q:".bold(), report.question));
        output.push_str(&Self::synthesis_body(report));

        if !report.errors.is_empty() {
            output.push_str(&format!(
                "\n{} {} councilor call(s) failed; see --output full\n",
                "Note:".yellow().bold(),
                report.errors.len()
            ));
        }

        output
    }

    fn synthesis_body(report: &RunReport) -> String {
        let mut output = String::new();
        let synthesis = &report.synthesis;

        let summary = if synthesis.summary.trim().is_empty() {
            "No answer provided."
        } else {
            synthesis.summary.as_str()
        };
        output.push_str(&format!("\n{summary}\n"));

        if !synthesis.key_points.is_empty() {
            output.push_str(&format!("\n{}\n", "Key Points:".cyan().bold()));
            for point in &synthesis.key_points {
                output.push_str(&format!("  * {point}\n"));
            }
        }

        if !synthesis.success_criteria.is_empty() {
            output.push_str(&format!("\n{}\n", "Success Criteria:".green().bold()));
            for criterion in &synthesis.success_criteria {
                output.push_str(&format!(
                    "  * {} -> {} ({})\n",
                    criterion.metric, criterion.target, criterion.rationale
                ));
            }
        }

        if !synthesis.risks.is_empty() {
            output.push_str(&format!("\n{}\n", "Risks:".yellow().bold()));
            for risk in &synthesis.risks {
                output.push_str(&format!(
                    "  * [{}] {} - {}\n",
                    risk.severity, risk.risk, risk.mitigation
                ));
            }
        }

        if !synthesis.disagreements.is_empty() {
            output.push_str(&format!("\n{}\n", "Disagreements:".yellow().bold()));
            for disagreement in &synthesis.disagreements {
                output.push_str(&format!(
                    "  * {}: {} Verdict: {}\n",
                    disagreement.topic, disagreement.summary, disagreement.chairman_verdict
                ));
            }
        }

        output.push_str(&format!(
            "\n{} {} {}\n",
            "Confidence:".cyan().bold(),
            synthesis.confidence,
            if synthesis.confidence_note.is_empty() {
                String::new()
            } else {
                format!("({})", synthesis.confidence_note)
            }
        ));

        output
    }

    fn header(title: &str) -> String {
        format!(
            "\n{}\n{}\n{}\n",
            "=".repeat(60).cyan(),
            format!("  {title}").cyan().bold(),
            "=".repeat(60).cyan()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40).dimmed())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}
