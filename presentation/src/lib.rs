//! Presentation layer for llm-council
//!
//! This crate contains the CLI definition, output formatters,
//! the markdown report renderer, and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::markdown::MarkdownReport;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
