//! Prompt templates for the deliberation flow

mod template;

pub use template::PromptTemplate;
