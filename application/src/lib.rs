//! Application layer for llm-council
//!
//! This crate contains the use cases and the ports through which they talk
//! to the outside world. Adapters for the ports live in the infrastructure
//! layer; progress display lives in the presentation layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::chat_gateway::{ChatGateway, ChatMessage, ChatRequest, GatewayError, Role};
pub use ports::progress::{NoProgress, ProgressNotifier};
pub use use_cases::run_council::{
    CouncilPolicy, RunCouncilError, RunCouncilInput, RunCouncilUseCase,
};
pub use use_cases::transport::{CallOutcome, RetryPolicy, call_with_retry};
