//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No councilors configured")]
    EmptyRoster,

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::EmptyRoster.to_string(), "No councilors configured");
        assert_eq!(
            DomainError::InvalidQuestion("blank".to_string()).to_string(),
            "Invalid question: blank"
        );
    }
}
