//! Unified error type for the domain layer.

use thiserror::Error;

/// Error type for domain value construction and parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Parse error (for value objects built from wire strings)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Create a parse error for string-to-type conversion failures
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error for invariant violations
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = DomainError::parse("unknown choice kind: FOO");
        assert_eq!(err.to_string(), "Parse error: unknown choice kind: FOO");
    }
}
