//! Error types exported by the library

use thiserror::Error;

/// Error raised while parsing a byte-signature string.
///
/// These are the only recoverable errors in the crate; memory operations
/// report outcomes through counts, bools and `Option`s instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    #[error("Unexpected character '{value}' at index {index}.")]
    UnexpectedCharacter { index: usize, value: char },

    #[error("Stream of characters ended unexpectedly.")]
    EndOfStream,
}

impl PatternError {
    /// Creates an unexpected-character error at a scalar index
    pub fn unexpected(index: usize, value: char) -> Self {
        PatternError::UnexpectedCharacter { index, value }
    }
}

/// Error raised while constructing an OS-backed memory view.
///
/// The caller chose the target process; a missing privilege cannot be
/// remediated here, so construction errors are surfaced, not recovered.
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl SystemError {
    /// Creates an access-denied error
    pub fn access_denied(reason: impl Into<String>) -> Self {
        SystemError::AccessDenied(reason.into())
    }

    /// Creates a generic operation failure
    pub fn operation_failed(reason: impl Into<String>) -> Self {
        SystemError::OperationFailed(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_display() {
        let err = PatternError::unexpected(3, 'Z');
        assert_eq!(err.to_string(), "Unexpected character 'Z' at index 3.");

        assert_eq!(
            PatternError::EndOfStream.to_string(),
            "Stream of characters ended unexpectedly."
        );
    }

    #[test]
    fn test_pattern_error_equality() {
        assert_eq!(
            PatternError::unexpected(7, '!'),
            PatternError::UnexpectedCharacter {
                index: 7,
                value: '!'
            }
        );
        assert_ne!(PatternError::unexpected(7, '!'), PatternError::EndOfStream);
    }

    #[test]
    fn test_system_error_display() {
        let err = SystemError::access_denied("task_for_pid requires entitlement");
        assert_eq!(
            err.to_string(),
            "Access denied: task_for_pid requires entitlement"
        );

        let err = SystemError::operation_failed("no such process");
        assert_eq!(err.to_string(), "Operation failed: no such process");
    }

    #[test]
    fn test_error_debug_format() {
        let err = PatternError::unexpected(0, 'q');
        let debug = format!("{:?}", err);
        assert!(debug.contains("UnexpectedCharacter"));
        assert!(debug.contains("'q'"));
    }
}
