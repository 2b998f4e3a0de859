//! Proofbot Error Types
//!
//! Centralized error handling for the correction pipeline and its collaborators.

use thiserror::Error;

/// Central error type for Proofbot
#[derive(Error, Debug)]
pub enum ProofError {
    #[error("Correction edit at {offset}+{length} is outside text of {text_len} chars")]
    InvalidEdit {
        offset: usize,
        length: usize,
        text_len: usize,
    },
}

/// Result type alias for Proofbot operations
pub type ProofResult<T> = Result<T, ProofError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_edit_display() {
        let err = ProofError::InvalidEdit {
            offset: 10,
            length: 3,
            text_len: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("10+3"));
        assert!(msg.contains("5 chars"));
    }
}
