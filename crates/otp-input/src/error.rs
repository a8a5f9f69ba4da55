//! Error types for the code input widget.

use thiserror::Error;

/// Error type for code input construction and editing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpInputError {
    /// Requested code length is zero.
    #[error("Code length must be at least 1, got {0}")]
    InvalidLength(usize),
}

/// Result type alias using OtpInputError.
pub type OtpInputResult<T> = Result<T, OtpInputError>;
