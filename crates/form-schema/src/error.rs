//! Validation error types.

use serde::Serialize;
use thiserror::Error;

/// A validation failure attached to one form field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Field name in the form's own vocabulary (e.g. `confirm_password`).
    pub field: &'static str,
    /// User-facing message, shown next to the field verbatim.
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Result of validating a whole form: `Ok` or every failing field.
pub type ValidationResult = Result<(), Vec<FieldError>>;
