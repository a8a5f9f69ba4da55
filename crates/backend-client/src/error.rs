//! Backend API error types.

use thiserror::Error;

/// Error type for Keepsake backend operations.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend returned a non-success status.
    #[error("Backend API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl BackendError {
    /// Returns true if the failure is transient (connect error,
    /// timeout, or 5xx) and the same request may succeed if reissued.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Api { status, .. } => *status >= 500,
            BackendError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
        }
    }
}

/// Result type alias using BackendError.
pub type BackendResult<T> = Result<T, BackendError>;
