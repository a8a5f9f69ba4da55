//! Identity provider error types.

use thiserror::Error;

/// Error type for identity provider operations.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The provider returned a non-success status.
    #[error("Identity API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider accepted the request but the response is missing a
    /// field the flow depends on (e.g. no created session).
    #[error("Incomplete provider response: {0}")]
    Incomplete(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IdentityError {
    /// Returns true if the failure is transient (connect error,
    /// timeout, or 5xx) and the same request may succeed if reissued.
    pub fn is_transient(&self) -> bool {
        match self {
            IdentityError::Api { status, .. } => *status >= 500,
            IdentityError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            IdentityError::Incomplete(_) => false,
        }
    }
}

/// Result type alias using IdentityError.
pub type IdentityResult<T> = Result<T, IdentityError>;
