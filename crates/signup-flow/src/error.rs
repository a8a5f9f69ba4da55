//! Flow controller error types.

use thiserror::Error;

/// Error type for sign-up flow operations.
///
/// Every external-service failure is caught at the controller boundary
/// and converted into one of these variants; none propagate raw.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The identity service declined the submitted credentials
    /// (duplicate email, weak password, etc.).
    #[error("Sign-up rejected: {0}")]
    CredentialRejected(String),

    /// The identity service could not send the verification code.
    #[error("Failed to send verification code: {0}")]
    DispatchError(String),

    /// The submitted code was invalid or expired.
    #[error("Verification failed: {0}")]
    CodeRejected(String),

    /// No session token could be obtained after verification. The
    /// session is unusable, so the flow cannot continue.
    #[error("Failed to get authentication token")]
    MissingToken,

    /// The backend declined the user registration.
    #[error("Failed to save user: {0}")]
    RegistrationError(String),

    /// The code buffer does not hold a full-length code yet.
    #[error("Code incomplete: {entered} of {required} digits entered")]
    IncompleteCode { entered: usize, required: usize },

    /// A prior request is still in flight.
    #[error("Another request is already in progress")]
    Busy,

    /// The operation is not permitted in the current flow state.
    #[error("Invalid flow transition: {0}")]
    InvalidTransition(String),
}

impl FlowError {
    /// Returns true if the user can recover by correcting input and
    /// retrying. `MissingToken` is the one failure the user cannot
    /// self-correct; the flow must be abandoned.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FlowError::MissingToken)
    }
}

/// Result type alias using FlowError.
pub type FlowResult<T> = Result<T, FlowError>;

/// Failure reported by an external collaborator (identity provider or
/// Keepsake backend). The controller maps these into `FlowError`
/// variants according to the operation that failed.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ServiceError {
    /// Human-readable message, presented to the caller verbatim.
    pub message: String,
    /// Whether the failure is transient (connect error, 5xx) and the
    /// same request may succeed if reissued.
    pub transient: bool,
}

impl ServiceError {
    /// A permanent failure (the service understood and declined).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
        }
    }

    /// A transient failure worth retrying.
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
        }
    }
}
