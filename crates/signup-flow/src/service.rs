//! External collaborator contracts for the sign-up flow.
//!
//! The controller only ever talks to the identity provider and the
//! Keepsake backend through these traits; concrete REST clients live in
//! their own crates, and tests drive the controller with scripted
//! fakes.

use crate::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque handle to an in-progress sign-up session with the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRef {
    /// Provider-assigned identifier for the sign-up attempt.
    pub id: String,
}

impl SessionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Credentials submitted to start a sign-up.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// Result of a successful code verification.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    /// Provider-assigned user id for the newly verified account.
    pub user_id: String,
    /// Provider session created by the verification.
    pub session_id: String,
}

/// User record registered with the Keepsake backend after the identity
/// provider confirms the email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRecord {
    /// Identity-provider user id.
    pub provider_user_id: String,
    pub email: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub full_name: String,
}

/// Backend acknowledgement of a user registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub success: bool,
    pub user_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Identity provider operations consumed by the flow controller.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Submit sign-up credentials. On success the provider opens a
    /// sign-up session that the remaining operations reference.
    async fn submit_credentials(&self, request: &SignUpRequest)
        -> Result<SessionRef, ServiceError>;

    /// Ask the provider to email a verification code for the session.
    async fn dispatch_code(&self, session: &SessionRef) -> Result<(), ServiceError>;

    /// Submit the user-entered code for verification.
    async fn verify_code(
        &self,
        session: &SessionRef,
        code: &str,
    ) -> Result<VerifiedSession, ServiceError>;

    /// Fetch a session token for authenticated backend calls. Returns
    /// `Ok(None)` when the provider cannot produce one.
    async fn get_token(&self, session: &SessionRef) -> Result<Option<String>, ServiceError>;
}

/// Keepsake backend operations consumed by the flow controller.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Persist the verified user in the backend.
    async fn register_user(
        &self,
        user: &NewUserRecord,
        token: &str,
    ) -> Result<RegistrationReceipt, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_record_serializes_camel_case() {
        let record = NewUserRecord {
            provider_user_id: "user_123".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            full_name: "Ada Lovelace".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["providerUserId"], "user_123");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
    }

    #[test]
    fn test_new_user_record_omits_absent_last_name() {
        let record = NewUserRecord {
            provider_user_id: "user_123".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: None,
            full_name: "Ada".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("lastName"));
    }

    #[test]
    fn test_registration_receipt_deserializes_without_message() {
        let receipt: RegistrationReceipt =
            serde_json::from_str(r#"{"success":true,"userId":"u-1"}"#).unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.user_id, "u-1");
        assert!(receipt.message.is_none());
    }
}
