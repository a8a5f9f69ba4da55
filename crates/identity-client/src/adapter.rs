//! Adapter wiring `IdentityClient` into the flow controller's
//! `IdentityService` seam.
//!
//! Provider errors carry their transience through to `ServiceError` so
//! the flow can distinguish "retry might help" from hard rejections.

use crate::client::IdentityClient;
use crate::error::IdentityError;
use async_trait::async_trait;
use signup_flow::{IdentityService, ServiceError, SessionRef, SignUpRequest, VerifiedSession};

fn into_service_error(error: IdentityError) -> ServiceError {
    if error.is_transient() {
        ServiceError::transient(error.to_string())
    } else {
        ServiceError::new(error.to_string())
    }
}

#[async_trait]
impl IdentityService for IdentityClient {
    async fn submit_credentials(
        &self,
        request: &SignUpRequest,
    ) -> Result<SessionRef, ServiceError> {
        let attempt = self
            .create_sign_up(
                &request.email,
                &request.password,
                &request.first_name,
                request.last_name.as_deref(),
            )
            .await
            .map_err(into_service_error)?;
        Ok(SessionRef::new(attempt.id))
    }

    async fn dispatch_code(&self, session: &SessionRef) -> Result<(), ServiceError> {
        self.prepare_email_verification(&session.id)
            .await
            .map_err(into_service_error)
    }

    async fn verify_code(
        &self,
        session: &SessionRef,
        code: &str,
    ) -> Result<VerifiedSession, ServiceError> {
        let outcome = self
            .attempt_email_verification(&session.id, code)
            .await
            .map_err(into_service_error)?;

        match (outcome.created_user_id, outcome.created_session_id) {
            (Some(user_id), Some(session_id)) => Ok(VerifiedSession {
                user_id,
                session_id,
            }),
            _ => Err(into_service_error(IdentityError::Incomplete(format!(
                "verification status '{}' produced no session",
                outcome.status
            )))),
        }
    }

    async fn get_token(&self, session: &SessionRef) -> Result<Option<String>, ServiceError> {
        self.session_token(&session.id)
            .await
            .map_err(into_service_error)
    }
}
