//! Adapter wiring `BackendClient` into the flow controller's
//! `RegistrationService` seam.

use crate::client::BackendClient;
use crate::error::BackendError;
use async_trait::async_trait;
use signup_flow::{NewUserRecord, RegistrationReceipt, RegistrationService, ServiceError};

fn into_service_error(error: BackendError) -> ServiceError {
    if error.is_transient() {
        ServiceError::transient(error.to_string())
    } else {
        ServiceError::new(error.to_string())
    }
}

#[async_trait]
impl RegistrationService for BackendClient {
    async fn register_user(
        &self,
        user: &NewUserRecord,
        token: &str,
    ) -> Result<RegistrationReceipt, ServiceError> {
        self.save_user(user, token).await.map_err(into_service_error)
    }
}
