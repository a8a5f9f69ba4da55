//! Client for the Keepsake backend's authenticated routes.

use crate::error::{BackendError, BackendResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signup_flow::{NewUserRecord, RegistrationReceipt};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Keepsake backend API client.
#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    api_url: String,
}

/// A memory capsule to persist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCapsule {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Backend acknowledgement of a created capsule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleReceipt {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend error body: `{"message":"..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| summarize_response_body(body))
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Persist a verified user record.
    pub async fn save_user(
        &self,
        user: &NewUserRecord,
        token: &str,
    ) -> BackendResult<RegistrationReceipt> {
        debug!(provider_user_id = %user.provider_user_id, "saving user to backend");
        self.post_json("/users", user, token).await
    }

    /// Persist a new memory capsule.
    pub async fn create_capsule(
        &self,
        capsule: &NewCapsule,
        token: &str,
    ) -> BackendResult<CapsuleReceipt> {
        debug!(title = %capsule.title, "creating capsule");
        self.post_json("/capsules", capsule, token).await
    }

    /// POST a JSON body with bearer auth and deserialize a JSON
    /// response, converting non-success statuses into `BackendError::Api`.
    async fn post_json<B, T>(&self, path: &str, body: &B, token: &str) -> BackendResult<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            tracing::error!(
                status = %status,
                path,
                body_summary = %summarize_response_body(&body),
                "backend API request failed"
            );
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_building() {
        let client = BackendClient::new("https://api.keepsake.app");
        assert_eq!(client.endpoint("/users"), "https://api.keepsake.app/users");
        assert_eq!(
            client.endpoint("/capsules"),
            "https://api.keepsake.app/capsules"
        );
    }

    #[test]
    fn test_extract_error_message_from_backend_body() {
        assert_eq!(
            extract_error_message(r#"{"message":"duplicate user"}"#),
            "duplicate user"
        );
    }

    #[test]
    fn test_extract_error_message_falls_back_to_summary() {
        assert!(extract_error_message("not json").starts_with("len="));
    }

    #[test]
    fn test_new_capsule_serializes_camel_case_and_omits_blanks() {
        let capsule = NewCapsule {
            title: "First snow".to_string(),
            description: "The kids outside".to_string(),
            location: None,
            date: Utc::now(),
            tags: Some("winter".to_string()),
            notes: None,
        };
        let json = serde_json::to_string(&capsule).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"tags\""));
        assert!(!json.contains("\"location\""));
        assert!(!json.contains("\"notes\""));
    }

    #[test]
    fn test_capsule_receipt_deserialization() {
        let receipt: CapsuleReceipt = serde_json::from_str(r#"{"id":"cap-1"}"#).unwrap();
        assert_eq!(receipt.id, "cap-1");
        assert!(receipt.message.is_none());
    }
}
