//! Thin client for the identity provider's REST API.
//!
//! Covers the slice of the provider surface the app uses: creating a
//! sign-up, dispatching and attempting email verification codes,
//! password sign-in, and minting session tokens.

use crate::error::{IdentityError, IdentityResult};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

const EMAIL_CODE_STRATEGY: &str = "email_code";

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    http_client: reqwest::Client,
    api_url: String,
    publishable_key: String,
}

/// A sign-up attempt opened with the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpAttempt {
    /// Provider-assigned id for the attempt.
    pub id: String,
    /// Attempt status (e.g. `missing_requirements`, `complete`).
    pub status: String,
}

/// Result of attempting an email verification code.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationOutcome {
    pub status: String,
    #[serde(default)]
    pub created_user_id: Option<String>,
    #[serde(default)]
    pub created_session_id: Option<String>,
}

/// Result of a password sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInOutcome {
    pub status: String,
    #[serde(default)]
    pub created_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateSignUpRequest<'a> {
    email_address: &'a str,
    password: &'a str,
    first_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PrepareVerificationRequest<'a> {
    strategy: &'a str,
}

#[derive(Debug, Serialize)]
struct AttemptVerificationRequest<'a> {
    strategy: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateSignInRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    jwt: Option<String>,
}

/// Provider error body: `{"errors":[{"message":"..."}]}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Extract the first provider error message from a response body, or
/// fall back to a digest summary (bodies are never logged verbatim).
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next())
        .and_then(|entry| entry.message)
        .unwrap_or_else(|| summarize_response_body(body))
}

impl IdentityClient {
    /// Create a new identity client.
    ///
    /// # Arguments
    /// * `api_url` - The provider frontend API URL (e.g. `https://api.identity.example`)
    /// * `publishable_key` - The provider's publishable key (public, safe to expose)
    pub fn new(api_url: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into(),
            publishable_key: publishable_key.into(),
        }
    }

    /// Build the full URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_url, path)
    }

    /// Open a sign-up attempt with email and password credentials.
    pub async fn create_sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: Option<&str>,
    ) -> IdentityResult<SignUpAttempt> {
        debug!(email, "creating sign-up attempt");
        let body = CreateSignUpRequest {
            email_address: email,
            password,
            first_name,
            last_name,
        };
        self.post_json(&self.endpoint("sign_ups"), &body).await
    }

    /// Ask the provider to email a verification code for the attempt.
    pub async fn prepare_email_verification(&self, sign_up_id: &str) -> IdentityResult<()> {
        debug!(sign_up_id, "requesting email verification code");
        let url = self.endpoint(&format!("sign_ups/{}/prepare_verification", sign_up_id));
        let body = PrepareVerificationRequest {
            strategy: EMAIL_CODE_STRATEGY,
        };
        let _: serde_json::Value = self.post_json(&url, &body).await?;
        Ok(())
    }

    /// Submit a verification code for the attempt.
    pub async fn attempt_email_verification(
        &self,
        sign_up_id: &str,
        code: &str,
    ) -> IdentityResult<VerificationOutcome> {
        debug!(sign_up_id, "attempting email verification");
        let url = self.endpoint(&format!("sign_ups/{}/attempt_verification", sign_up_id));
        let body = AttemptVerificationRequest {
            strategy: EMAIL_CODE_STRATEGY,
            code,
        };
        self.post_json(&url, &body).await
    }

    /// Mint a short-lived session token (JWT) for backend calls.
    ///
    /// Returns `Ok(None)` when the provider cannot produce one for the
    /// session.
    pub async fn session_token(&self, session_id: &str) -> IdentityResult<Option<String>> {
        debug!(session_id, "requesting session token");
        let url = self.endpoint(&format!("sessions/{}/tokens", session_id));
        let response: TokenResponse = self.post_json(&url, &serde_json::json!({})).await?;
        Ok(response.jwt)
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<SignInOutcome> {
        debug!(email, "creating sign-in attempt");
        let body = CreateSignInRequest {
            identifier: email,
            password,
        };
        self.post_json(&self.endpoint("sign_ins"), &body).await
    }

    /// POST a JSON body and deserialize a JSON response, converting
    /// non-success statuses into `IdentityError::Api`.
    async fn post_json<B, T>(&self, url: &str, body: &B) -> IdentityResult<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.publishable_key))
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
                body_summary = %summarize_response_body(&body),
                "identity API request failed"
            );
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
