//! Email/password identity client against the Identity Toolkit REST API.
//!
//! Holds the signed-in session and hands its id token to the accessor via
//! [`TokenSource`], so store calls pick up sign-in and sign-out between
//! requests without any wiring.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as Json};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::token::TokenSource;

const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

/// Errors from identity operations, mapped from the provider's upstream
/// error codes into caller-meaningful categories.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no account registered for this email")]
    UserNotFound,

    #[error("email is already registered")]
    EmailInUse,

    #[error("malformed email address")]
    InvalidEmail,

    #[error("password too weak (minimum 6 characters)")]
    WeakPassword,

    #[error("account temporarily locked after repeated failed attempts")]
    TooManyAttempts,

    #[error("session too old for this operation, sign in again")]
    RequiresRecentLogin,

    #[error("not signed in")]
    NotSignedIn,

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream code with no local mapping.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// A signed-in identity as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Provider-assigned user id.
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Bearer token for store requests.
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds, as a decimal string.
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Client for the email/password identity provider.
pub struct IdentityClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    session: RwLock<Option<Session>>,
}

impl IdentityClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AuthError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (tests, emulators).
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            session: RwLock::new(None),
        })
    }

    /// Sign in with email and password, replacing any previous session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        debug!(email, "signing in");
        let session: Session = self
            .post(
                "accounts:signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Register a new account and sign it in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        debug!(email, "registering account");
        let session: Session = self
            .post(
                "accounts:signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Send a password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        debug!(email, "requesting password reset");
        let _: Json = self
            .post(
                "accounts:sendOobCode",
                json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        Ok(())
    }

    /// Change the signed-in account's password; refreshes the held session
    /// with the tokens the provider returns.
    pub async fn change_password(&self, new_password: &str) -> Result<(), AuthError> {
        let id_token = {
            let session = self.session.read().await;
            session
                .as_ref()
                .map(|s| s.id_token.clone())
                .ok_or(AuthError::NotSignedIn)?
        };

        let refreshed: Session = self
            .post(
                "accounts:update",
                json!({ "idToken": id_token, "password": new_password, "returnSecureToken": true }),
            )
            .await?;
        *self.session.write().await = Some(refreshed);
        Ok(())
    }

    /// Drop the current session; subsequent store calls fail
    /// `Unauthenticated` until somebody signs in again.
    pub async fn sign_out(&self) {
        *self.session.write().await = None;
    }

    /// Snapshot of the current session, if signed in.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn post<T: DeserializeOwned>(&self, action: &str, body: Json) -> Result<T, AuthError> {
        let url = format!("{}/v1/{}?key={}", self.endpoint, action, self.api_key);
        let response = self.http.post(&url).json(&body).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<Json>(&text)
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(str::to_owned))
                .unwrap_or(text);
            Err(map_provider_code(&code))
        }
    }
}

#[async_trait]
impl TokenSource for IdentityClient {
    async fn bearer_token(&self) -> crate::error::Result<Option<String>> {
        Ok(self
            .session
            .read()
            .await
            .as_ref()
            .map(|session| session.id_token.clone()))
    }
}

/// Translate an upstream error code into the local taxonomy.
///
/// Some codes arrive with a trailing explanation
/// (`WEAK_PASSWORD : Password should be at least 6 characters`); only the
/// leading token identifies the error.
fn map_provider_code(code: &str) -> AuthError {
    let canonical = code.split([':', ' ']).next().unwrap_or(code);
    match canonical {
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" => AuthError::InvalidCredentials,
        "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "INVALID_EMAIL" => AuthError::InvalidEmail,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
        "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => AuthError::RequiresRecentLogin,
        other => AuthError::Provider(other.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_map_to_local_categories() {
        assert!(matches!(
            map_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(map_provider_code("EMAIL_EXISTS"), AuthError::EmailInUse));
        assert!(matches!(
            map_provider_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword
        ));
        assert!(matches!(
            map_provider_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            AuthError::TooManyAttempts
        ));
        assert!(matches!(
            map_provider_code("SOMETHING_NEW"),
            AuthError::Provider(code) if code == "SOMETHING_NEW"
        ));
    }

    #[tokio::test]
    async fn change_password_requires_a_session() {
        let client = IdentityClient::with_endpoint("key", "http://localhost:1").unwrap();
        let result = client.change_password("hunter22").await;
        assert!(matches!(result, Err(AuthError::NotSignedIn)));
    }

    #[tokio::test]
    async fn signed_out_client_yields_no_bearer() {
        let client = IdentityClient::with_endpoint("key", "http://localhost:1").unwrap();
        assert_eq!(client.bearer_token().await.unwrap(), None);
    }
}
