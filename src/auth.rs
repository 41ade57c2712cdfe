use crate::error::ApiError;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::AppState;

/// Authenticated caller, as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Bearer-token verification seam. The provider itself (OTP issuance,
/// session management) is an external collaborator; this service only
/// checks tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError>;
}

/// Verifies tokens against the identity provider's verification endpoint.
pub struct RemoteTokenVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl RemoteTokenVerifier {
    pub fn new(verify_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
        }
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[async_trait]
impl TokenVerifier for RemoteTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token verification upstream error: {}", e);
                ApiError::upstream(
                    "Authentication error",
                    "Unable to verify access token",
                    "AUTH_ERROR",
                )
            })?;

        if !response.status().is_success() {
            return Err(ApiError::forbidden(
                "Invalid or expired token",
                "INVALID_TOKEN",
            ));
        }

        response.json::<AuthUser>().await.map_err(|e| {
            tracing::error!("Token verification returned malformed body: {}", e);
            ApiError::upstream(
                "Authentication error",
                "Unable to verify access token",
                "AUTH_ERROR",
            )
        })
    }
}

/// Demo-mode verifier: a fixed table of accepted tokens. Used when no
/// identity provider is configured, and by the integration tests.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, AuthUser>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, uid: impl Into<String>) -> Self {
        self.tokens.insert(
            token.into(),
            AuthUser {
                uid: uid.into(),
                phone: None,
                email: None,
            },
        );
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::forbidden("Invalid or expired token", "INVALID_TOKEN"))
    }
}

/// Axum middleware: require a `Authorization: Bearer <token>` header and
/// attach the verified caller as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Access token required", "NO_TOKEN"))?;

    let user = state.verifier.verify(token).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_verifier_accepts_known_token_only() {
        let verifier = StaticTokenVerifier::new().with_token("demo-token", "demo-user");

        let user = verifier.verify("demo-token").await.unwrap();
        assert_eq!(user.uid, "demo-user");

        let err = verifier.verify("wrong").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_TOKEN");
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
