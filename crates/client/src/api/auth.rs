//! `/api/auth` bindings.

use reqwest::Method;
use serde::Deserialize;
use terracota_core::{Credentials, Session, User};

use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    user: User,
    token: String,
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    user: User,
}

/// Sign in. Credentials should already be sanitized (trimmed, lowercased
/// email); the API sanitizes again regardless.
pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<Session, ApiError> {
    let envelope: LoginEnvelope = api
        .send_json(Method::POST, "/api/auth/login", credentials, None)
        .await?;
    Ok(Session {
        user: envelope.user,
        token: envelope.token,
    })
}

/// Check that a token still verifies; returns the user as the backend
/// currently sees it.
pub async fn verify(api: &ApiClient, token: &str) -> Result<User, ApiError> {
    let envelope: VerifyEnvelope = api.get("/api/auth/verify", Some(token)).await?;
    Ok(envelope.user)
}
