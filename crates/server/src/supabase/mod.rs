//! Supabase REST clients: GoTrue auth, PostgREST tables, and Storage.
//!
//! # Architecture
//!
//! - Supabase is source of truth - NO local database, direct API calls
//! - Table reads/writes go through PostgREST with the service-role key
//! - Password sign-in goes through GoTrue with the publishable (anon) key
//! - Image files live in the Storage `images` bucket with public read URLs
//!
//! Both keys travel only in request headers; they never appear in URLs,
//! logs, or error messages.

mod auth;
mod rest;
mod storage;

pub use auth::{AuthUser, SignIn, UserMetadata};
pub use storage::IMAGE_BUCKET;

use std::sync::Arc;

use axum::http::StatusCode;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::SupabaseConfig;

/// Errors that can occur when talking to Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase answered with a non-success status.
    #[error("Supabase returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SupabaseError {
    /// Whether Supabase rejected the request itself (4xx), as opposed to a
    /// transport failure or a backend-side fault.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if status.is_client_error())
    }
}

/// Client for the Supabase project behind the API.
///
/// Cheaply cloneable; all request state lives behind an `Arc`.
#[derive(Clone)]
pub struct Supabase {
    inner: Arc<SupabaseInner>,
}

struct SupabaseInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
    service_role_key: SecretString,
}

impl Supabase {
    /// Create a new Supabase client from configuration.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(SupabaseInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                anon_key: config.anon_key.clone(),
                service_role_key: config.service_role_key.clone(),
            }),
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Start a GoTrue request. Authenticated with the anon key; callers add
    /// a user bearer token where required.
    pub(crate) fn auth_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}/auth/v1{path}", self.inner.base_url))
            .header("apikey", self.inner.anon_key.expose_secret())
    }

    /// Start a PostgREST request against a table, authenticated with the
    /// service-role key.
    pub(crate) fn rest_request(&self, method: Method, table: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}/rest/v1/{table}", self.inner.base_url))
            .header("apikey", self.inner.service_role_key.expose_secret())
            .bearer_auth(self.inner.service_role_key.expose_secret())
    }

    /// Start a Storage object request, authenticated with the service-role
    /// key.
    pub(crate) fn storage_request(
        &self,
        method: Method,
        bucket: &str,
        path: &str,
    ) -> RequestBuilder {
        self.inner
            .client
            .request(
                method,
                format!("{}/storage/v1/object/{bucket}/{path}", self.inner.base_url),
            )
            .header("apikey", self.inner.service_role_key.expose_secret())
            .bearer_auth(self.inner.service_role_key.expose_secret())
    }

    /// Send a request and decode the JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SupabaseError> {
        let body = self.execute_raw(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request, keeping only the success/failure outcome.
    pub(crate) async fn execute_empty(&self, request: RequestBuilder) -> Result<(), SupabaseError> {
        self.execute_raw(request).await.map(|_| ())
    }

    async fn execute_raw(&self, request: RequestBuilder) -> Result<String, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Supabase returned non-success status"
            );
            return Err(SupabaseError::Api {
                status,
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

/// Pull a human-readable message out of a Supabase error body.
///
/// PostgREST uses `message`, GoTrue uses `msg` or `error_description`, and
/// Storage uses `error`. Unrecognized bodies are truncated raw.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        msg: Option<String>,
        #[serde(default)]
        error_description: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .message
                .or(parsed.msg)
                .or(parsed.error_description)
                .or(parsed.error)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42P01","message":"relation does not exist"}"#;
        assert_eq!(error_message(body), "relation does not exist");
    }

    #[test]
    fn error_message_reads_gotrue_shapes() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(body), "Invalid login credentials");

        let body = r#"{"code":401,"msg":"invalid JWT"}"#;
        assert_eq!(error_message(body), "invalid JWT");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn rejection_covers_4xx_only() {
        let denied = SupabaseError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: "invalid JWT".to_string(),
        };
        assert!(denied.is_rejection());

        let down = SupabaseError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".to_string(),
        };
        assert!(!down.is_rejection());
    }
}
