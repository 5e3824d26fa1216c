//! Integration tests for Terracota.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p terracota-integration-tests
//! ```
//!
//! Every test boots its own pair of in-process servers on ephemeral ports:
//! a stub of the hosted backend ([`backend::Backend`]) and, wired to it,
//! the exact router the API binary runs. Tests then talk to the API over
//! real HTTP. No external services are involved.
//!
//! # Test Categories
//!
//! - `api_auth` - Login, verification, and the admin guard
//! - `api_catalog` - Product and category CRUD
//! - `api_site_config` - The singleton site configuration
//! - `api_images` - Image upload and removal
//! - `client_ops` - Client operations and state against the live API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;

use secrecy::SecretString;
use terracota_server::config::{ServerConfig, SupabaseConfig};
use terracota_server::routes;
use terracota_server::state::AppState;

use crate::backend::Backend;

/// A spawned API server wired to its own stub backend.
pub struct TestContext {
    /// Plain HTTP client for route-level tests.
    pub client: reqwest::Client,
    /// Base URL of the API server (`http://127.0.0.1:{port}`).
    pub api_url: String,
    /// Handle on the stub backend for seeding and inspection.
    pub backend: Backend,
}

impl TestContext {
    /// Boot the stub backend and the API server.
    pub async fn spawn() -> Self {
        let backend = Backend::new();
        let backend_url = serve(backend.router()).await;

        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("loopback address"),
            // The listener below picks the real port; this one is unused
            port: 0,
            supabase: SupabaseConfig {
                url: backend_url,
                anon_key: SecretString::from(backend::ANON_KEY),
                service_role_key: SecretString::from(backend::SERVICE_ROLE_KEY),
            },
            cors_allowed_origins: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let api_url = serve(routes::app(AppState::new(config))).await;

        Self {
            client: reqwest::Client::new(),
            api_url,
            backend,
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Log in as the seeded admin and return the bearer token.
    pub async fn admin_token(&self) -> String {
        self.login(backend::ADMIN_EMAIL, backend::ADMIN_PASSWORD)
            .await
    }

    /// Log in through the API and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request");
        assert!(
            response.status().is_success(),
            "login failed with status {}",
            response.status()
        );

        let body: serde_json::Value = response.json().await.expect("login response body");
        body.get("token")
            .and_then(serde_json::Value::as_str)
            .expect("login response carries a token")
            .to_owned()
    }
}

/// Serve a router on an ephemeral loopback port, returning its base URL.
async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind an ephemeral port");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    format!("http://{addr}")
}
