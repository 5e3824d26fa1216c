//! Login, verification, and the admin guard over real HTTP.
//!
//! Every test boots its own API server and stub backend; see the crate
//! docs for the setup.

use reqwest::StatusCode;
use serde_json::{Value, json};

use terracota_integration_tests::TestContext;
use terracota_integration_tests::backend::{
    ADMIN_EMAIL, ADMIN_PASSWORD, PLAIN_USER_EMAIL, PLAIN_USER_PASSWORD,
};
use terracota_server::middleware::auth::SESSION_EXPIRED;

fn product_body() -> Value {
    json!({
        "name": "Taza Esmaltada",
        "image": "https://cdn.example.com/images/products/taza.jpg",
        "images": ["https://cdn.example.com/images/products/taza.jpg"],
        "price": 4500.0,
        "description": "Taza de gres esmaltada a mano",
        "category": "Tazas",
    })
}

async fn login_response(ctx: &TestContext, email: &str, password: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_answers_ok() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("health request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("health body"), "ok");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn admin_login_returns_user_and_token() {
    let ctx = TestContext::spawn().await;

    let response = login_response(&ctx, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("login body");
    assert_eq!(body.get("success"), Some(&Value::Bool(true)));
    assert_eq!(
        body.pointer("/user/name").and_then(Value::as_str),
        Some("Magu")
    );
    assert_eq!(
        body.pointer("/user/role").and_then(Value::as_str),
        Some("admin")
    );
    assert!(
        body.get("token")
            .and_then(Value::as_str)
            .is_some_and(|token| !token.is_empty())
    );
}

#[tokio::test]
async fn wrong_password_is_a_plain_unauthorized() {
    let ctx = TestContext::spawn().await;

    let response = login_response(&ctx, ADMIN_EMAIL, "adivinando-nomas").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Credenciales incorrectas")
    );
}

#[tokio::test]
async fn non_admin_users_are_turned_away() {
    let ctx = TestContext::spawn().await;

    let response = login_response(&ctx, PLAIN_USER_EMAIL, PLAIN_USER_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Acceso no autorizado. Solo administradores pueden acceder.")
    );
}

#[tokio::test]
async fn malformed_credentials_fail_validation_with_details() {
    let ctx = TestContext::spawn().await;

    let response = login_response(&ctx, "no-es-un-email", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Datos inválidos")
    );

    let details = body
        .get("details")
        .and_then(Value::as_array)
        .expect("details array");
    let fields: Vec<&str> = details
        .iter()
        .filter_map(|detail| detail.get("field").and_then(Value::as_str))
        .collect();
    assert_eq!(fields, ["email", "password"]);
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn verify_accepts_a_live_token() {
    let ctx = TestContext::spawn().await;
    let token = ctx.admin_token().await;

    let response = ctx
        .client
        .get(ctx.url("/api/auth/verify"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("verify request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("verify body");
    assert_eq!(body.get("valid"), Some(&Value::Bool(true)));
    assert_eq!(
        body.pointer("/user/email").and_then(Value::as_str),
        Some(ADMIN_EMAIL)
    );
}

#[tokio::test]
async fn any_signed_in_user_verifies() {
    let ctx = TestContext::spawn().await;
    let token = ctx
        .backend
        .issue_token(PLAIN_USER_EMAIL)
        .expect("seeded identity");

    let response = ctx
        .client
        .get(ctx.url("/api/auth/verify"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("verify request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("verify body");
    assert_eq!(
        body.pointer("/user/role").and_then(Value::as_str),
        Some("user")
    );
    // No name in the metadata, so the display default applies
    assert_eq!(
        body.pointer("/user/name").and_then(Value::as_str),
        Some("Admin")
    );
}

#[tokio::test]
async fn verify_without_a_token_is_unauthorized() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .get(ctx.url("/api/auth/verify"))
        .send()
        .await
        .expect("verify request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("No autorizado")
    );
}

#[tokio::test]
async fn verify_rejects_a_revoked_token() {
    let ctx = TestContext::spawn().await;
    let token = ctx.admin_token().await;
    ctx.backend.revoke_token(&token);

    let response = ctx
        .client
        .get(ctx.url("/api/auth/verify"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("verify request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Token inválido o expirado")
    );
}

// ============================================================================
// Admin guard
// ============================================================================

#[tokio::test]
async fn mutations_without_a_token_get_the_session_message() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&product_body())
        .send()
        .await
        .expect("create request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some(SESSION_EXPIRED)
    );
    assert_eq!(ctx.backend.row_count("products"), 0);
}

#[tokio::test]
async fn a_plain_user_token_reads_as_an_expired_session() {
    let ctx = TestContext::spawn().await;
    let token = ctx
        .backend
        .issue_token(PLAIN_USER_EMAIL)
        .expect("seeded identity");

    let response = ctx
        .client
        .post(ctx.url("/api/products"))
        .bearer_auth(&token)
        .json(&product_body())
        .send()
        .await
        .expect("create request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some(SESSION_EXPIRED)
    );
}

#[tokio::test]
async fn a_revoked_token_cannot_mutate() {
    let ctx = TestContext::spawn().await;
    let token = ctx.admin_token().await;
    ctx.backend.revoke_token(&token);

    let response = ctx
        .client
        .post(ctx.url("/api/products"))
        .bearer_auth(&token)
        .json(&product_body())
        .send()
        .await
        .expect("create request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some(SESSION_EXPIRED)
    );
    assert_eq!(ctx.backend.row_count("products"), 0);
}
