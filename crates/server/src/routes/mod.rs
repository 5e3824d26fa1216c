//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness probe
//!
//! # Auth
//! POST   /api/auth/login      - Admin password login
//! GET    /api/auth/verify     - Bearer token check
//!
//! # Catalog
//! GET    /api/products        - Product list (public)
//! POST   /api/products        - Create product (admin)
//! PUT    /api/products        - Update product by body id (admin)
//! DELETE /api/products?id=    - Delete product (admin)
//! GET    /api/categories      - Category list (public)
//! POST   /api/categories      - Create category (admin)
//! PUT    /api/categories      - Update category by body id (admin)
//! DELETE /api/categories?id=  - Delete category (admin, blocked while in use)
//!
//! # Site configuration
//! GET    /api/config          - Current site config (public)
//! PUT    /api/config          - Update site config (admin)
//!
//! # Images
//! POST   /api/images          - Multipart upload to storage (admin)
//! DELETE /api/images          - Remove object by public URL (admin)
//! ```

pub mod auth;
pub mod categories;
pub mod images;
pub mod products;
pub mod site_config;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Request body cap: the 5 MB image limit plus multipart framing headroom.
const MAX_BODY_BYTES: usize = images::MAX_IMAGE_BYTES + 1024 * 1024;

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        .route(
            "/products",
            get(products::list)
                .post(products::create)
                .put(products::update)
                .delete(products::remove),
        )
        .route(
            "/categories",
            get(categories::list)
                .post(categories::create)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route("/config", get(site_config::show).put(site_config::update))
        .route("/images", post(images::upload).delete(images::remove))
}

/// Build the full application router.
///
/// Sentry's tower layers are added by the binary; everything else lives
/// here so tests can mount the exact router the server runs.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// CORS for the JSON API: wide open unless origins are pinned by
/// configuration.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    config.cors_allowed_origins.as_ref().map_or_else(
        CorsLayer::permissive,
        |origins| {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        },
    )
}
