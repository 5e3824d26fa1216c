//! `/api/config` bindings.

use reqwest::Method;
use serde::Deserialize;
use terracota_core::SiteConfig;

use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Deserialize)]
struct ConfigEnvelope {
    config: SiteConfig,
}

/// Fetch the site configuration (public; the storefront needs the WhatsApp
/// number before checkout).
pub async fn fetch(api: &ApiClient) -> Result<SiteConfig, ApiError> {
    let envelope: ConfigEnvelope = api.get("/api/config", None).await?;
    Ok(envelope.config)
}

/// Replace the site configuration.
pub async fn update(
    api: &ApiClient,
    config: &SiteConfig,
    token: &str,
) -> Result<SiteConfig, ApiError> {
    let envelope: ConfigEnvelope = api
        .send_json(Method::PUT, "/api/config", config, Some(token))
        .await?;
    Ok(envelope.config)
}
