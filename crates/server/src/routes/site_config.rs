//! Singleton site configuration.
//!
//! One backend row drives the storefront chrome. The row stores the
//! social links and contact blocks in `social_media` / `contact` columns;
//! both directions of the API speak the camelCase `SiteConfig` shape, so
//! the raw row never leaks.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terracota_core::{ContactInfo, SiteConfig, SocialLinks};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const TABLE: &str = "site_config";
const SINGLETON_ID: i32 = 1;

#[derive(Serialize)]
pub struct ConfigResponse {
    success: bool,
    config: SiteConfig,
}

/// The backend row, column names as stored.
#[derive(Deserialize)]
struct SiteConfigRow {
    #[serde(default)]
    social_media: SocialLinks,
    #[serde(default)]
    contact: ContactInfo,
}

impl From<SiteConfigRow> for SiteConfig {
    fn from(row: SiteConfigRow) -> Self {
        Self {
            social_media: row.social_media,
            contact: row.contact,
        }
    }
}

#[derive(Serialize)]
struct SiteConfigUpdate<'a> {
    social_media: &'a SocialLinks,
    contact: &'a ContactInfo,
    updated_at: DateTime<Utc>,
}

/// `GET /api/config`
pub async fn show(State(state): State<AppState>) -> Result<Json<ConfigResponse>> {
    let row: SiteConfigRow = state.supabase().select_single(TABLE).await?;

    Ok(Json(ConfigResponse {
        success: true,
        config: row.into(),
    }))
}

/// `PUT /api/config`
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(config): Json<SiteConfig>,
) -> Result<Json<ConfigResponse>> {
    config.validate().map_err(AppError::Validation)?;

    let body = SiteConfigUpdate {
        social_media: &config.social_media,
        contact: &config.contact,
        updated_at: Utc::now(),
    };
    let row: SiteConfigRow = state
        .supabase()
        .update(TABLE, SINGLETON_ID, &body)
        .await?;

    Ok(Json(ConfigResponse {
        success: true,
        config: row.into(),
    }))
}
