//! Category CRUD.
//!
//! Products point at categories by NAME, so deleting a category that is
//! still referenced would strand its products; that delete is refused
//! with a conflict instead.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use terracota_core::{Category, CategoryId, CategoryPayload};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const TABLE: &str = "categories";
const MISSING_ID: &str = "ID de la categoría requerido";
const IN_USE: &str = "La categoría está en uso por productos existentes.";

#[derive(Serialize)]
pub struct CategoriesResponse {
    success: bool,
    categories: Vec<Category>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    success: bool,
    category: Category,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    success: bool,
    id: CategoryId,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    id: Option<String>,
}

/// `GET /api/categories` - alphabetical.
pub async fn list(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let categories = state.supabase().select_all(TABLE, "name.asc").await?;

    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

/// `POST /api/categories`
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut payload): Json<CategoryPayload>,
) -> Result<Json<CategoryResponse>> {
    payload.validate().map_err(AppError::Validation)?;
    payload.id = None;

    let category = state.supabase().insert(TABLE, &payload).await?;

    Ok(Json(CategoryResponse {
        success: true,
        category,
    }))
}

/// `PUT /api/categories`
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryResponse>> {
    payload.validate().map_err(AppError::Validation)?;
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest(MISSING_ID.to_string()))?;

    let category = state
        .supabase()
        .update(TABLE, id.as_i32(), &payload)
        .await?;

    Ok(Json(CategoryResponse {
        success: true,
        category,
    }))
}

/// `DELETE /api/categories?id=`
///
/// Refused while any product still references the category's name.
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeletedResponse>> {
    let id = parse_id(params.id.as_deref())?;

    // Deleting an id that no longer exists stays a silent no-op
    let matches: Vec<Category> = state
        .supabase()
        .select_eq(TABLE, "id", &id.to_string(), "*")
        .await?;

    if let Some(category) = matches.first() {
        let references: Vec<serde_json::Value> = state
            .supabase()
            .select_eq("products", "category", &category.name, "id")
            .await?;

        if !references.is_empty() {
            return Err(AppError::Conflict(IN_USE.to_string()));
        }
    }

    state.supabase().delete(TABLE, id.as_i32()).await?;

    Ok(Json(DeletedResponse { success: true, id }))
}

fn parse_id(raw: Option<&str>) -> Result<CategoryId> {
    raw.and_then(|value| value.parse::<i32>().ok())
        .map(CategoryId::new)
        .ok_or_else(|| AppError::BadRequest(MISSING_ID.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_parse_like_product_ids() {
        assert!(parse_id(None).is_err());
        assert!(parse_id(Some("")).is_err());
        assert_eq!(parse_id(Some("3")).unwrap(), CategoryId::new(3));
    }
}
