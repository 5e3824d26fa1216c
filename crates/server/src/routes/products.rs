//! Product CRUD.
//!
//! Reads are public; writes require the admin guard. The primary image is
//! forced to `images[0]` on every write so the catalog cards and the
//! gallery never disagree.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use terracota_core::{Product, ProductId, ProductPayload};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const TABLE: &str = "products";
const MISSING_ID: &str = "ID del producto requerido";

#[derive(Serialize)]
pub struct ProductsResponse {
    success: bool,
    products: Vec<Product>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    success: bool,
    product: Product,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    success: bool,
    id: ProductId,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    id: Option<String>,
}

/// `GET /api/products` - newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = state.supabase().select_all(TABLE, "created_at.desc").await?;

    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut payload): Json<ProductPayload>,
) -> Result<Json<ProductResponse>> {
    payload.validate().map_err(AppError::Validation)?;
    payload.normalize();
    // The backend assigns ids; a client-supplied one is ignored
    payload.id = None;

    let product = state.supabase().insert(TABLE, &payload).await?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// `PUT /api/products`
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(mut payload): Json<ProductPayload>,
) -> Result<Json<ProductResponse>> {
    payload.validate().map_err(AppError::Validation)?;
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest(MISSING_ID.to_string()))?;
    payload.normalize();

    let product = state
        .supabase()
        .update(TABLE, id.as_i32(), &payload)
        .await?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// `DELETE /api/products?id=`
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeletedResponse>> {
    let id = parse_id(params.id.as_deref())?;
    state.supabase().delete(TABLE, id.as_i32()).await?;

    Ok(Json(DeletedResponse { success: true, id }))
}

// A missing and a malformed id read the same to the caller
fn parse_id(raw: Option<&str>) -> Result<ProductId> {
    raw.and_then(|value| value.parse::<i32>().ok())
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest(MISSING_ID.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_malformed_ids_read_the_same() {
        assert!(parse_id(None).is_err());
        assert!(parse_id(Some("abc")).is_err());
        assert_eq!(parse_id(Some("7")).unwrap(), ProductId::new(7));
    }
}
