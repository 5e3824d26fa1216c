//! `/api/categories` bindings.

use reqwest::Method;
use serde::Deserialize;
use terracota_core::{Category, CategoryId, CategoryPayload};

use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Deserialize)]
struct CategoriesEnvelope {
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryEnvelope {
    category: Category,
}

#[derive(Debug, Deserialize)]
struct DeletedEnvelope {
    id: CategoryId,
}

/// Fetch all categories, ordered by name.
pub async fn list(api: &ApiClient) -> Result<Vec<Category>, ApiError> {
    let envelope: CategoriesEnvelope = api.get("/api/categories", None).await?;
    Ok(envelope.categories)
}

pub async fn create(
    api: &ApiClient,
    payload: &CategoryPayload,
    token: &str,
) -> Result<Category, ApiError> {
    let envelope: CategoryEnvelope = api
        .send_json(Method::POST, "/api/categories", payload, Some(token))
        .await?;
    Ok(envelope.category)
}

pub async fn update(
    api: &ApiClient,
    payload: &CategoryPayload,
    token: &str,
) -> Result<Category, ApiError> {
    let envelope: CategoryEnvelope = api
        .send_json(Method::PUT, "/api/categories", payload, Some(token))
        .await?;
    Ok(envelope.category)
}

/// Delete by id. The API refuses with 409 while products still use the
/// category.
pub async fn delete(api: &ApiClient, id: CategoryId, token: &str) -> Result<CategoryId, ApiError> {
    let envelope: DeletedEnvelope = api
        .delete(&format!("/api/categories?id={id}"), Some(token))
        .await?;
    Ok(envelope.id)
}
