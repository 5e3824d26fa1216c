//! `/api/products` bindings.

use reqwest::Method;
use serde::Deserialize;
use terracota_core::{Product, ProductId, ProductPayload};

use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct DeletedEnvelope {
    id: ProductId,
}

/// Fetch the whole catalog, newest first.
pub async fn list(api: &ApiClient) -> Result<Vec<Product>, ApiError> {
    let envelope: ProductsEnvelope = api.get("/api/products", None).await?;
    Ok(envelope.products)
}

/// Create a product. Any id in the payload is ignored; the backend assigns one.
pub async fn create(
    api: &ApiClient,
    payload: &ProductPayload,
    token: &str,
) -> Result<Product, ApiError> {
    let envelope: ProductEnvelope = api
        .send_json(Method::POST, "/api/products", payload, Some(token))
        .await?;
    Ok(envelope.product)
}

/// Update a product; the payload must carry the id.
pub async fn update(
    api: &ApiClient,
    payload: &ProductPayload,
    token: &str,
) -> Result<Product, ApiError> {
    let envelope: ProductEnvelope = api
        .send_json(Method::PUT, "/api/products", payload, Some(token))
        .await?;
    Ok(envelope.product)
}

/// Delete by id; returns the id the API confirmed.
pub async fn delete(api: &ApiClient, id: ProductId, token: &str) -> Result<ProductId, ApiError> {
    let envelope: DeletedEnvelope = api
        .delete(&format!("/api/products?id={id}"), Some(token))
        .await?;
    Ok(envelope.id)
}
