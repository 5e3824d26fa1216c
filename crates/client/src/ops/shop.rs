//! Catalog operations: fetch, create, update, delete.

use tracing::instrument;

use terracota_core::{
    Category, CategoryId, CategoryPayload, OpStatus, Product, ProductId, ProductPayload,
};

use crate::api;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::store::{ShopOp, Store};

use super::{bearer, reject_shop};

/// Fetch the whole catalog into the store.
#[instrument(skip_all)]
pub async fn fetch_products(api: &ApiClient, store: &Store) -> Result<(), ApiError> {
    store.set_shop_status(ShopOp::FetchProducts, OpStatus::pending());
    match api::products::list(api).await {
        Ok(products) => {
            store.set_products(products);
            store.set_shop_status(ShopOp::FetchProducts, OpStatus::fulfilled(""));
            Ok(())
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::FetchProducts,
            err,
            "Error al obtener productos",
        )),
    }
}

/// Fetch all categories into the store.
#[instrument(skip_all)]
pub async fn fetch_categories(api: &ApiClient, store: &Store) -> Result<(), ApiError> {
    store.set_shop_status(ShopOp::FetchCategories, OpStatus::pending());
    match api::categories::list(api).await {
        Ok(categories) => {
            store.set_categories(categories);
            store.set_shop_status(ShopOp::FetchCategories, OpStatus::fulfilled(""));
            Ok(())
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::FetchCategories,
            err,
            "Error al obtener categorías",
        )),
    }
}

/// Fetch whatever part of the catalog the store is missing, both halves
/// concurrently when both are empty.
pub async fn ensure_catalog(api: &ApiClient, store: &Store) -> Result<(), ApiError> {
    let (need_products, need_categories) = {
        let state = store.snapshot();
        (
            state.shop.products.is_empty(),
            state.shop.categories.is_empty(),
        )
    };

    match (need_products, need_categories) {
        (true, true) => {
            let (products, categories) =
                tokio::join!(fetch_products(api, store), fetch_categories(api, store));
            products?;
            categories?;
        }
        (true, false) => fetch_products(api, store).await?,
        (false, true) => fetch_categories(api, store).await?,
        (false, false) => {}
    }
    Ok(())
}

/// Create a product and append it to the catalog.
#[instrument(skip_all, fields(name = %payload.name))]
pub async fn create_product(
    api: &ApiClient,
    store: &Store,
    payload: &ProductPayload,
) -> Result<Product, ApiError> {
    store.set_shop_status(ShopOp::CreateProduct, OpStatus::pending());
    match api::products::create(api, payload, &bearer(store)).await {
        Ok(product) => {
            store.add_product(product.clone());
            store.set_shop_status(
                ShopOp::CreateProduct,
                OpStatus::fulfilled("Producto creado exitosamente"),
            );
            Ok(product)
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::CreateProduct,
            err,
            "Error al crear producto",
        )),
    }
}

/// Update a product in place. The payload must carry the id.
#[instrument(skip_all, fields(id = ?payload.id))]
pub async fn update_product(
    api: &ApiClient,
    store: &Store,
    payload: &ProductPayload,
) -> Result<Product, ApiError> {
    store.set_shop_status(ShopOp::UpdateProduct, OpStatus::pending());
    match api::products::update(api, payload, &bearer(store)).await {
        Ok(product) => {
            store.update_product(product.clone());
            store.set_shop_status(
                ShopOp::UpdateProduct,
                OpStatus::fulfilled("Producto actualizado exitosamente"),
            );
            Ok(product)
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::UpdateProduct,
            err,
            "Error al actualizar producto",
        )),
    }
}

/// Delete a product; the catalog drops the id the API confirmed.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_product(
    api: &ApiClient,
    store: &Store,
    id: ProductId,
) -> Result<(), ApiError> {
    store.set_shop_status(ShopOp::DeleteProduct, OpStatus::pending());
    match api::products::delete(api, id, &bearer(store)).await {
        Ok(deleted) => {
            store.delete_product(deleted);
            store.set_shop_status(
                ShopOp::DeleteProduct,
                OpStatus::fulfilled("Producto eliminado exitosamente"),
            );
            Ok(())
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::DeleteProduct,
            err,
            "Error al eliminar producto",
        )),
    }
}

/// Create a category and append it.
#[instrument(skip_all, fields(name = %payload.name))]
pub async fn create_category(
    api: &ApiClient,
    store: &Store,
    payload: &CategoryPayload,
) -> Result<Category, ApiError> {
    store.set_shop_status(ShopOp::CreateCategory, OpStatus::pending());
    match api::categories::create(api, payload, &bearer(store)).await {
        Ok(category) => {
            store.add_category(category.clone());
            store.set_shop_status(
                ShopOp::CreateCategory,
                OpStatus::fulfilled("Categoría creada exitosamente"),
            );
            Ok(category)
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::CreateCategory,
            err,
            "Error al crear categoría",
        )),
    }
}

/// Update a category in place. The payload must carry the id.
#[instrument(skip_all, fields(id = ?payload.id))]
pub async fn update_category(
    api: &ApiClient,
    store: &Store,
    payload: &CategoryPayload,
) -> Result<Category, ApiError> {
    store.set_shop_status(ShopOp::UpdateCategory, OpStatus::pending());
    match api::categories::update(api, payload, &bearer(store)).await {
        Ok(category) => {
            store.update_category(category.clone());
            store.set_shop_status(
                ShopOp::UpdateCategory,
                OpStatus::fulfilled("Categoría actualizada exitosamente"),
            );
            Ok(category)
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::UpdateCategory,
            err,
            "Error al actualizar categoría",
        )),
    }
}

/// Delete a category. The API refuses while products still reference it.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_category(
    api: &ApiClient,
    store: &Store,
    id: CategoryId,
) -> Result<(), ApiError> {
    store.set_shop_status(ShopOp::DeleteCategory, OpStatus::pending());
    match api::categories::delete(api, id, &bearer(store)).await {
        Ok(deleted) => {
            store.delete_category(deleted);
            store.set_shop_status(
                ShopOp::DeleteCategory,
                OpStatus::fulfilled("Categoría eliminada exitosamente"),
            );
            Ok(())
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::DeleteCategory,
            err,
            "Error al eliminar categoría",
        )),
    }
}
