//! Image operations: single and parallel uploads, delete by URL.

use futures::future::join_all;
use tracing::instrument;

use terracota_core::OpStatus;
use terracota_core::validate::FieldError;

use crate::api;
use crate::api::images::{ImageFile, UploadedImage};
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::store::{ShopOp, Store};

use super::{bearer, note_auth_expiry, reject_shop};

/// Files above this size are rejected before any request goes out; the API
/// enforces the same cap.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Batches are capped at the product image limit.
const MAX_BATCH: usize = 5;

/// Result of a batch upload: URLs that made it, one message per file that
/// did not.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub urls: Vec<String>,
    pub errors: Vec<String>,
}

/// Upload one image under `folder` (the API defaults to `products`).
#[instrument(skip_all, fields(name = %file.name, bytes = file.bytes.len()))]
pub async fn upload_image(
    api: &ApiClient,
    store: &Store,
    file: ImageFile,
    folder: Option<&str>,
) -> Result<UploadedImage, ApiError> {
    store.set_shop_status(ShopOp::UploadImage, OpStatus::pending());

    if let Err(message) = precheck(&file) {
        store.set_shop_status(ShopOp::UploadImage, OpStatus::rejected(message.clone()));
        return Err(ApiError::Invalid(vec![FieldError::new("file", message)]));
    }

    match api::images::upload(api, file, folder, &bearer(store)).await {
        Ok(uploaded) => {
            store.set_shop_status(
                ShopOp::UploadImage,
                OpStatus::fulfilled("Imagen subida exitosamente"),
            );
            Ok(uploaded)
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::UploadImage,
            err,
            "Error al subir imagen",
        )),
    }
}

/// Upload up to five images in parallel, tolerating partial failure.
///
/// Files beyond the batch cap are dropped. Successful URLs and per-file
/// error messages both come back; the operation only settles `Rejected`
/// when every file failed. An empty batch is a no-op.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn upload_images(
    api: &ApiClient,
    store: &Store,
    files: Vec<ImageFile>,
    folder: Option<&str>,
) -> UploadOutcome {
    if files.is_empty() {
        return UploadOutcome::default();
    }

    store.set_shop_status(ShopOp::UploadImage, OpStatus::pending());
    let token = bearer(store);

    let uploads = files.into_iter().take(MAX_BATCH).map(|file| {
        let token = token.clone();
        async move {
            precheck(&file)
                .map_err(|message| ApiError::Invalid(vec![FieldError::new("file", message)]))?;
            api::images::upload(api, file, folder, &token).await
        }
    });

    let mut outcome = UploadOutcome::default();
    for result in join_all(uploads).await {
        match result {
            Ok(uploaded) => outcome.urls.push(uploaded.url),
            Err(err) => {
                let err = note_auth_expiry(store, err);
                outcome.errors.push(err.message_or("Error al subir imagen"));
            }
        }
    }

    if outcome.urls.is_empty() {
        store.set_shop_status(
            ShopOp::UploadImage,
            OpStatus::rejected(outcome.errors.join("\n")),
        );
    } else {
        store.set_shop_status(
            ShopOp::UploadImage,
            OpStatus::fulfilled("Imágenes subidas exitosamente"),
        );
    }
    outcome
}

/// Delete an uploaded image by its public URL.
#[instrument(skip_all)]
pub async fn delete_image(api: &ApiClient, store: &Store, image_url: &str) -> Result<(), ApiError> {
    store.set_shop_status(ShopOp::DeleteImage, OpStatus::pending());
    match api::images::delete(api, image_url, &bearer(store)).await {
        Ok(()) => {
            store.set_shop_status(
                ShopOp::DeleteImage,
                OpStatus::fulfilled("Imagen eliminada exitosamente"),
            );
            Ok(())
        }
        Err(err) => Err(reject_shop(
            store,
            ShopOp::DeleteImage,
            err,
            "Error al eliminar imagen",
        )),
    }
}

/// File checks mirroring the API's own rejections, so a bad file never
/// costs a round trip.
fn precheck(file: &ImageFile) -> Result<(), String> {
    if !file.content_type.starts_with("image/") {
        let kind = if file.content_type.is_empty() {
            "desconocido"
        } else {
            file.content_type.as_str()
        };
        return Err(format!(
            "\"{}\" no es una imagen válida (tipo: {kind}).",
            file.name
        ));
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(format!("\"{}\" supera el límite de 5MB.", file.name));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
