//! `/api/images` bindings: multipart upload, delete by public URL.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;

/// An image read into memory, ready to upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Original file name, used in error messages and the multipart part.
    pub name: String,
    /// MIME type; the API rejects anything outside `image/*`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// What the API stored: the public URL plus the object path inside the bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBody<'a> {
    image_url: &'a str,
}

/// Upload one file under `folder` (the API defaults to `products`).
pub async fn upload(
    api: &ApiClient,
    file: ImageFile,
    folder: Option<&str>,
    token: &str,
) -> Result<UploadedImage, ApiError> {
    let part = Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str(&file.content_type)?;
    let mut form = Form::new().part("file", part);
    if let Some(folder) = folder {
        form = form.text("folder", folder.to_owned());
    }
    api.post_multipart("/api/images", form, Some(token)).await
}

/// Delete by the public URL the upload returned.
pub async fn delete(api: &ApiClient, image_url: &str, token: &str) -> Result<(), ApiError> {
    let _: serde_json::Value = api
        .send_json(
            Method::DELETE,
            "/api/images",
            &DeleteBody { image_url },
            Some(token),
        )
        .await?;
    Ok(())
}
