//! Image upload and removal against the storage bucket.
//!
//! Uploads land under `{folder}/{timestamp_ms}-{random}.{ext}` inside the
//! public `images` bucket; the response carries both the public URL (for
//! product records) and the object path. Deletion takes the public URL
//! back apart to find the path.

use axum::Json;
use axum::extract::{Multipart, State};
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::supabase::IMAGE_BUCKET;

/// Upload size cap, enforced again client-side before the request is made.
pub(crate) const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_FOLDER: &str = "products";
const NO_FILE: &str = "No se proporcionó archivo";

#[derive(Serialize)]
pub struct UploadResponse {
    success: bool,
    url: String,
    path: String,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    success: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBody {
    #[serde(default)]
    image_url: String,
}

/// `POST /api/images` - multipart form with a `file` part and an optional
/// `folder` part.
pub async fn upload(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder = DEFAULT_FOLDER.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Internal(err.to_string()))?
    {
        let field_name = field.name().map(ToString::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("archivo").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::Internal(err.to_string()))?;
                file = Some((name, content_type, bytes.to_vec()));
            }
            Some("folder") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::Internal(err.to_string()))?;
                if !value.is_empty() {
                    folder = value;
                }
            }
            _ => {}
        }
    }

    let (name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest(NO_FILE.to_string()))?;

    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "\"{name}\" no es una imagen válida."
        )));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(format!(
            "\"{name}\" supera el límite de 5MB."
        )));
    }

    let path = object_path(&folder, &content_type);
    state
        .supabase()
        .upload_object(IMAGE_BUCKET, &path, bytes, &content_type)
        .await?;
    let url = state.supabase().public_object_url(IMAGE_BUCKET, &path);

    Ok(Json(UploadResponse {
        success: true,
        url,
        path,
    }))
}

/// `DELETE /api/images` - JSON body `{"imageUrl": …}`.
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<DeleteBody>,
) -> Result<Json<DeletedResponse>> {
    if body.image_url.is_empty() {
        return Err(AppError::BadRequest("URL de imagen requerida".to_string()));
    }

    let path = bucket_path(&body.image_url)
        .ok_or_else(|| AppError::BadRequest("URL de imagen inválida".to_string()))?;

    state
        .supabase()
        .remove_object(IMAGE_BUCKET, &path)
        .await?;

    Ok(Json(DeletedResponse { success: true }))
}

/// A collision-proof object path: millisecond timestamp plus a random
/// alphanumeric suffix, extension taken from the MIME subtype.
fn object_path(folder: &str, content_type: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(13)
        .map(char::from)
        .collect();
    let extension = content_type
        .split('/')
        .nth(1)
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or("jpg");

    format!("{folder}/{timestamp}-{suffix}.{extension}")
}

/// The object path inside the bucket, taken from a public URL. `None` when
/// the URL does not parse or does not pass through the bucket.
fn bucket_path(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();
    let bucket_index = segments.iter().position(|segment| *segment == IMAGE_BUCKET)?;

    let path = segments.get(bucket_index + 1..)?.join("/");
    if path.is_empty() { None } else { Some(path) }
}
