//! Storage object upload, removal, and public URLs.

use reqwest::Method;

use super::{Supabase, SupabaseError};

/// The one bucket all product and category images live in. Public read,
/// service-role write.
pub const IMAGE_BUCKET: &str = "images";

/// Cache lifetime advertised for uploaded objects (one year; object names
/// are unique so they never change content).
const OBJECT_CACHE_SECONDS: u32 = 31_536_000;

impl Supabase {
    /// Upload an object. Fails if the path already exists.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let request = self
            .storage_request(Method::POST, bucket, path)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(
                reqwest::header::CACHE_CONTROL,
                format!("max-age={OBJECT_CACHE_SECONDS}"),
            )
            .header("x-upsert", "false")
            .body(bytes);

        self.execute_empty(request).await
    }

    /// Remove an object. The path is relative to the bucket.
    pub async fn remove_object(&self, bucket: &str, path: &str) -> Result<(), SupabaseError> {
        let request = self.storage_request(Method::DELETE, bucket, path);
        self.execute_empty(request).await
    }

    /// The public download URL for an object.
    #[must_use]
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::SupabaseConfig;

    #[test]
    fn public_url_points_into_the_bucket() {
        let supabase = Supabase::new(&SupabaseConfig {
            url: "https://xyz.supabase.co".to_string(),
            anon_key: SecretString::from("anon"),
            service_role_key: SecretString::from("service"),
        });

        assert_eq!(
            supabase.public_object_url(IMAGE_BUCKET, "products/1700000000000-abc.jpg"),
            "https://xyz.supabase.co/storage/v1/object/public/images/products/1700000000000-abc.jpg"
        );
    }
}
