//! GoTrue password sign-in and token verification.

use reqwest::Method;
use serde::Deserialize;
use terracota_core::{Role, User};
use uuid::Uuid;

use super::{Supabase, SupabaseError};

/// A user record as GoTrue returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// The free-form metadata blob on a GoTrue user. Only `name` and `role`
/// matter here; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AuthUser {
    /// Whether the metadata grants admin access. Only the literal `admin`
    /// counts.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user_metadata.role.as_deref() == Some("admin")
    }

    /// Collapse into the public wire shape, applying the `Admin` name
    /// default and folding unknown roles to plain users.
    #[must_use]
    pub fn into_public(self) -> User {
        let role = self
            .user_metadata
            .role
            .as_deref()
            .map_or(Role::User, Role::from);

        User {
            id: self.id,
            email: self.email.unwrap_or_default(),
            name: self
                .user_metadata
                .name
                .unwrap_or_else(|| "Admin".to_owned()),
            role,
        }
    }
}

/// A successful password sign-in: the access token plus the user it
/// belongs to.
#[derive(Debug, Deserialize)]
pub struct SignIn {
    pub access_token: String,
    pub user: AuthUser,
}

impl Supabase {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Api` when GoTrue rejects the credentials
    /// (`is_rejection()` is true in that case).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignIn, SupabaseError> {
        let request = self
            .auth_request(Method::POST, "/token")
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));

        self.execute(request).await
    }

    /// Look up the user a bearer token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Api` when the token is invalid or expired.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let request = self
            .auth_request(Method::GET, "/user")
            .bearer_auth(access_token);

        self.execute(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn metadata_role_gates_admin_access() {
        let admin: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "7f2c1e4a-90ab-4f6e-8d11-c53a8e21b0aa",
            "email": "dueña@taller.com",
            "user_metadata": { "role": "admin", "name": "Magu" },
        }))
        .unwrap();
        assert!(admin.is_admin());

        let editor: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "7f2c1e4a-90ab-4f6e-8d11-c53a8e21b0aa",
            "user_metadata": { "role": "editor" },
        }))
        .unwrap();
        assert!(!editor.is_admin());
    }

    #[test]
    fn missing_metadata_means_plain_user() {
        let bare: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "7f2c1e4a-90ab-4f6e-8d11-c53a8e21b0aa",
            "email": "cliente@example.com",
        }))
        .unwrap();

        assert!(!bare.is_admin());
        let user = bare.into_public();
        assert_eq!(user.name, "Admin");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn into_public_keeps_name_and_role() {
        let auth_user: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "7f2c1e4a-90ab-4f6e-8d11-c53a8e21b0aa",
            "email": "dueña@taller.com",
            "user_metadata": { "role": "admin", "name": "Magu" },
        }))
        .unwrap();

        let user = auth_user.into_public();
        assert_eq!(user.name, "Magu");
        assert_eq!(user.email, "dueña@taller.com");
        assert!(user.role.is_admin());
    }
}
