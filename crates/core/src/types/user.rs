//! Users, roles, and sessions for the admin panel.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::validate::{self, FieldError, Issues};

/// Access role carried in the hosted auth service's user metadata.
///
/// Only the literal `admin` grants access to the admin API; any other value
/// (or a missing one) deserializes to [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        if value == "admin" { Self::Admin } else { Self::User }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

/// An authenticated admin-panel user as returned by `/api/auth/login` and
/// `/api/auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Display name; defaults to "Admin" when the auth service has no name
    /// in the user metadata.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

fn default_name() -> String {
    "Admin".to_owned()
}

/// A logged-in session: the user plus the opaque bearer token presented to
/// every mutating API route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Login form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Validate the raw form input, collecting every failing field.
    ///
    /// The same rules run client-side before submitting and server-side
    /// before the credentials reach the auth service.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut issues = Issues::new();

        if self.email.is_empty() {
            issues.push("email", "Email requerido");
        } else if self.email.len() > 255 {
            issues.push("email", "Email demasiado largo");
        } else if !validate::is_email(&self.email) {
            issues.push("email", "Email inválido");
        }

        if self.password.is_empty() {
            issues.push("password", "Contraseña requerida");
        } else if self.password.len() > 255 {
            issues.push("password", "Contraseña demasiado larga");
        }

        issues.into_result()
    }

    /// Trim both fields and lowercase the email before they leave the form.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password.trim().to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_deserialize_as_plain_user() {
        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::User);

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn user_without_name_or_role_gets_defaults() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "7f2c1e4a-90ab-4f6e-8d11-c53a8e21b0aa",
            "email": "dueña@taller.com",
        }))
        .unwrap();

        assert_eq!(user.name, "Admin");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn sanitize_trims_and_lowercases_the_email() {
        let credentials = Credentials {
            email: "  Admin@Taller.COM ".to_owned(),
            password: " secreta6 ".to_owned(),
        };

        let clean = credentials.sanitized();
        assert_eq!(clean.email, "admin@taller.com");
        assert_eq!(clean.password, "secreta6");
    }

    #[test]
    fn login_validation_reports_each_bad_field() {
        let credentials = Credentials {
            email: "not-an-email".to_owned(),
            password: String::new(),
        };

        let errors = credentials.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first().unwrap().message, "Email inválido");
        assert_eq!(errors.get(1).unwrap().message, "Contraseña requerida");
    }

    #[test]
    fn valid_credentials_pass() {
        let credentials = Credentials {
            email: "admin@taller.com".to_owned(),
            password: "secreta6".to_owned(),
        };
        assert!(credentials.validate().is_ok());
    }
}
