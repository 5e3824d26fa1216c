//! Error type for calls against the Terracota API.
//!
//! The part that matters is 401 classification. The API answers session
//! problems (expired or tampered token) with messages that name the token or
//! the session, and those must force a logout. A 401 for bad login
//! credentials and a network failure must not.

use reqwest::StatusCode;
use terracota_core::validate::FieldError;

/// Shown for any transport-level failure. Never triggers a logout.
pub const NETWORK_ERROR_MESSAGE: &str = "Error de conexión. Intenta nuevamente.";

/// Carried by [`ApiError::AuthExpired`] when a 401 arrives without a
/// readable error body.
const SESSION_EXPIRED_FALLBACK: &str =
    "Sesión expirada o token inválido. Por favor, inicia sesión nuevamente.";

/// Errors from Terracota API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success response that is not a session problem.
    #[error("API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// A 401 whose message marks the session as expired or the token as
    /// invalid. Operations funnel this into a forced logout.
    #[error("session expired: {0}")]
    AuthExpired(String),

    /// A success response whose body did not match the expected shape.
    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rejected client-side before any request went out.
    #[error("validation failed: {}", format_field_errors(.0))]
    Invalid(Vec<FieldError>),
}

impl ApiError {
    /// Classify a non-success response.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.is_empty());

        if status == StatusCode::UNAUTHORIZED {
            return match message {
                Some(message) if is_session_expiry(&message) => Self::AuthExpired(message),
                Some(message) => Self::Api {
                    status,
                    message: Some(message),
                },
                // A 401 without a readable error is assumed to be an expired
                // session rather than a login rejection.
                None => Self::AuthExpired(SESSION_EXPIRED_FALLBACK.to_owned()),
            };
        }

        Self::Api { status, message }
    }

    /// Whether this error must clear the stored session.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    /// User-facing message for a rejection status.
    ///
    /// The API's own message wins when there is one; transport failures map
    /// to the fixed [`NETWORK_ERROR_MESSAGE`]; anything else falls back to
    /// the operation's generic message (e.g. "Error al crear producto").
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_owned(),
            Self::AuthExpired(message) => message.clone(),
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Invalid(errors) => {
                let messages: Vec<&str> =
                    errors.iter().map(|error| error.message.as_str()).collect();
                messages.join("; ")
            }
            Self::Api { message: None, .. } | Self::Parse(_) => fallback.to_owned(),
        }
    }
}

/// Error body every API route uses: `{"error": "..."}`.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

/// Markers that mean the session itself is no longer valid.
///
/// The check is deliberately case-sensitive: "Credenciales incorrectas" and
/// "No autorizado" carry none of these and stay plain 401s.
fn is_session_expiry(message: &str) -> bool {
    const MARKERS: [&str; 4] = ["token", "sesión", "expirada", "autenticación"];
    MARKERS.iter().any(|marker| message.contains(marker))
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn guard_401_classifies_as_auth_expired() {
        let body = r#"{"error":"Sesión expirada o token inválido. Por favor, inicia sesión nuevamente."}"#;
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, body);
        assert!(err.is_auth_expired());
    }

    #[test]
    fn login_401_stays_a_plain_api_error() {
        let body = r#"{"error":"Credenciales incorrectas"}"#;
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, body);
        assert!(!err.is_auth_expired());
        assert_eq!(err.message_or("x"), "Credenciales incorrectas");
    }

    #[test]
    fn unreadable_401_body_counts_as_expired() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, "<html>gateway</html>");
        assert!(err.is_auth_expired());
        assert_eq!(err.message_or("x"), SESSION_EXPIRED_FALLBACK);
    }

    #[test]
    fn session_markers_are_case_sensitive() {
        // Capital T, so no "token" marker matches.
        let body = r#"{"error":"Token requerido"}"#;
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, body);
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn validation_error_keeps_the_api_message() {
        let body = r#"{"error":"Datos inválidos","details":[{"field":"name","message":"Nombre requerido"}]}"#;
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.message_or("Error al crear producto"), "Datos inválidos");
    }

    #[test]
    fn empty_body_falls_back_to_the_operation_message() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            err.message_or("Error al crear producto"),
            "Error al crear producto"
        );
    }

    #[test]
    fn invalid_joins_the_field_messages() {
        let err = ApiError::Invalid(vec![
            FieldError::new("email", "El email ingresado no es válido"),
            FieldError::new("password", "La contraseña es requerida"),
        ]);
        assert_eq!(
            err.message_or("x"),
            "El email ingresado no es válido; La contraseña es requerida"
        );
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn error_display() {
        let err = ApiError::Api {
            status: StatusCode::CONFLICT,
            message: Some("La categoría está en uso por productos existentes.".to_owned()),
        };
        assert_eq!(
            err.to_string(),
            "API error 409 Conflict: La categoría está en uso por productos existentes."
        );

        let err = ApiError::AuthExpired("Sesión expirada".to_owned());
        assert_eq!(err.to_string(), "session expired: Sesión expirada");
    }
}
