//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures backend failures to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always JSON of the form
//! `{"error": msg}`, plus a `details` array for validation failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use terracota_core::validate::FieldError;
use thiserror::Error;

use crate::supabase::SupabaseError;

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed field validation.
    #[error("Validation failed: {}", format_details(.0))]
    Validation(Vec<FieldError>),

    /// Malformed or incomplete request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, expired, or insufficient credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Supabase call failed.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Supabase(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Supabase(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Backend detail stays in the logs; clients get the fixed message
        let body = match self {
            Self::Validation(details) => {
                json!({ "error": "Datos inválidos", "details": details })
            }
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::Conflict(message) => json!({ "error": message }),
            Self::Supabase(_) | Self::Internal(_) => json!({ "error": "Error del servidor" }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

fn format_details(details: &[FieldError]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn get_body(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("ID del producto requerido".to_string());
        assert_eq!(err.to_string(), "Bad request: ID del producto requerido");

        let err = AppError::Conflict("La categoría está en uso".to_string());
        assert_eq!(err.to_string(), "Conflict: La categoría está en uso");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation(vec![FieldError::new(
                "name",
                "Nombre requerido"
            )])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body_carries_details() {
        let body = get_body(AppError::Validation(vec![
            FieldError::new("email", "Email inválido"),
            FieldError::new("password", "Contraseña requerida"),
        ]))
        .await;

        assert_eq!(body.get("error").unwrap(), "Datos inválidos");
        let details = body.get("details").unwrap().as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details.first().unwrap().get("field").unwrap(), "email");
        assert_eq!(
            details.first().unwrap().get("message").unwrap(),
            "Email inválido"
        );
    }

    #[tokio::test]
    async fn test_supabase_failure_never_leaks_detail() {
        let err = AppError::Supabase(SupabaseError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "relation \"products\" does not exist".to_string(),
        });

        let body = get_body(err).await;
        assert_eq!(body.get("error").unwrap(), "Error del servidor");
        assert!(body.get("details").is_none());
    }
}
