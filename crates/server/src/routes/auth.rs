//! Admin login and session verification.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;
use terracota_core::{Credentials, User};

use crate::error::{AppError, Result};
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

#[derive(Serialize)]
pub struct LoginResponse {
    success: bool,
    user: User,
    token: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    valid: bool,
    user: User,
}

/// `POST /api/auth/login`
///
/// Validates and sanitizes the credentials, signs in against GoTrue, and
/// only lets admins through.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>> {
    credentials.validate().map_err(AppError::Validation)?;
    let clean = credentials.sanitized();

    let signin = match state.supabase().sign_in(&clean.email, &clean.password).await {
        Ok(signin) => signin,
        Err(err) if err.is_rejection() => {
            return Err(AppError::Unauthorized("Credenciales incorrectas".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    if !signin.user.is_admin() {
        return Err(AppError::Forbidden(
            "Acceso no autorizado. Solo administradores pueden acceder.".to_string(),
        ));
    }

    Ok(Json(LoginResponse {
        success: true,
        user: signin.user.into_public(),
        token: signin.access_token,
    }))
}

/// `GET /api/auth/verify`
///
/// Checks the bearer token against GoTrue. Any signed-in user verifies;
/// the admin gate lives on the mutating routes.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("No autorizado".to_string()))?;

    let user = match state.supabase().get_user(token).await {
        Ok(user) => user,
        Err(err) if err.is_rejection() => {
            return Err(AppError::Unauthorized("Token inválido o expirado".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(VerifyResponse {
        valid: true,
        user: user.into_public(),
    }))
}
