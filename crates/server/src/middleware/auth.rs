//! Admin authentication extractor.
//!
//! Mutating routes require a bearer token whose Supabase user carries
//! `role: "admin"` in its metadata. Reads stay public.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};

use crate::error::AppError;
use crate::state::AppState;
use crate::supabase::AuthUser;

/// Message for every admin-guard rejection. The admin panel watches for
/// this exact wording to force a logout on stale sessions.
pub const SESSION_EXPIRED: &str =
    "Sesión expirada o token inválido. Por favor, inicia sesión nuevamente.";

/// Extractor that requires an authenticated admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hola, {:?}", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized(SESSION_EXPIRED.to_string()))?;

        let user = match state.supabase().get_user(token).await {
            Ok(user) => user,
            // A token Supabase rejects is a stale session; anything else is
            // our problem, not the client's, and must not force a logout.
            Err(err) if err.is_rejection() => {
                return Err(AppError::Unauthorized(SESSION_EXPIRED.to_string()));
            }
            Err(err) => return Err(AppError::Supabase(err)),
        };

        if !user.is_admin() {
            return Err(AppError::Unauthorized(SESSION_EXPIRED.to_string()));
        }

        Ok(Self(user))
    }
}

/// The token of an `Authorization: Bearer …` header, if present.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn bearer_token_strips_the_scheme() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_requires_the_bearer_scheme() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        // The scheme check is case-sensitive, matching the admin panel
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
    }
}
