//! Session and site-config operations.

use tracing::instrument;

use terracota_core::{Credentials, OpStatus, Session, SiteConfig, User};

use crate::api;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::store::{AuthOp, Store};

use super::{bearer, reject_auth};

/// Sign in. Credentials are sanitized and validated client-side first; a
/// validation failure never reaches the network.
#[instrument(skip_all, fields(email = %credentials.email))]
pub async fn login(
    api: &ApiClient,
    store: &Store,
    credentials: &Credentials,
) -> Result<Session, ApiError> {
    store.set_auth_status(AuthOp::Login, OpStatus::pending());

    let credentials = credentials.sanitized();
    if let Err(errors) = credentials.validate() {
        let err = ApiError::Invalid(errors);
        store.set_auth_status(
            AuthOp::Login,
            OpStatus::rejected(err.message_or("Error al iniciar sesión")),
        );
        return Err(err);
    }

    match api::auth::login(api, &credentials).await {
        Ok(session) => {
            store.login(session.clone());
            store.set_auth_status(AuthOp::Login, OpStatus::fulfilled("Login exitoso"));
            Ok(session)
        }
        Err(err) => Err(reject_auth(
            store,
            AuthOp::Login,
            err,
            "Error al iniciar sesión",
        )),
    }
}

/// Check that the stored token still verifies.
///
/// Returns `Ok(None)` when there is no session to check. Any API rejection
/// drops the session; only a network failure leaves it in place, so a flaky
/// connection cannot log the user out.
#[instrument(skip_all)]
pub async fn verify_session(api: &ApiClient, store: &Store) -> Result<Option<User>, ApiError> {
    let Some(token) = store.token() else {
        return Ok(None);
    };

    store.set_auth_status(AuthOp::Verify, OpStatus::pending());
    match api::auth::verify(api, &token).await {
        Ok(user) => {
            store.set_auth_status(AuthOp::Verify, OpStatus::fulfilled(""));
            Ok(Some(user))
        }
        Err(err) => {
            if !matches!(err, ApiError::Network(_)) {
                tracing::warn!("stored session failed verification, logging out");
                store.logout();
            }
            store.set_auth_status(
                AuthOp::Verify,
                OpStatus::rejected(err.message_or("Token inválido o expirado")),
            );
            Err(err)
        }
    }
}

/// Fetch the site configuration (public).
#[instrument(skip_all)]
pub async fn fetch_site_config(api: &ApiClient, store: &Store) -> Result<SiteConfig, ApiError> {
    store.set_auth_status(AuthOp::FetchConfig, OpStatus::pending());
    match api::config::fetch(api).await {
        Ok(config) => {
            store.set_site_config(config.clone());
            store.set_auth_status(AuthOp::FetchConfig, OpStatus::fulfilled(""));
            Ok(config)
        }
        Err(err) => Err(reject_auth(
            store,
            AuthOp::FetchConfig,
            err,
            "Error al obtener configuración",
        )),
    }
}

/// Replace the site configuration. Validated client-side first.
#[instrument(skip_all)]
pub async fn update_site_config(
    api: &ApiClient,
    store: &Store,
    config: &SiteConfig,
) -> Result<SiteConfig, ApiError> {
    store.set_auth_status(AuthOp::UpdateConfig, OpStatus::pending());

    if let Err(errors) = config.validate() {
        let err = ApiError::Invalid(errors);
        store.set_auth_status(
            AuthOp::UpdateConfig,
            OpStatus::rejected(err.message_or("Error al actualizar configuración")),
        );
        return Err(err);
    }

    match api::config::update(api, config, &bearer(store)).await {
        Ok(config) => {
            store.set_site_config(config.clone());
            store.set_auth_status(
                AuthOp::UpdateConfig,
                OpStatus::fulfilled("Configuración actualizada exitosamente"),
            );
            Ok(config)
        }
        Err(err) => Err(reject_auth(
            store,
            AuthOp::UpdateConfig,
            err,
            "Error al actualizar configuración",
        )),
    }
}
