//! Async operations: call the API, record status, apply the state change.
//!
//! Every operation follows the same lifecycle. It marks `Pending` in the
//! owning slice, runs the request, then settles to `Fulfilled` with the
//! Spanish success message or `Rejected` with the API's message (falling
//! back to the operation's generic one, or the fixed network message).
//! State changes are only applied on success.
//!
//! An error classified as an expired session also clears the session. That
//! happens in one place ([`note_auth_expiry`]), so no operation can forget
//! the forced logout, and a network failure can never cause one.

mod auth;
mod images;
mod shop;

pub use auth::{fetch_site_config, login, update_site_config, verify_session};
pub use images::{UploadOutcome, delete_image, upload_image, upload_images};
pub use shop::{
    create_category, create_product, delete_category, delete_product, ensure_catalog,
    fetch_categories, fetch_products, update_category, update_product,
};

use terracota_core::OpStatus;

use crate::error::ApiError;
use crate::store::{AuthOp, ShopOp, Store};

/// Forced-logout funnel. Passes the error back so call sites keep their
/// `map_err` flow.
fn note_auth_expiry(store: &Store, error: ApiError) -> ApiError {
    if error.is_auth_expired() {
        tracing::warn!("session no longer valid, clearing stored session");
        store.logout();
    }
    error
}

/// Settle a failed shop operation: funnel expiry, record the rejection.
fn reject_shop(store: &Store, op: ShopOp, error: ApiError, fallback: &str) -> ApiError {
    let error = note_auth_expiry(store, error);
    store.set_shop_status(op, OpStatus::rejected(error.message_or(fallback)));
    error
}

/// Settle a failed auth operation: funnel expiry, record the rejection.
fn reject_auth(store: &Store, op: AuthOp, error: ApiError, fallback: &str) -> ApiError {
    let error = note_auth_expiry(store, error);
    store.set_auth_status(op, OpStatus::rejected(error.message_or(fallback)));
    error
}

/// Bearer token for admin calls. An empty token simply fails server-side
/// with the session-expired 401, which then flows through the usual funnel.
fn bearer(store: &Store) -> String {
    store.token().unwrap_or_default()
}
