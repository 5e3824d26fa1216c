//! Auth slice: session, site configuration, and per-operation statuses.

use std::collections::HashMap;

use terracota_core::{OpStatus, Session, SiteConfig};

/// Auth-side operations tracked in the status map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthOp {
    Login,
    Verify,
    FetchConfig,
    UpdateConfig,
}

/// Session, site config, and auth operation statuses.
///
/// "Authenticated" is derived from the session being present; there is no
/// separate flag to drift out of sync.
#[derive(Debug, Clone, Default)]
pub struct AuthSlice {
    pub session: Option<Session>,
    pub site_config: SiteConfig,
    pub status: HashMap<AuthOp, OpStatus>,
}

impl AuthSlice {
    pub fn login(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drop the session. The cart and the site config survive a logout.
    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn set_site_config(&mut self, config: SiteConfig) {
        self.site_config = config;
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    /// Status for one operation; `Idle` if it never ran.
    #[must_use]
    pub fn status(&self, op: AuthOp) -> OpStatus {
        self.status.get(&op).cloned().unwrap_or_default()
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }
}
