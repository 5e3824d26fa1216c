//! Snapshot persistence for the pieces of state that survive a restart.
//!
//! Exactly the cart, the session, and the site config are persisted.
//! Catalog data and operation statuses are always refetched, so stale
//! products can never shadow the backend.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use terracota_core::{Cart, Session, SiteConfig};

use crate::store::{Store, StoreState};

/// The persisted subset of [`StoreState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub site_config: SiteConfig,
}

/// Errors reading or writing the state file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The file exists but does not parse as state. Reported instead of
    /// silently starting empty, which would drop the user's cart.
    #[error("state file does not parse: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PersistedState {
    /// Extract the persistable subset from a full state.
    #[must_use]
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            cart: state.shop.cart.clone(),
            session: state.auth.session.clone(),
            site_config: state.auth.site_config.clone(),
        }
    }

    /// Rebuild a full state: persisted fields in place, everything else
    /// fresh.
    #[must_use]
    pub fn into_state(self) -> StoreState {
        let mut state = StoreState::default();
        state.shop.cart = self.cart;
        state.auth.session = self.session;
        state.auth.site_config = self.site_config;
        state
    }
}

/// Load persisted state. A missing file is an empty state, not an error.
pub fn load(path: &Path) -> Result<PersistedState, PersistError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(PersistedState::default());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Write the persistable subset of `store` to `path`, creating parent
/// directories as needed.
pub fn save(path: &Path, store: &Store) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let state = PersistedState::from_state(&store.snapshot());
    let json = serde_json::to_string_pretty(&state)?;
    fs::write(path, json)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use terracota_core::{Product, ProductId, Role, User};

    use super::*;

    fn populated_store() -> Store {
        let store = Store::new();
        store.add_to_cart(&Product {
            id: ProductId::new(7),
            name: "Bowl de gres".to_owned(),
            image: "https://cdn.example.com/bowl.jpg".to_owned(),
            images: vec!["https://cdn.example.com/bowl.jpg".to_owned()],
            price: Decimal::from(5500),
            description: "Bowl torneado a mano".to_owned(),
            category: "Bowls".to_owned(),
            stock: 4,
            featured: true,
            created_at: None,
        });
        store.login(Session {
            user: User {
                id: uuid::Uuid::nil(),
                email: "admin@terracota.ar".to_owned(),
                name: "Admin".to_owned(),
                role: Role::Admin,
            },
            token: "jwt-token".to_owned(),
        });
        store
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = load(&dir.path().join("no-such-file.json")).unwrap();
        assert!(state.cart.is_empty());
        assert!(state.session.is_none());
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path), Err(PersistError::Parse(_))));
    }

    #[test]
    fn save_then_load_round_trips_the_persisted_subset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        save(&path, &populated_store()).unwrap();
        let state = load(&path).unwrap().into_state();

        assert_eq!(state.shop.cart.len(), 1);
        assert_eq!(
            state.auth.session.as_ref().map(|s| s.token.as_str()),
            Some("jwt-token")
        );
        // Catalog comes back empty; it is never persisted.
        assert!(state.shop.products.is_empty());
    }

    #[test]
    fn state_file_holds_exactly_the_three_persisted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save(&path, &populated_store()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let mut keys: Vec<_> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["cart", "session", "site_config"]);
    }
}
