//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::supabase::Supabase;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the Supabase client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    supabase: Supabase,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let supabase = Supabase::new(&config.supabase);

        Self {
            inner: Arc::new(AppStateInner { config, supabase }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the Supabase client.
    #[must_use]
    pub fn supabase(&self) -> &Supabase {
        &self.inner.supabase
    }
}
