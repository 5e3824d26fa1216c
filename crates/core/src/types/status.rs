//! Async operation status tracking.
//!
//! Every async operation (fetching the catalog, creating a product, logging
//! in) records its lifecycle in the store so the UI can render spinners and
//! result messages without separate local state. Phases are a closed enum;
//! the free-form part is only the user-facing message.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of an async operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OpPhase {
    /// No request issued yet, or the status was cleared.
    #[default]
    Idle,
    /// Request in flight.
    Pending,
    /// Response applied to the store.
    Fulfilled,
    /// Request failed; the collection was not mutated.
    Rejected,
}

/// Status of one async operation: phase plus a user-facing message.
///
/// Messages are the Spanish strings shown to the user
/// ("Producto creado exitosamente"); they are set when the operation
/// settles and empty while it is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OpStatus {
    pub phase: OpPhase,
    pub message: String,
}

impl OpStatus {
    /// Status for a request that just went out.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            phase: OpPhase::Pending,
            message: String::new(),
        }
    }

    /// Status for a request that succeeded.
    #[must_use]
    pub fn fulfilled(message: impl Into<String>) -> Self {
        Self {
            phase: OpPhase::Fulfilled,
            message: message.into(),
        }
    }

    /// Status for a request that failed.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            phase: OpPhase::Rejected,
            message: message.into(),
        }
    }

    /// Whether the operation is currently in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, OpPhase::Pending)
    }
}
