//! Terracota Client - Typed API client and application state.
//!
//! Everything a frontend (today: the CLI) needs to talk to the Terracota
//! API and hold its state:
//!
//! - [`http`] - Thin `reqwest` wrapper with error classification
//! - [`api`] - Typed endpoint bindings (products, categories, auth, config, images)
//! - [`store`] - In-memory state container with reducer-style mutations
//! - [`ops`] - Async operations that call the API and record per-operation status
//! - [`persist`] - Snapshot persistence (cart, session, site config)
//!
//! # Design notes
//!
//! The [`store::Store`] is explicitly constructed and injectable - there is
//! no global state. Operations take the client and the store as arguments,
//! record a `Pending`/`Fulfilled`/`Rejected` status in the owning slice, and
//! apply the state change on success. A 401 classified as an expired session
//! clears the session through a single funnel; network failures never do.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod http;
pub mod ops;
pub mod persist;
pub mod store;

pub use error::ApiError;
pub use http::ApiClient;
pub use store::Store;
