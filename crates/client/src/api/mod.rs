//! Typed bindings for the Terracota API routes.
//!
//! One module per resource, mirroring the route table under `/api`. Each
//! function peels the `{success, ...}` envelope and returns domain types.
//! Admin-only routes take the bearer token explicitly; reads do not.

pub mod auth;
pub mod categories;
pub mod config;
pub mod images;
pub mod products;
