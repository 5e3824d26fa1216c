//! Terracota Core - Shared domain library.
//!
//! This crate provides the domain logic used across all Terracota components:
//! - `client` - Typed API client, store container, and async operations
//! - `server` - Public/admin JSON API in front of the hosted backend
//! - `cli` - Command-line storefront and administration tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no async. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Domain types: ids, products, categories, cart, site config
//! - [`catalog`] - Filter/sort/paginate queries over the in-memory catalog
//! - [`checkout`] - WhatsApp order-message and deep-link builders
//! - [`validate`] - Field validators shared by forms and the API boundary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod types;
pub mod validate;

pub use types::*;
