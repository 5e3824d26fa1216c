//! Terracota API server library.
//!
//! This crate provides the server functionality as a library, allowing
//! the router to be mounted in tests exactly as the binary runs it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod supabase;

pub use config::ServerConfig;
pub use error::AppError;
pub use state::AppState;
