//! Core types for Terracota.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod category;
pub mod config;
pub mod id;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use cart::{Cart, CartLine};
pub use category::{Category, CategoryPayload};
pub use config::{ContactInfo, SiteConfig, SocialLinks};
pub use id::*;
pub use price::format_ars;
pub use product::{Product, ProductPayload};
pub use status::{OpPhase, OpStatus};
pub use user::{Credentials, Role, Session, User};
