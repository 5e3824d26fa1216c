//! Command implementations behind the `terracota` binary.
//!
//! Every command runs against a [`CliContext`]: the API client, the store
//! hydrated from the state file, and the resolved configuration. `main`
//! writes the snapshot back after the command settles, so a forced logout
//! sticks even when the command itself failed.
//!
//! Failed operations are reported with the Spanish message the operation
//! recorded in the store, which is the same text a graphical frontend would
//! show as a toast.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod shop;

use terracota_client::store::{AuthOp, ShopOp};
use terracota_client::{ApiClient, Store, ops, persist};
use terracota_core::checkout::CheckoutError;
use terracota_core::validate::FieldError;
use terracota_core::{Category, CategoryId, Product, ProductId};

use crate::config::{CliConfig, ConfigError};

/// Errors a command can settle with. [`CommandError::Operation`] carries
/// user-facing Spanish text; the rest delegate to their sources.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A rejected operation, with the message the operation recorded.
    #[error("{0}")]
    Operation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persist(#[from] persist::PersistError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("No se pudo leer \"{path}\": {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("No se pudo leer la contraseña: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Everything a command needs to run.
pub struct CliContext {
    pub api: ApiClient,
    pub store: Store,
    pub config: CliConfig,
}

impl CliContext {
    /// Resolve the configuration and hydrate the store from the state file.
    pub fn load() -> Result<Self, CommandError> {
        let config = CliConfig::from_env()?;
        let persisted = persist::load(&config.state_path)?;
        Ok(Self {
            api: ApiClient::new(config.api_url.as_str()),
            store: Store::from_state(persisted.into_state()),
            config,
        })
    }

    /// Write the persisted subset of the store back to the state file.
    pub fn save(&self) -> Result<(), CommandError> {
        persist::save(&self.config.state_path, &self.store)?;
        Ok(())
    }
}

/// The Spanish rejection message a failed shop operation left in the store.
pub(crate) fn shop_failure(store: &Store, op: ShopOp) -> CommandError {
    CommandError::Operation(store.shop_status(op).message)
}

/// The Spanish rejection message a failed auth operation left in the store.
pub(crate) fn auth_failure(store: &Store, op: AuthOp) -> CommandError {
    CommandError::Operation(store.auth_status(op).message)
}

/// Client-side validation failure, joined the way the forms report it.
pub(crate) fn validation_failure(errors: &[FieldError]) -> CommandError {
    let messages: Vec<&str> = errors.iter().map(|error| error.message.as_str()).collect();
    CommandError::Operation(messages.join("; "))
}

/// Fetch the product list unless the store already has it.
pub(crate) async fn ensure_products(ctx: &CliContext) -> Result<(), CommandError> {
    if ctx.store.snapshot().shop.products.is_empty() {
        ops::fetch_products(&ctx.api, &ctx.store)
            .await
            .map_err(|_| shop_failure(&ctx.store, ShopOp::FetchProducts))?;
    }
    Ok(())
}

/// Fetch the category list unless the store already has it.
pub(crate) async fn ensure_categories(ctx: &CliContext) -> Result<(), CommandError> {
    if ctx.store.snapshot().shop.categories.is_empty() {
        ops::fetch_categories(&ctx.api, &ctx.store)
            .await
            .map_err(|_| shop_failure(&ctx.store, ShopOp::FetchCategories))?;
    }
    Ok(())
}

/// Look a product up by id, fetching the catalog if needed.
pub(crate) async fn resolve_product(ctx: &CliContext, id: i32) -> Result<Product, CommandError> {
    ensure_products(ctx).await?;
    let id = ProductId::new(id);
    ctx.store
        .snapshot()
        .shop
        .products
        .into_iter()
        .find(|product| product.id == id)
        .ok_or_else(|| CommandError::Operation(format!("Producto no encontrado (#{id}).")))
}

/// Look a category up by id, fetching the list if needed.
pub(crate) async fn resolve_category(ctx: &CliContext, id: i32) -> Result<Category, CommandError> {
    ensure_categories(ctx).await?;
    let id = CategoryId::new(id);
    ctx.store
        .snapshot()
        .shop
        .categories
        .into_iter()
        .find(|category| category.id == id)
        .ok_or_else(|| CommandError::Operation(format!("Categoría no encontrada (#{id}).")))
}
