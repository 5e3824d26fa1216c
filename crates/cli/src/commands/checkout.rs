//! WhatsApp checkout and contact links.
//!
//! Both commands refetch the site configuration first; a stale WhatsApp
//! number would send the order to the wrong chat.

use terracota_client::ops;
use terracota_client::store::AuthOp;
use terracota_core::checkout::{CONTACT_GREETING, contact_link, order_link};

use super::{CliContext, CommandError, auth_failure};

/// `terracota checkout` - render the order and the `wa.me` link for the
/// current cart.
pub async fn checkout(ctx: &CliContext) -> Result<(), CommandError> {
    let cart = ctx.store.snapshot().shop.cart;
    if cart.is_empty() {
        // The storefront hides checkout for an empty cart; here it is a
        // quiet no-op instead of an error.
        println!("El carrito está vacío.");
        return Ok(());
    }

    ops::fetch_site_config(&ctx.api, &ctx.store)
        .await
        .map_err(|_| auth_failure(&ctx.store, AuthOp::FetchConfig))?;
    let config = ctx.store.snapshot().auth.site_config;

    let link = order_link(&ctx.config.store_name, &cart, &config)?;
    println!("{}", link.message);
    println!();
    println!("Enlace de WhatsApp:");
    println!("{}", link.url);
    Ok(())
}

/// `terracota contact` - the fixed-greeting contact link.
pub async fn contact(ctx: &CliContext) -> Result<(), CommandError> {
    ops::fetch_site_config(&ctx.api, &ctx.store)
        .await
        .map_err(|_| auth_failure(&ctx.store, AuthOp::FetchConfig))?;
    let config = ctx.store.snapshot().auth.site_config;

    let link = contact_link(&config)?;
    println!("{CONTACT_GREETING}");
    println!();
    println!("Enlace de WhatsApp:");
    println!("{link}");
    Ok(())
}
