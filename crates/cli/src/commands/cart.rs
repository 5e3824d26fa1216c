//! Cart commands. Everything here is local state except the catalog lookup
//! behind `add`; mutations only become durable when `main` saves the
//! snapshot.

use terracota_core::{ProductId, format_ars};

use super::{CliContext, CommandError, resolve_product};

/// `terracota cart add <id>` - snapshot the product into the cart.
pub async fn add(ctx: &CliContext, id: i32) -> Result<(), CommandError> {
    let product = resolve_product(ctx, id).await?;
    ctx.store.add_to_cart(&product);

    let count = ctx
        .store
        .snapshot()
        .shop
        .cart
        .find(product.id)
        .map_or(1, |line| line.count);
    println!("{} agregado al carrito (×{count}).", product.name);
    Ok(())
}

/// `terracota cart remove <id>` - drop the whole line.
pub fn remove(ctx: &CliContext, id: i32) {
    let id = ProductId::new(id);
    let cart = ctx.store.snapshot().shop.cart;
    let Some(line) = cart.find(id).cloned() else {
        println!("El producto #{id} no está en el carrito.");
        return;
    };

    ctx.store.remove_from_cart(id);
    println!("{} eliminado del carrito.", line.name);
}

/// `terracota cart increment <id>` - one more unit.
pub fn increment(ctx: &CliContext, id: i32) {
    let id = ProductId::new(id);
    let cart = ctx.store.snapshot().shop.cart;
    let Some(line) = cart.find(id).cloned() else {
        println!("El producto #{id} no está en el carrito.");
        return;
    };

    ctx.store.increment_cart_item(id);
    println!("{}: ×{}.", line.name, line.count + 1);
}

/// `terracota cart decrement <id>` - one unit less, never below one.
pub fn decrement(ctx: &CliContext, id: i32) {
    let id = ProductId::new(id);
    let cart = ctx.store.snapshot().shop.cart;
    let Some(line) = cart.find(id).cloned() else {
        println!("El producto #{id} no está en el carrito.");
        return;
    };

    if line.count == 1 {
        println!(
            "{} ya está en ×1. Para quitarlo: terracota cart remove {}",
            line.name,
            id.as_i32()
        );
        return;
    }

    ctx.store.decrement_cart_item(id);
    println!("{}: ×{}.", line.name, line.count - 1);
}

/// `terracota cart show` - lines and total.
pub fn show(ctx: &CliContext) {
    let cart = ctx.store.snapshot().shop.cart;
    if cart.is_empty() {
        println!("El carrito está vacío.");
        return;
    }

    let label = if cart.len() == 1 { "producto" } else { "productos" };
    println!("Carrito: {} {label}", cart.len());
    println!();
    println!("{:>6}  {:<35} {:>10}  {:>12}", "Cant.", "Producto", "Unitario", "Subtotal");
    for line in cart.lines() {
        println!(
            "{:>6}  {:<35} {:>10}  {:>12}",
            line.count,
            line.name,
            format_ars(line.price),
            format_ars(line.subtotal()),
        );
    }
    println!();
    println!("Total: {}", format_ars(cart.total()));
}

/// `terracota cart clear` - start over.
pub fn clear(ctx: &CliContext) {
    ctx.store.set_cart(Vec::new());
    println!("Carrito vaciado.");
}
