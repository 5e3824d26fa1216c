//! Public storefront browsing: the catalog as the shopper sees it.

use terracota_client::ops;
use terracota_client::store::ShopOp;
use terracota_core::catalog::{CatalogPage, CatalogQuery, SortKey};
use terracota_core::format_ars;

use super::{CliContext, CommandError, ensure_products, resolve_product, shop_failure};

/// `terracota shop products` - the storefront grid, twelve per page.
pub async fn products(
    ctx: &CliContext,
    search: Option<String>,
    category: Option<String>,
    featured: bool,
    sort: SortKey,
    page: usize,
) -> Result<(), CommandError> {
    ensure_products(ctx).await?;

    let mut query = CatalogQuery::storefront();
    if let Some(search) = search {
        query.set_search(search);
    }
    query.set_category(category);
    query.set_featured_only(featured);
    query.set_sort(sort);
    // Filter setters reset the page, so it goes last.
    query.set_page(page);

    print_page(&query.run(&ctx.store.snapshot().shop.products));
    Ok(())
}

/// `terracota shop categories` - every category, as the storefront nav
/// shows them.
pub async fn categories(ctx: &CliContext) -> Result<(), CommandError> {
    ops::fetch_categories(&ctx.api, &ctx.store)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::FetchCategories))?;

    let categories = ctx.store.snapshot().shop.categories;
    if categories.is_empty() {
        println!("No hay categorías todavía.");
        return Ok(());
    }

    println!("Categorías:");
    println!();
    for category in &categories {
        println!("{:>5}  {}", category.id.as_i32(), category.name);
    }
    Ok(())
}

/// `terracota shop show <id>` - one product in full.
pub async fn show(ctx: &CliContext, id: i32) -> Result<(), CommandError> {
    let product = resolve_product(ctx, id).await?;

    println!("{} (#{})", product.name, product.id);
    println!("Precio: {}", format_ars(product.price));
    println!("Categoría: {}", product.category);
    println!("Stock: {}", product.stock);
    if product.featured {
        println!("Destacado: sí");
    }
    println!();
    println!("{}", product.description);
    if !product.images.is_empty() {
        println!();
        println!("Imágenes:");
        for url in &product.images {
            println!("  {url}");
        }
    }
    Ok(())
}

fn print_page(page: &CatalogPage) {
    if page.total_matches == 0 {
        println!("No se encontraron productos.");
        return;
    }

    println!(
        "Productos: página {} de {} ({} en total)",
        page.page, page.total_pages, page.total_matches
    );
    if page.items.is_empty() {
        println!("La página {} está fuera de rango.", page.page);
        return;
    }

    println!();
    println!("{:>5}  {:<35} {:>10}  {}", "ID", "Nombre", "Precio", "Categoría");
    for product in &page.items {
        let mark = if product.featured { "  ★" } else { "" };
        println!(
            "{:>5}  {:<35} {:>10}  {}{mark}",
            product.id.as_i32(),
            product.name,
            format_ars(product.price),
            product.category,
        );
    }
}
