//! Admin commands: session, catalog CRUD, site configuration, and images.
//!
//! # Usage
//!
//! ```bash
//! # Sign in once; the session persists between invocations
//! terracota admin login -e duena@taller.com
//!
//! # Upload images, then use the URLs in a product
//! terracota admin images upload taza-azul.jpg taza-azul-detalle.jpg
//! terracota admin products create --name "Taza Azul" --price 4500 \
//!     --description "Taza de gres esmaltada a mano" --category Tazas \
//!     --image https://cdn.example.com/images/products/taza-azul.jpg
//! ```
//!
//! Mutating commands send the stored bearer token; when the API rejects it
//! the session is cleared and the next invocation starts logged out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use terracota_client::api::images::ImageFile;
use terracota_client::ops;
use terracota_client::store::{AuthOp, ShopOp};
use terracota_core::catalog::{CatalogPage, CatalogQuery, SortKey};
use terracota_core::{
    CategoryId, CategoryPayload, Credentials, ProductId, ProductPayload, SiteConfig, format_ars,
};

use super::{
    CliContext, CommandError, auth_failure, ensure_products, resolve_category, resolve_product,
    shop_failure, validation_failure,
};

// =============================================================================
// Session
// =============================================================================

/// `terracota admin login` - sign in and store the session.
pub async fn login(
    ctx: &CliContext,
    email: String,
    password: Option<String>,
) -> Result<(), CommandError> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let credentials = Credentials { email, password };
    let session = ops::login(&ctx.api, &ctx.store, &credentials)
        .await
        .map_err(|_| auth_failure(&ctx.store, AuthOp::Login))?;

    println!("Login exitoso: {} <{}>", session.user.name, session.user.email);
    Ok(())
}

/// `terracota admin logout` - drop the stored session.
pub fn logout(ctx: &CliContext) {
    if ctx.store.is_authenticated() {
        ctx.store.logout();
        println!("Sesión cerrada.");
    } else {
        println!("No hay sesión activa.");
    }
}

/// `terracota admin verify` - check that the stored session still holds.
pub async fn verify(ctx: &CliContext) -> Result<(), CommandError> {
    match ops::verify_session(&ctx.api, &ctx.store).await {
        Ok(Some(user)) => {
            println!("Sesión válida: {} <{}>", user.name, user.email);
            Ok(())
        }
        Ok(None) => Err(CommandError::Operation(
            "No hay sesión activa. Inicia sesión con `terracota admin login`.".to_owned(),
        )),
        Err(_) => Err(auth_failure(&ctx.store, AuthOp::Verify)),
    }
}

fn prompt_password() -> Result<String, CommandError> {
    // Plain stdin read; the terminal echoes what is typed.
    eprint!("Contraseña: ");
    let mut password = String::new();
    io::stdin()
        .read_line(&mut password)
        .map_err(CommandError::Prompt)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_owned())
}

// =============================================================================
// Products
// =============================================================================

/// Field overrides for `admin products update`; unset fields keep the
/// product's current value.
#[derive(Debug, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// A non-empty list replaces the whole gallery.
    pub images: Vec<String>,
    pub stock: Option<i32>,
    pub featured: Option<bool>,
}

/// `terracota admin products list` - the admin table, ten per page.
pub async fn list_products(
    ctx: &CliContext,
    search: Option<String>,
    category: Option<String>,
    featured: bool,
    sort: SortKey,
    page: usize,
) -> Result<(), CommandError> {
    ensure_products(ctx).await?;

    let mut query = CatalogQuery::admin();
    if let Some(search) = search {
        query.set_search(search);
    }
    query.set_category(category);
    query.set_featured_only(featured);
    query.set_sort(sort);
    // Filter setters reset the page, so it goes last.
    query.set_page(page);

    print_product_table(&query.run(&ctx.store.snapshot().shop.products));
    Ok(())
}

/// `terracota admin products create`.
pub async fn create_product(
    ctx: &CliContext,
    mut payload: ProductPayload,
) -> Result<(), CommandError> {
    // The admin form keeps the cover mirrored on images[0] before submitting.
    payload.normalize();
    if let Err(errors) = payload.validate() {
        return Err(validation_failure(&errors));
    }

    let product = ops::create_product(&ctx.api, &ctx.store, &payload)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::CreateProduct))?;

    println!("Producto creado exitosamente: {} (#{})", product.name, product.id);
    Ok(())
}

/// `terracota admin products update <id>` - merge the overrides into the
/// current product and resubmit it whole.
pub async fn update_product(
    ctx: &CliContext,
    id: i32,
    changes: ProductChanges,
) -> Result<(), CommandError> {
    let product = resolve_product(ctx, id).await?;
    let mut payload = ProductPayload::from(product);
    apply_product_changes(&mut payload, changes);

    payload.normalize();
    if let Err(errors) = payload.validate() {
        return Err(validation_failure(&errors));
    }

    let product = ops::update_product(&ctx.api, &ctx.store, &payload)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::UpdateProduct))?;

    println!(
        "Producto actualizado exitosamente: {} (#{})",
        product.name, product.id
    );
    Ok(())
}

/// `terracota admin products delete <id>`.
pub async fn delete_product(ctx: &CliContext, id: i32) -> Result<(), CommandError> {
    ops::delete_product(&ctx.api, &ctx.store, ProductId::new(id))
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::DeleteProduct))?;

    println!("Producto eliminado exitosamente (#{id}).");
    Ok(())
}

fn apply_product_changes(payload: &mut ProductPayload, changes: ProductChanges) {
    if let Some(name) = changes.name {
        payload.name = name;
    }
    if let Some(price) = changes.price {
        payload.price = price;
    }
    if let Some(description) = changes.description {
        payload.description = description;
    }
    if let Some(category) = changes.category {
        payload.category = category;
    }
    if !changes.images.is_empty() {
        payload.images = changes.images;
    }
    if let Some(stock) = changes.stock {
        payload.stock = stock;
    }
    if let Some(featured) = changes.featured {
        payload.featured = featured;
    }
}

fn print_product_table(page: &CatalogPage) {
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
    println!(
        "{:>5}  {:<35} {:>10} {:>6}  {}",
        "ID", "Nombre", "Precio", "Stock", "Categoría"
    );
    for product in &page.items {
        let mark = if product.featured { "  ★" } else { "" };
        println!(
            "{:>5}  {:<35} {:>10} {:>6}  {}{mark}",
            product.id.as_i32(),
            product.name,
            format_ars(product.price),
            product.stock,
            product.category,
        );
    }
}

// =============================================================================
// Categories
// =============================================================================

/// `terracota admin categories list`.
pub async fn list_categories(ctx: &CliContext) -> Result<(), CommandError> {
    ops::fetch_categories(&ctx.api, &ctx.store)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::FetchCategories))?;

    let categories = ctx.store.snapshot().shop.categories;
    if categories.is_empty() {
        println!("No hay categorías todavía.");
        return Ok(());
    }

    println!("{:>5}  {:<25} {}", "ID", "Nombre", "Imagen");
    for category in &categories {
        println!(
            "{:>5}  {:<25} {}",
            category.id.as_i32(),
            category.name,
            category.image
        );
    }
    Ok(())
}

/// `terracota admin categories create`.
pub async fn create_category(
    ctx: &CliContext,
    payload: CategoryPayload,
) -> Result<(), CommandError> {
    if let Err(errors) = payload.validate() {
        return Err(validation_failure(&errors));
    }

    let category = ops::create_category(&ctx.api, &ctx.store, &payload)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::CreateCategory))?;

    println!(
        "Categoría creada exitosamente: {} (#{})",
        category.name, category.id
    );
    Ok(())
}

/// `terracota admin categories update <id>`.
pub async fn update_category(
    ctx: &CliContext,
    id: i32,
    name: Option<String>,
    image: Option<String>,
) -> Result<(), CommandError> {
    let category = resolve_category(ctx, id).await?;
    let mut payload = CategoryPayload::from(category);
    if let Some(name) = name {
        payload.name = name;
    }
    if let Some(image) = image {
        payload.image = image;
    }

    if let Err(errors) = payload.validate() {
        return Err(validation_failure(&errors));
    }

    let category = ops::update_category(&ctx.api, &ctx.store, &payload)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::UpdateCategory))?;

    println!(
        "Categoría actualizada exitosamente: {} (#{})",
        category.name, category.id
    );
    Ok(())
}

/// `terracota admin categories delete <id>`. The API refuses while any
/// product still references the category.
pub async fn delete_category(ctx: &CliContext, id: i32) -> Result<(), CommandError> {
    ops::delete_category(&ctx.api, &ctx.store, CategoryId::new(id))
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::DeleteCategory))?;

    println!("Categoría eliminada exitosamente (#{id}).");
    Ok(())
}

// =============================================================================
// Site configuration
// =============================================================================

/// Field overrides for `admin config set`; unset fields keep their current
/// value.
#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// `terracota admin config show`.
pub async fn show_config(ctx: &CliContext) -> Result<(), CommandError> {
    ops::fetch_site_config(&ctx.api, &ctx.store)
        .await
        .map_err(|_| auth_failure(&ctx.store, AuthOp::FetchConfig))?;

    print_config(&ctx.store.snapshot().auth.site_config);
    Ok(())
}

/// `terracota admin config set` - merge the overrides into what the backend
/// has and resubmit the whole record.
pub async fn set_config(ctx: &CliContext, changes: ConfigChanges) -> Result<(), CommandError> {
    ops::fetch_site_config(&ctx.api, &ctx.store)
        .await
        .map_err(|_| auth_failure(&ctx.store, AuthOp::FetchConfig))?;

    let mut config = ctx.store.snapshot().auth.site_config;
    apply_config_changes(&mut config, changes);

    ops::update_site_config(&ctx.api, &ctx.store, &config)
        .await
        .map_err(|_| auth_failure(&ctx.store, AuthOp::UpdateConfig))?;

    println!("Configuración actualizada exitosamente.");
    Ok(())
}

fn apply_config_changes(config: &mut SiteConfig, changes: ConfigChanges) {
    if let Some(instagram) = changes.instagram {
        config.social_media.instagram = instagram;
    }
    if let Some(facebook) = changes.facebook {
        config.social_media.facebook = facebook;
    }
    if let Some(twitter) = changes.twitter {
        config.social_media.twitter = twitter;
    }
    if let Some(linkedin) = changes.linkedin {
        config.social_media.linkedin = linkedin;
    }
    if let Some(tiktok) = changes.tiktok {
        config.social_media.tiktok = tiktok;
    }
    if let Some(whatsapp) = changes.whatsapp {
        config.social_media.whatsapp = whatsapp;
    }
    if let Some(email) = changes.email {
        config.contact.email = email;
    }
    if let Some(phone) = changes.phone {
        config.contact.phone = phone;
    }
    if let Some(address) = changes.address {
        config.contact.address = address;
    }
}

fn print_config(config: &SiteConfig) {
    println!("Redes sociales:");
    print_field("instagram", &config.social_media.instagram);
    print_field("facebook", &config.social_media.facebook);
    print_field("twitter", &config.social_media.twitter);
    print_field("linkedin", &config.social_media.linkedin);
    print_field("tiktok", &config.social_media.tiktok);
    print_field("whatsapp", &config.social_media.whatsapp);
    println!();
    println!("Contacto:");
    print_field("email", &config.contact.email);
    print_field("teléfono", &config.contact.phone);
    print_field("dirección", &config.contact.address);
}

fn print_field(label: &str, value: &str) {
    let shown = if value.is_empty() {
        "(sin configurar)"
    } else {
        value
    };
    println!("  {label:<10} {shown}");
}

// =============================================================================
// Images
// =============================================================================

/// `terracota admin images upload <paths…>` - up to five files in parallel,
/// tolerating partial failure.
pub async fn upload_images(
    ctx: &CliContext,
    paths: Vec<PathBuf>,
    folder: Option<String>,
) -> Result<(), CommandError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        files.push(read_image(path)?);
    }

    let outcome = ops::upload_images(&ctx.api, &ctx.store, files, folder.as_deref()).await;
    for url in &outcome.urls {
        println!("Subida: {url}");
    }
    for error in &outcome.errors {
        println!("Error: {error}");
    }

    if outcome.urls.is_empty() {
        return Err(CommandError::Operation(
            "No se pudo subir ninguna imagen.".to_owned(),
        ));
    }
    Ok(())
}

/// `terracota admin images delete <url>`.
pub async fn delete_image(ctx: &CliContext, url: &str) -> Result<(), CommandError> {
    ops::delete_image(&ctx.api, &ctx.store, url)
        .await
        .map_err(|_| shop_failure(&ctx.store, ShopOp::DeleteImage))?;

    println!("Imagen eliminada exitosamente.");
    Ok(())
}

/// Read a file into an [`ImageFile`], guessing the MIME type from the
/// extension. An unknown extension yields an empty type, which the upload
/// precheck rejects before any request goes out.
fn read_image(path: &Path) -> Result<ImageFile, CommandError> {
    let bytes = fs::read(path).map_err(|source| CommandError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    let name = path.file_name().map_or_else(
        || "archivo".to_owned(),
        |name| name.to_string_lossy().into_owned(),
    );
    let content_type = mime_guess::from_path(path)
        .first()
        .map_or_else(String::new, |mime| mime.essence_str().to_owned());

    Ok(ImageFile {
        name,
        content_type,
        bytes,
    })
}

// =============================================================================
// Tests
// =============================================================================
