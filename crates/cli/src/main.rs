//! Terracota CLI - storefront browsing, cart, checkout, and administration.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! terracota shop products --search taza --sort price-asc
//!
//! # Build a cart and check out over WhatsApp
//! terracota cart add 12
//! terracota cart add 7
//! terracota checkout
//!
//! # Administer the catalog (the session persists between invocations)
//! terracota admin login -e duena@taller.com
//! terracota admin products list --page 2
//! ```
//!
//! # Commands
//!
//! - `shop` - Browse products and categories
//! - `cart` - Manage the local cart
//! - `checkout` / `contact` - WhatsApp deep links
//! - `admin` - Session, catalog CRUD, site configuration, image uploads
//!
//! The cart, the admin session, and the last-seen site configuration
//! persist in a JSON state file between invocations; see [`config`] for the
//! environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use terracota_core::catalog::SortKey;
use terracota_core::{CategoryPayload, ProductPayload};

mod commands;
mod config;

use commands::admin::{ConfigChanges, ProductChanges};
use commands::{CliContext, CommandError};

#[derive(Parser)]
#[command(name = "terracota")]
#[command(version, about = "Terracota storefront and admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the public catalog
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Build the WhatsApp order link for the current cart
    Checkout,
    /// Print the WhatsApp contact link
    Contact,
    /// Administer the shop
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// List products with filters, sorting, and pagination
    Products {
        /// Case-insensitive search over name, description, and category
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category name filter
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured products
        #[arg(short, long)]
        featured: bool,

        /// Sort order (`featured`, `price-asc`, `price-desc`, `name-asc`,
        /// `name-desc`, `id-asc`, `id-desc`)
        #[arg(long, default_value_t = SortKey::Featured)]
        sort: SortKey,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List categories
    Categories,
    /// Show one product in full
    Show {
        /// Product id
        id: i32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart (or one more unit of it)
    Add {
        /// Product id
        id: i32,
    },
    /// Remove a product from the cart entirely
    Remove {
        /// Product id
        id: i32,
    },
    /// Increase a line's quantity by one
    Increment {
        /// Product id
        id: i32,
    },
    /// Decrease a line's quantity by one (never below one)
    Decrement {
        /// Product id
        id: i32,
    },
    /// Show the cart lines and the total
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Sign in and store the session
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Check that the stored session is still valid
    Verify,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: AdminProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: AdminCategoryAction,
    },
    /// Show or edit the site configuration
    Config {
        #[command(subcommand)]
        action: AdminConfigAction,
    },
    /// Upload and delete product images
    Images {
        #[command(subcommand)]
        action: AdminImageAction,
    },
}

#[derive(Subcommand)]
enum AdminProductAction {
    /// Product table with admin sorting and paging
    List {
        /// Case-insensitive search over name, description, and category
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category name filter
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured products
        #[arg(short, long)]
        featured: bool,

        /// Sort order (`featured`, `price-asc`, `price-desc`, `name-asc`,
        /// `name-desc`, `id-asc`, `id-desc`)
        #[arg(long, default_value_t = SortKey::IdDesc)]
        sort: SortKey,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a product
    Create {
        /// Product name
        #[arg(long)]
        name: String,

        /// Price in pesos (e.g. 4500 or 4500.50)
        #[arg(long)]
        price: Decimal,

        /// Product description
        #[arg(long)]
        description: String,

        /// Category name
        #[arg(long)]
        category: String,

        /// Gallery image URL; repeat up to five times, the first becomes
        /// the cover
        #[arg(long = "image", required = true)]
        images: Vec<String>,

        /// Units in stock
        #[arg(long, default_value_t = 999)]
        stock: i32,

        /// Mark the product as featured
        #[arg(long)]
        featured: bool,
    },
    /// Update fields of an existing product
    Update {
        /// Product id
        id: i32,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New price in pesos
        #[arg(long)]
        price: Option<Decimal>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New category name
        #[arg(long)]
        category: Option<String>,

        /// Replacement gallery image URL; repeat to replace the whole
        /// gallery
        #[arg(long = "image")]
        images: Vec<String>,

        /// New stock count
        #[arg(long)]
        stock: Option<i32>,

        /// Featured flag (`true` or `false`)
        #[arg(long)]
        featured: Option<bool>,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: i32,
    },
}

#[derive(Subcommand)]
enum AdminCategoryAction {
    /// List every category
    List,
    /// Create a category
    Create {
        /// Category name
        #[arg(long)]
        name: String,

        /// Cover image URL
        #[arg(long)]
        image: String,
    },
    /// Update an existing category
    Update {
        /// Category id
        id: i32,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New cover image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a category (refused while products still use it)
    Delete {
        /// Category id
        id: i32,
    },
}

#[derive(Subcommand)]
enum AdminConfigAction {
    /// Print the current site configuration
    Show,
    /// Update site configuration fields
    Set {
        /// Instagram profile URL
        #[arg(long)]
        instagram: Option<String>,

        /// Facebook page URL
        #[arg(long)]
        facebook: Option<String>,

        /// Twitter profile URL
        #[arg(long)]
        twitter: Option<String>,

        /// LinkedIn profile URL
        #[arg(long)]
        linkedin: Option<String>,

        /// TikTok profile URL
        #[arg(long)]
        tiktok: Option<String>,

        /// WhatsApp number for checkout and contact
        #[arg(long)]
        whatsapp: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        /// Contact phone
        #[arg(long)]
        phone: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminImageAction {
    /// Upload image files (up to five, in parallel)
    Upload {
        /// Paths of the image files
        #[arg(required = true, num_args = 1..=5)]
        paths: Vec<PathBuf>,

        /// Bucket folder to upload into (default: products)
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Delete an uploaded image by its public URL
    Delete {
        /// Public URL returned by the upload
        url: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = CliContext::load()?;
    let result = dispatch(&ctx, cli.command).await;

    // The forced-logout funnel may have cleared the session even when the
    // command failed, so the snapshot is written either way.
    let saved = ctx.save();
    result?;
    saved?;
    Ok(())
}

async fn dispatch(ctx: &CliContext, command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Shop { action } => shop_command(ctx, action).await,
        Commands::Cart { action } => cart_command(ctx, action).await,
        Commands::Checkout => commands::checkout::checkout(ctx).await,
        Commands::Contact => commands::checkout::contact(ctx).await,
        Commands::Admin { action } => admin_command(ctx, action).await,
    }
}

async fn shop_command(ctx: &CliContext, action: ShopAction) -> Result<(), CommandError> {
    match action {
        ShopAction::Products {
            search,
            category,
            featured,
            sort,
            page,
        } => commands::shop::products(ctx, search, category, featured, sort, page).await,
        ShopAction::Categories => commands::shop::categories(ctx).await,
        ShopAction::Show { id } => commands::shop::show(ctx, id).await,
    }
}

async fn cart_command(ctx: &CliContext, action: CartAction) -> Result<(), CommandError> {
    match action {
        CartAction::Add { id } => commands::cart::add(ctx, id).await,
        CartAction::Remove { id } => {
            commands::cart::remove(ctx, id);
            Ok(())
        }
        CartAction::Increment { id } => {
            commands::cart::increment(ctx, id);
            Ok(())
        }
        CartAction::Decrement { id } => {
            commands::cart::decrement(ctx, id);
            Ok(())
        }
        CartAction::Show => {
            commands::cart::show(ctx);
            Ok(())
        }
        CartAction::Clear => {
            commands::cart::clear(ctx);
            Ok(())
        }
    }
}

async fn admin_command(ctx: &CliContext, action: AdminAction) -> Result<(), CommandError> {
    match action {
        AdminAction::Login { email, password } => {
            commands::admin::login(ctx, email, password).await
        }
        AdminAction::Logout => {
            commands::admin::logout(ctx);
            Ok(())
        }
        AdminAction::Verify => commands::admin::verify(ctx).await,
        AdminAction::Products { action } => admin_products(ctx, action).await,
        AdminAction::Categories { action } => admin_categories(ctx, action).await,
        AdminAction::Config { action } => admin_config(ctx, action).await,
        AdminAction::Images { action } => admin_images(ctx, action).await,
    }
}

async fn admin_products(ctx: &CliContext, action: AdminProductAction) -> Result<(), CommandError> {
    match action {
        AdminProductAction::List {
            search,
            category,
            featured,
            sort,
            page,
        } => commands::admin::list_products(ctx, search, category, featured, sort, page).await,
        AdminProductAction::Create {
            name,
            price,
            description,
            category,
            images,
            stock,
            featured,
        } => {
            let payload = ProductPayload {
                id: None,
                name,
                image: String::new(), // filled from images[0] by normalize()
                images,
                price,
                description,
                category,
                stock,
                featured,
            };
            commands::admin::create_product(ctx, payload).await
        }
        AdminProductAction::Update {
            id,
            name,
            price,
            description,
            category,
            images,
            stock,
            featured,
        } => {
            let changes = ProductChanges {
                name,
                price,
                description,
                category,
                images,
                stock,
                featured,
            };
            commands::admin::update_product(ctx, id, changes).await
        }
        AdminProductAction::Delete { id } => commands::admin::delete_product(ctx, id).await,
    }
}

async fn admin_categories(
    ctx: &CliContext,
    action: AdminCategoryAction,
) -> Result<(), CommandError> {
    match action {
        AdminCategoryAction::List => commands::admin::list_categories(ctx).await,
        AdminCategoryAction::Create { name, image } => {
            let payload = CategoryPayload {
                id: None,
                name,
                image,
            };
            commands::admin::create_category(ctx, payload).await
        }
        AdminCategoryAction::Update { id, name, image } => {
            commands::admin::update_category(ctx, id, name, image).await
        }
        AdminCategoryAction::Delete { id } => commands::admin::delete_category(ctx, id).await,
    }
}

async fn admin_config(ctx: &CliContext, action: AdminConfigAction) -> Result<(), CommandError> {
    match action {
        AdminConfigAction::Show => commands::admin::show_config(ctx).await,
        AdminConfigAction::Set {
            instagram,
            facebook,
            twitter,
            linkedin,
            tiktok,
            whatsapp,
            email,
            phone,
            address,
        } => {
            let changes = ConfigChanges {
                instagram,
                facebook,
                twitter,
                linkedin,
                tiktok,
                whatsapp,
                email,
                phone,
                address,
            };
            commands::admin::set_config(ctx, changes).await
        }
    }
}

async fn admin_images(ctx: &CliContext, action: AdminImageAction) -> Result<(), CommandError> {
    match action {
        AdminImageAction::Upload { paths, folder } => {
            commands::admin::upload_images(ctx, paths, folder).await
        }
        AdminImageAction::Delete { url } => commands::admin::delete_image(ctx, &url).await,
    }
}
