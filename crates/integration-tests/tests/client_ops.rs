//! The client operations layer driven against a live API: status
//! recording, the forced-logout funnel, and partial-failure uploads.

use rust_decimal::Decimal;

use terracota_client::api::images::ImageFile;
use terracota_client::error::NETWORK_ERROR_MESSAGE;
use terracota_client::store::{AuthOp, ShopOp};
use terracota_client::{ApiClient, ApiError, Store, ops};
use terracota_core::{
    CategoryId, ContactInfo, Credentials, OpPhase, ProductPayload, SiteConfig, SocialLinks,
};
use terracota_integration_tests::TestContext;
use terracota_integration_tests::backend::{ADMIN_EMAIL, ADMIN_PASSWORD};
use terracota_server::middleware::auth::SESSION_EXPIRED;

fn api_client(ctx: &TestContext) -> ApiClient {
    ApiClient::new(ctx.api_url.as_str())
}

/// A URL nothing listens on: bind an ephemeral port, then close it.
fn dead_api() -> ApiClient {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    ApiClient::new(format!("http://{addr}"))
}

fn admin_credentials() -> Credentials {
    Credentials {
        email: ADMIN_EMAIL.to_owned(),
        password: ADMIN_PASSWORD.to_owned(),
    }
}

fn product_payload(name: &str) -> ProductPayload {
    ProductPayload {
        id: None,
        name: name.to_owned(),
        image: "https://cdn.example.com/images/products/frente.jpg".to_owned(),
        images: vec![
            "https://cdn.example.com/images/products/frente.jpg".to_owned(),
            "https://cdn.example.com/images/products/detalle.jpg".to_owned(),
        ],
        price: Decimal::from(4500),
        description: "Pieza de gres esmaltada a mano".to_owned(),
        category: "Tazas".to_owned(),
        stock: 999,
        featured: false,
    }
}

fn png_file(name: &str) -> ImageFile {
    ImageFile {
        name: name.to_owned(),
        content_type: "image/png".to_owned(),
        bytes: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn ensure_catalog_fills_an_empty_store() {
    let ctx = TestContext::spawn().await;
    ctx.backend.seed_product("Plato Llano", "Platos", 3200.0);
    ctx.backend.seed_category("Platos");
    let api = api_client(&ctx);
    let store = Store::new();

    ops::ensure_catalog(&api, &store).await.expect("catalog");

    let state = store.snapshot();
    assert_eq!(state.shop.products.len(), 1);
    assert_eq!(state.shop.categories.len(), 1);
    assert_eq!(
        store.shop_status(ShopOp::FetchProducts).phase,
        OpPhase::Fulfilled
    );
    assert_eq!(
        store.shop_status(ShopOp::FetchCategories).phase,
        OpPhase::Fulfilled
    );
}

#[tokio::test]
async fn create_product_appends_to_the_catalog() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    let product = ops::create_product(&api, &store, &product_payload("Taza Esmaltada"))
        .await
        .expect("create");

    assert_eq!(
        product.image,
        "https://cdn.example.com/images/products/frente.jpg"
    );
    assert_eq!(store.snapshot().shop.products.len(), 1);
    let status = store.shop_status(ShopOp::CreateProduct);
    assert_eq!(status.phase, OpPhase::Fulfilled);
    assert_eq!(status.message, "Producto creado exitosamente");
}

#[tokio::test]
async fn a_category_still_in_use_surfaces_the_conflict() {
    let ctx = TestContext::spawn().await;
    let category_id = ctx.backend.seed_category("Tazas");
    ctx.backend.seed_product("Taza Rústica", "Tazas", 4100.0);
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    let err = ops::delete_category(&api, &store, CategoryId::new(category_id))
        .await
        .expect_err("category is referenced");

    assert!(!err.is_auth_expired());
    assert_eq!(
        err.message_or("Error al eliminar categoría"),
        "La categoría está en uso por productos existentes."
    );
    assert_eq!(
        store.shop_status(ShopOp::DeleteCategory).message,
        "La categoría está en uso por productos existentes."
    );
    assert_eq!(ctx.backend.row_count("categories"), 1);
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn login_records_the_session() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();

    let session = ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    assert!(store.is_authenticated());
    assert_eq!(store.token(), Some(session.token.clone()));
    assert!(session.user.role.is_admin());
    let status = store.auth_status(AuthOp::Login);
    assert_eq!(status.phase, OpPhase::Fulfilled);
    assert_eq!(status.message, "Login exitoso");
}

#[tokio::test]
async fn rejected_credentials_are_not_an_expired_session() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    let credentials = Credentials {
        email: ADMIN_EMAIL.to_owned(),
        password: "adivinando-nomas".to_owned(),
    };

    let err = ops::login(&api, &store, &credentials)
        .await
        .expect_err("must reject");

    assert!(!err.is_auth_expired());
    assert!(!store.is_authenticated());
    let status = store.auth_status(AuthOp::Login);
    assert_eq!(status.phase, OpPhase::Rejected);
    assert_eq!(status.message, "Credenciales incorrectas");
}

#[tokio::test]
async fn invalid_credentials_never_reach_the_network() {
    let store = Store::new();
    let credentials = Credentials {
        email: "no-es-un-email".to_owned(),
        password: String::new(),
    };

    // A dead base URL proves validation fails before any request goes out
    let err = ops::login(&dead_api(), &store, &credentials)
        .await
        .expect_err("must reject");

    assert!(matches!(err, ApiError::Invalid(_)));
    assert_eq!(
        store.auth_status(AuthOp::Login).message,
        "Email inválido; Contraseña requerida"
    );
}

#[tokio::test]
async fn an_expired_session_forces_a_logout() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");
    let token = store.token().expect("token");
    ctx.backend.revoke_token(&token);

    let err = ops::create_product(&api, &store, &product_payload("Taza Esmaltada"))
        .await
        .expect_err("expired token must fail");

    assert!(err.is_auth_expired());
    assert!(!store.is_authenticated());
    assert_eq!(
        store.shop_status(ShopOp::CreateProduct).message,
        SESSION_EXPIRED
    );
}

#[tokio::test]
async fn network_failures_never_log_out() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    let err = ops::fetch_products(&dead_api(), &store)
        .await
        .expect_err("nothing listens there");

    assert!(matches!(err, ApiError::Network(_)));
    assert!(store.is_authenticated());
    assert_eq!(
        store.shop_status(ShopOp::FetchProducts).message,
        NETWORK_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn verify_drops_a_session_the_api_rejects() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();

    // Nothing stored yet, nothing to verify
    let verified = ops::verify_session(&api, &store).await.expect("no-op");
    assert!(verified.is_none());

    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");
    let token = store.token().expect("token");
    ctx.backend.revoke_token(&token);

    ops::verify_session(&api, &store)
        .await
        .expect_err("revoked token must fail verification");
    assert!(!store.is_authenticated());
}

// ============================================================================
// Images and configuration
// ============================================================================

#[tokio::test]
async fn batch_uploads_tolerate_partial_failure() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    let files = vec![
        png_file("cuenco.png"),
        ImageFile {
            name: "listado.pdf".to_owned(),
            content_type: "application/pdf".to_owned(),
            bytes: b"%PDF-1.4".to_vec(),
        },
    ];
    let outcome = ops::upload_images(&api, &store, files, None).await;

    assert_eq!(outcome.urls.len(), 1);
    assert_eq!(
        outcome.errors,
        ["\"listado.pdf\" no es una imagen válida (tipo: application/pdf)."]
    );
    // One stored file is enough for the batch to settle fulfilled
    let status = store.shop_status(ShopOp::UploadImage);
    assert_eq!(status.phase, OpPhase::Fulfilled);
    assert_eq!(status.message, "Imágenes subidas exitosamente");
    assert_eq!(ctx.backend.object_count(), 1);
}

#[tokio::test]
async fn uploaded_images_delete_by_url() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    let uploaded = ops::upload_image(&api, &store, png_file("categoria.png"), Some("categories"))
        .await
        .expect("upload");
    assert!(uploaded.path.starts_with("categories/"));
    assert!(ctx.backend.has_object(&uploaded.path));

    ops::delete_image(&api, &store, &uploaded.url)
        .await
        .expect("delete");
    assert!(!ctx.backend.has_object(&uploaded.path));
    assert_eq!(
        store.shop_status(ShopOp::DeleteImage).message,
        "Imagen eliminada exitosamente"
    );
}

#[tokio::test]
async fn site_config_round_trips_through_ops() {
    let ctx = TestContext::spawn().await;
    let api = api_client(&ctx);
    let store = Store::new();
    ops::login(&api, &store, &admin_credentials())
        .await
        .expect("login");

    let config = SiteConfig {
        social_media: SocialLinks {
            whatsapp: "+54 9 11 1234-5678".to_owned(),
            ..SocialLinks::default()
        },
        contact: ContactInfo {
            email: "hola@taller.com".to_owned(),
            phone: "+54 11 1234-5678".to_owned(),
            address: "San Telmo, Buenos Aires".to_owned(),
        },
    };
    ops::update_site_config(&api, &store, &config)
        .await
        .expect("update");
    assert_eq!(
        store.auth_status(AuthOp::UpdateConfig).message,
        "Configuración actualizada exitosamente"
    );

    // A fresh store sees the stored values
    let fresh = Store::new();
    let fetched = ops::fetch_site_config(&api, &fresh).await.expect("fetch");
    assert_eq!(fetched.social_media.whatsapp, "+54 9 11 1234-5678");
    assert_eq!(
        fresh.snapshot().auth.site_config.contact.email,
        "hola@taller.com"
    );
}
