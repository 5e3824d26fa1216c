//! WhatsApp checkout: order-message formatting and deep links.
//!
//! Checkout hands the order to the shop over WhatsApp; there is no payment
//! step and no server-side order record. The message layout is fixed and
//! shopper-visible, so the tests pin it byte for byte.

use std::fmt::Write as _;

use thiserror::Error;

use crate::types::cart::Cart;
use crate::types::config::SiteConfig;
use crate::types::price::format_ars;

/// Greeting behind the storefront's floating contact button.
pub const CONTACT_GREETING: &str =
    "Hola! Me gustaría obtener más información sobre sus productos artesanales.";

/// Why a checkout link could not be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order. The UI hides checkout for an empty cart, so
    /// callers treat this as a quiet no-op.
    #[error("El carrito está vacío.")]
    EmptyCart,
    /// The admin never configured a WhatsApp number; checkout cannot
    /// proceed at all and the user gets a blocking alert.
    #[error("El número de WhatsApp no está configurado. Por favor, contacta al administrador.")]
    WhatsappNotConfigured,
}

/// A ready-to-open WhatsApp deep link plus the plain-text message behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLink {
    pub url: String,
    pub message: String,
}

/// Render the order summary for `cart`, greeting the shop by name.
///
/// Lines are emitted in cart order with a 1-based index; prices use the
/// same Argentine formatting as the rest of the UI.
#[must_use]
pub fn order_message(business: &str, cart: &Cart) -> String {
    let mut message =
        format!("*Hola {business} me comunico para realizar el siguiente pedido:*\n\n");

    for (index, line) in cart.lines().iter().enumerate() {
        let _ = write!(
            message,
            "*{n}. {name}*\n- {description}\n- Cantidad: {count}\n- Precio unitario: {unit}\n- Subtotal: {subtotal}\n\n",
            n = index + 1,
            name = line.name,
            description = line.description,
            count = line.count,
            unit = format_ars(line.price),
            subtotal = format_ars(line.subtotal()),
        );
    }

    let _ = write!(
        message,
        "-------------------------\n*Total: {total}*\n\nEspero tu respuesta muchas gracias!",
        total = format_ars(cart.total()),
    );

    message
}

/// Build a `wa.me` deep link for `number` carrying `message`.
///
/// Every non-digit in the configured number is stripped, so formatted
/// numbers like `+54 9 11 1234-5678` work as-is.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(message)
    )
}

/// Build the checkout link for the current cart.
pub fn order_link(
    business: &str,
    cart: &Cart,
    config: &SiteConfig,
) -> Result<CheckoutLink, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let number = config
        .whatsapp_number()
        .ok_or(CheckoutError::WhatsappNotConfigured)?;

    let message = order_message(business, cart);
    let url = whatsapp_link(number, &message);
    Ok(CheckoutLink { url, message })
}

/// Build the fixed-greeting contact link.
pub fn contact_link(config: &SiteConfig) -> Result<String, CheckoutError> {
    let number = config
        .whatsapp_number()
        .ok_or(CheckoutError::WhatsappNotConfigured)?;
    Ok(whatsapp_link(number, CONTACT_GREETING))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::config::{SiteConfig, SocialLinks};
    use crate::types::id::ProductId;
    use crate::types::product::Product;

    fn product(id: i32, name: &str, description: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            image: format!("https://cdn.example.com/{id}.jpg"),
            images: vec![format!("https://cdn.example.com/{id}.jpg")],
            price: price.parse().unwrap(),
            description: description.to_owned(),
            category: "Tazas".to_owned(),
            stock: 999,
            featured: false,
            created_at: None,
        }
    }

    fn two_line_cart() -> Cart {
        let mut cart = Cart::new();
        let taza = product(1, "Taza Azul", "Taza de gres esmaltada", "1000");
        let plato = product(2, "Plato Rojo", "Plato llano de cerámica", "1000");
        cart.add_item(&taza);
        cart.add_item(&taza);
        cart.add_item(&plato);
        cart.add_item(&plato);
        cart
    }

    fn config_with_whatsapp(number: &str) -> SiteConfig {
        SiteConfig {
            social_media: SocialLinks {
                whatsapp: number.to_owned(),
                ..SocialLinks::default()
            },
            ..SiteConfig::default()
        }
    }

    #[test]
    fn message_layout_is_pinned_byte_for_byte() {
        let message = order_message("Magu Cerámica", &two_line_cart());

        let expected = "*Hola Magu Cerámica me comunico para realizar el siguiente pedido:*\n\n\
            *1. Taza Azul*\n\
            - Taza de gres esmaltada\n\
            - Cantidad: 2\n\
            - Precio unitario: $1.000\n\
            - Subtotal: $2.000\n\n\
            *2. Plato Rojo*\n\
            - Plato llano de cerámica\n\
            - Cantidad: 2\n\
            - Precio unitario: $1.000\n\
            - Subtotal: $2.000\n\n\
            -------------------------\n\
            *Total: $4.000*\n\n\
            Espero tu respuesta muchas gracias!";
        assert_eq!(message, expected);
    }

    #[test]
    fn link_strips_the_number_to_digits_and_encodes_the_message() {
        let link = whatsapp_link("+54 9 11 1234-5678", "Hola, ¿tienen tazas?");
        assert!(link.starts_with("https://wa.me/5491112345678?text="), "{link}");
        assert!(link.contains("Hola%2C%20%C2%BFtienen%20tazas%3F"), "{link}");
    }

    #[test]
    fn order_link_carries_the_rendered_message() {
        let cart = two_line_cart();
        let config = config_with_whatsapp("+54 9 11 1234-5678");

        let link = order_link("Magu Cerámica", &cart, &config).unwrap();
        assert_eq!(link.message, order_message("Magu Cerámica", &cart));
        assert!(
            link.url.starts_with("https://wa.me/5491112345678?text=%2AHola%20Magu"),
            "{}",
            link.url
        );
    }

    #[test]
    fn empty_cart_is_a_quiet_no_op() {
        let config = config_with_whatsapp("+54 9 11 1234-5678");
        assert_eq!(
            order_link("Magu Cerámica", &Cart::new(), &config),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn missing_number_blocks_checkout_and_contact() {
        let config = SiteConfig::default();
        assert_eq!(
            order_link("Magu Cerámica", &two_line_cart(), &config),
            Err(CheckoutError::WhatsappNotConfigured)
        );
        assert_eq!(
            contact_link(&config),
            Err(CheckoutError::WhatsappNotConfigured)
        );
    }

    #[test]
    fn contact_link_uses_the_fixed_greeting() {
        let config = config_with_whatsapp("5491112345678");
        let link = contact_link(&config).unwrap();
        assert_eq!(
            link,
            format!(
                "https://wa.me/5491112345678?text={}",
                urlencoding::encode(CONTACT_GREETING)
            )
        );
    }
}
