//! Products and their write payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::validate::{FieldError, Issues};

/// A product as stored by the backend and served by the public API.
///
/// `image` is the primary image and always equals `images[0]` when the
/// gallery is non-empty; the API normalizes this on every write.
/// `category` holds the category NAME, not an id - the link is by string
/// (see `Category`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub category: String,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_stock() -> i32 {
    999
}

/// Write payload for product create and update.
///
/// `id` is required on update and ignored on create (the backend assigns
/// ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub category: String,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default)]
    pub featured: bool,
}

impl ProductPayload {
    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut issues = Issues::new();

        if self.name.is_empty() {
            issues.push("name", "Nombre requerido");
        } else if self.name.chars().count() > 255 {
            issues.push("name", "Nombre no puede tener más de 255 caracteres");
        }

        if self.image.is_empty() {
            issues.push("image", "Imagen requerida");
        }
        if self.images.is_empty() {
            issues.push("images", "Al menos una imagen requerida");
        } else if self.images.len() > 5 {
            issues.push("images", "Máximo 5 imágenes permitidas");
        }

        if self.price <= Decimal::ZERO {
            issues.push("price", "El precio debe ser positivo");
        }

        if self.description.is_empty() {
            issues.push("description", "Descripción requerida");
        } else if self.description.chars().count() > 1000 {
            issues.push(
                "description",
                "Descripción no puede tener más de 1000 caracteres",
            );
        }

        if self.category.is_empty() {
            issues.push("category", "Categoría requerida");
        }

        if self.stock < 0 {
            issues.push("stock", "Stock debe ser 0 o mayor");
        }

        issues.into_result()
    }

    /// Force the primary image to mirror the first gallery image, keeping
    /// the `image == images[0]` invariant at the API boundary.
    pub fn normalize(&mut self) {
        if let Some(first) = self.images.first() {
            self.image.clone_from(first);
        }
    }
}

impl From<Product> for ProductPayload {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            image: product.image,
            images: product.images,
            price: product.price,
            description: product.description,
            category: product.category,
            stock: product.stock,
            featured: product.featured,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload() -> ProductPayload {
        ProductPayload {
            id: None,
            name: "Taza Esmaltada".to_owned(),
            image: "https://cdn.example.com/images/products/taza.jpg".to_owned(),
            images: vec!["https://cdn.example.com/images/products/taza.jpg".to_owned()],
            price: Decimal::from(4000),
            description: "Taza de gres esmaltada a mano".to_owned(),
            category: "Tazas".to_owned(),
            stock: 999,
            featured: false,
        }
    }

    #[test]
    fn complete_payload_validates() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn every_bad_field_is_reported_at_once() {
        let bad = ProductPayload {
            name: String::new(),
            image: String::new(),
            images: Vec::new(),
            price: Decimal::ZERO,
            description: String::new(),
            category: String::new(),
            stock: -1,
            ..payload()
        };

        let errors = bad.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["name", "image", "images", "price", "description", "category", "stock"]
        );
    }

    #[test]
    fn more_than_five_images_is_rejected() {
        let mut bad = payload();
        bad.images = (0..6).map(|i| format!("https://cdn.example.com/{i}.jpg")).collect();

        let errors = bad.validate().unwrap_err();
        assert_eq!(
            errors.first().unwrap().message,
            "Máximo 5 imágenes permitidas"
        );
    }

    #[test]
    fn normalize_points_image_at_the_first_gallery_entry() {
        let mut p = payload();
        p.image = "https://cdn.example.com/old.jpg".to_owned();
        p.images = vec![
            "https://cdn.example.com/a.jpg".to_owned(),
            "https://cdn.example.com/b.jpg".to_owned(),
        ];

        p.normalize();
        assert_eq!(p.image, "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn price_crosses_json_as_a_number() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json.get("price").unwrap(), &serde_json::json!(4000.0));
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Bol",
            "image": "https://cdn.example.com/bol.jpg",
            "price": 2500,
            "description": "Bol de cerámica",
            "category": "Bols",
        }))
        .unwrap();

        assert_eq!(product.stock, 999);
        assert!(!product.featured);
        assert!(product.images.is_empty());
        assert!(product.created_at.is_none());
    }
}
