//! Categories grouping products by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::CategoryId;
use crate::validate::{FieldError, Issues};

/// A product grouping with its cover image.
///
/// Products reference a category by NAME; the id only matters for admin
/// CRUD. Deleting a category is therefore blocked while any product still
/// points at its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Write payload for category create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    pub image: String,
}

impl CategoryPayload {
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

        issues.into_result()
    }
}

impl From<Category> for CategoryPayload {
    fn from(category: Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name,
            image: category.image,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn name_and_image_are_both_required() {
        let empty = CategoryPayload {
            id: None,
            name: String::new(),
            image: String::new(),
        };

        let errors = empty.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first().unwrap().message, "Nombre requerido");
        assert_eq!(errors.get(1).unwrap().message, "Imagen requerida");
    }

    #[test]
    fn existing_category_converts_to_an_update_payload() {
        let category = Category {
            id: CategoryId::new(3),
            name: "Tazas".to_owned(),
            image: "https://cdn.example.com/images/categories/tazas.jpg".to_owned(),
            created_at: None,
            updated_at: None,
        };

        let payload = CategoryPayload::from(category);
        assert_eq!(payload.id, Some(CategoryId::new(3)));
        assert!(payload.validate().is_ok());
    }
}
