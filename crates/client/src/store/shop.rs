//! Shop slice: catalog, cart, and per-operation statuses.

use std::collections::HashMap;

use terracota_core::{Cart, CartLine, Category, CategoryId, OpStatus, Product, ProductId};

/// Shop-side operations tracked in the status map.
///
/// A closed enum instead of string keys, so a typo in an operation name
/// cannot silently create a second status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopOp {
    FetchProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    FetchCategories,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    UploadImage,
    DeleteImage,
}

/// Catalog, cart, and shop operation statuses.
#[derive(Debug, Clone, Default)]
pub struct ShopSlice {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub cart: Cart,
    pub status: HashMap<ShopOp, OpStatus>,
}

impl ShopSlice {
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Replace the matching product in place; ids not present are ignored.
    pub fn update_product(&mut self, product: Product) {
        if let Some(slot) = self.products.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
    }

    pub fn delete_product(&mut self, id: ProductId) {
        self.products.retain(|p| p.id != id);
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn update_category(&mut self, category: Category) {
        if let Some(slot) = self.categories.iter_mut().find(|c| c.id == category.id) {
            *slot = category;
        }
    }

    pub fn delete_category(&mut self, id: CategoryId) {
        self.categories.retain(|c| c.id != id);
    }

    pub fn set_cart(&mut self, lines: Vec<CartLine>) {
        self.cart.replace_lines(lines);
    }

    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add_item(product);
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.cart.remove_item(id);
    }

    pub fn increment_cart_item(&mut self, id: ProductId) {
        self.cart.increment(id);
    }

    pub fn decrement_cart_item(&mut self, id: ProductId) {
        self.cart.decrement(id);
    }

    /// Status for one operation; `Idle` if it never ran.
    #[must_use]
    pub fn status(&self, op: ShopOp) -> OpStatus {
        self.status.get(&op).cloned().unwrap_or_default()
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }
}
