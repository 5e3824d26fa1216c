//! The shopping cart: an ordered, deduplicated list of product snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::product::Product;

/// One cart entry: a snapshot of the product at the moment it was added,
/// plus a quantity.
///
/// The snapshot (name, image, price, description) is frozen at add time; a
/// later product edit does not rewrite existing carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub count: u32,
}

impl CartLine {
    /// Snapshot a product into a fresh line with `count = 1`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            description: product.description.clone(),
            count: 1,
        }
    }

    /// Line subtotal: `price × count`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.count)
    }
}

/// The shopper's pending order.
///
/// Invariants: at most one line per product id, every `count >= 1`, and
/// lines keep insertion order. None of the mutations error; operations on
/// absent ids are silent no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (what the cart badge shows).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Add a product: increment the existing line's count, or append a new
    /// line with `count = 1` snapshotting the product.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.count = line.count.saturating_add(1);
        } else {
            self.lines.push(CartLine::from_product(product));
        }
    }

    /// Drop the line entirely, whatever its count.
    pub fn remove_item(&mut self, id: ProductId) {
        self.lines.retain(|line| line.id != id);
    }

    /// Increase the matching line's count by one.
    pub fn increment(&mut self, id: ProductId) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.count = line.count.saturating_add(1);
        }
    }

    /// Decrease the matching line's count by one, but never below 1.
    /// Removing the last unit requires an explicit [`Cart::remove_item`].
    pub fn decrement(&mut self, id: ProductId) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id)
            && line.count > 1
        {
            line.count -= 1;
        }
    }

    /// Bulk-replace the whole cart. Callers are expected to hand in lines
    /// that already satisfy the invariants (hydration from disk, bulk
    /// edits).
    pub fn replace_lines(&mut self, lines: Vec<CartLine>) {
        self.lines = lines;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Order total: Σ `price × count`. Zero for an empty cart. No rounding;
    /// display formatting is the caller's concern.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }
}
