//! # Cart Store
//!
//! In-memory cart state. Every operation is synchronous and total: there is no I/O,
//! no suspension point and no error path. Unknown ids are silently ignored.

use crate::model::{CartItem, Product, ProductId};
use tracing::debug;

/// The cart: line items in insertion order, at most one per product id.
///
/// Mutators take `&mut self`, so exclusive access is checked by the compiler and no
/// lock is needed. Aggregates are recomputed on every call and never stored.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Adds one unit of `product`.
    ///
    /// If the product is already in the cart only its quantity changes; the stored
    /// product keeps the values it had when first added.
    pub fn add_to_cart(&mut self, product: &Product) {
        match self.position(product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity += 1;
                debug!(product_id = %product.id, quantity = item.quantity, "Cart increment");
            }
            None => {
                self.items.push(CartItem::new(product.clone()));
                debug!(product_id = %product.id, lines = self.items.len(), "Cart add");
            }
        }
    }

    /// Removes the line for `id`, whatever its quantity.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        if let Some(index) = self.position(id) {
            self.items.remove(index);
            debug!(product_id = %id, lines = self.items.len(), "Cart remove");
        }
    }

    /// Removes one unit of `id`; the last unit removes the line.
    pub fn decrease_quantity(&mut self, id: ProductId) {
        let Some(index) = self.position(id) else {
            return;
        };

        let item = &mut self.items[index];
        if item.quantity > 1 {
            item.quantity -= 1;
            debug!(product_id = %id, quantity = item.quantity, "Cart decrement");
        } else {
            self.remove_from_cart(id);
        }
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price × quantity` over all lines.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Read-only snapshot for rendering.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.item(id).is_some()
    }

    /// Units of `id` in the cart, 0 when absent.
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.item(id).map_or(0, |item| item.quantity)
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
