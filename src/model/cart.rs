use crate::model::{Product, ProductId};
use serde::Serialize;

/// One line of the cart: a product snapshot and how many of it were selected.
///
/// `quantity` is at least 1 while the item is in a
/// [`CartStore`](crate::cart::CartStore); reaching 0 removes the line instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity` for this line.
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}
