//! Pure data structures shared by the catalog and the cart.

pub mod cart;
pub mod product;

pub use cart::*;
pub use product::*;
