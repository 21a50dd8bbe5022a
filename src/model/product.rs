//! Catalog product types.
//!
//! Products are immutable values: the catalog cache hands out clones and the cart
//! keeps the copy it was given at add time.

use serde::{Deserialize, Deserializer, Serialize};

use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a product fetched from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(deserialize_with = "non_negative_price")]
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u32,
    pub category: String,
    pub sku: String,
    pub thumbnail: String,
    pub description: String,
    // Absent for some categories in the remote catalog.
    #[serde(default)]
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
}

impl Product {
    /// Creates a Product with the fields the cart cares about; everything else is
    /// left empty.
    ///
    /// # Arguments
    /// * `id` - Catalog identifier
    /// * `title` - Display title
    /// * `price` - Unit price
    pub fn new(id: u32, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId(id),
            title: title.into(),
            price,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            category: String::new(),
            sku: String::new(),
            thumbnail: String::new(),
            description: String::new(),
            brand: String::new(),
            warranty_information: None,
            shipping_information: None,
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0.0
    }

    pub fn warranty_label(&self) -> &str {
        self.warranty_information.as_deref().unwrap_or("N/A")
    }

    pub fn shipping_label(&self) -> &str {
        self.shipping_information
            .as_deref()
            .unwrap_or("Standard shipping")
    }
}

/// Rejects prices a cart could not sum: negative, NaN or infinite.
fn non_negative_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = f64::deserialize(deserializer)?;
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(serde::de::Error::custom(format!(
            "invalid price {price}: expected a non-negative number"
        )))
    }
}

/// Body of `GET /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POLISH: &str = r#"{
        "id": 5,
        "title": "Red Nail Polish",
        "description": "A glossy red polish.",
        "category": "beauty",
        "price": 8.99,
        "discountPercentage": 2.46,
        "rating": 3.91,
        "stock": 71,
        "tags": ["beauty", "nail polish"],
        "brand": "Nail Couture",
        "sku": "YUIIIP4W",
        "warrantyInformation": "1 month warranty",
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/thumbnail.png"
    }"#;

    #[test]
    fn test_decodes_remote_shape() {
        let product: Product = serde_json::from_str(POLISH).unwrap();
        assert_eq!(product.id, ProductId(5));
        assert_eq!(product.title, "Red Nail Polish");
        assert_eq!(product.warranty_label(), "1 month warranty");
        assert_eq!(product.shipping_label(), "Standard shipping");
        assert!(product.has_discount());
    }

    #[test]
    fn test_missing_brand_defaults_to_empty() {
        let json = POLISH.replace(r#""brand": "Nail Couture","#, "");
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product.brand, "");
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let json = POLISH.replace(r#""price": 8.99,"#, "");
        assert!(serde_json::from_str::<Product>(&json).is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let json = POLISH.replace(r#""price": 8.99,"#, r#""price": -5.0,"#);
        let err = serde_json::from_str::<Product>(&json).unwrap_err();
        assert!(err.to_string().contains("invalid price -5"), "{err}");
    }

    #[test]
    fn test_free_product_is_accepted() {
        let json = POLISH.replace(r#""price": 8.99,"#, r#""price": 0,"#);
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_new_product_has_no_discount() {
        let product = Product::new(1, "Widget", 10.0);
        assert!(!product.has_discount());
        assert_eq!(product.warranty_label(), "N/A");
        assert_eq!(product.id.to_string(), "1");
    }
}
