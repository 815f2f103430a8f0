//! Catalog records and cart entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product as served by the catalog service (no quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    /// Image URL, opaque to the cart.
    pub image: String,
}

/// A product held in the cart.
///
/// The display fields are copied from the catalog when the product is first
/// added and are never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    /// Quantity in the cart; at least 1 while the entry exists.
    pub amount: i32,
}

impl Product {
    /// Build a cart entry from a catalog record.
    #[must_use]
    pub fn from_catalog(entry: CatalogProduct, amount: i32) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            price: entry.price,
            image: entry.image,
            amount,
        }
    }

    /// Price times amount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_catalog_sets_amount() {
        let entry = CatalogProduct {
            id: ProductId::new(3),
            title: "Tênis Adidas Duramo Lite 2.0".to_string(),
            price: Decimal::new(21990, 2),
            image: "https://example.com/shoe.jpg".to_string(),
        };
        let product = Product::from_catalog(entry, 1);
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.amount, 1);
        assert_eq!(product.line_total(), Decimal::new(21990, 2));
    }

    #[test]
    fn test_catalog_product_accepts_numeric_price() {
        let json = r#"{"id":1,"title":"Tênis","price":179.9,"image":"a.jpg"}"#;
        let entry: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(entry.price, Decimal::new(1799, 1));
    }
}
