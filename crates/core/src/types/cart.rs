//! The cart: an ordered list of products, unique by ID.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// Ordered collection of cart entries with at most one entry per product.
///
/// Serializes as a bare JSON array of [`Product`], which is also the stored
/// format. Mutators are crate-agnostic building blocks; they do not check
/// stock and do not persist anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|p| i64::from(p.amount)).sum()
    }

    /// Sum of price times amount over all entries.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(Product::line_total).sum()
    }

    /// Return a copy with `product` appended.
    ///
    /// An existing entry with the same ID is replaced in place, keeping its position.
    #[must_use]
    pub fn with_product(&self, product: Product) -> Self {
        let mut next = self.clone();
        match next.items.iter_mut().find(|p| p.id == product.id) {
            Some(entry) => *entry = product,
            None => next.items.push(product),
        }
        next
    }

    /// Return a copy without the entry for `id`, or `None` if it is absent.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self.items.iter().filter(|p| p.id != id).cloned().collect();
        Some(Self { items })
    }

    /// Return a copy with the amount for `id` replaced, or `None` if it is absent.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: i32) -> Option<Self> {
        let mut next = self.clone();
        let entry = next.items.iter_mut().find(|p| p.id == id)?;
        entry.amount = amount;
        Some(next)
    }
}

impl From<Vec<Product>> for Cart {
    /// Build a cart from stored entries.
    ///
    /// Entries with an amount below 1 are dropped, as are later duplicates of an ID.
    fn from(products: Vec<Product>) -> Self {
        let mut items: Vec<Product> = Vec::with_capacity(products.len());
        for product in products {
            if product.amount >= 1 && !items.iter().any(|p| p.id == product.id) {
                items.push(product);
            }
        }
        Self { items }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, amount: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Decimal::new(1000, 2),
            image: format!("https://example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_with_product_appends_or_replaces() {
        let cart = Cart::new().with_product(product(1, 1)).with_product(product(2, 1));
        let next = cart.with_product(product(1, 4));

        let entries: Vec<(i32, i32)> = next
            .items()
            .iter()
            .map(|p| (p.id.as_i32(), p.amount))
            .collect();
        assert_eq!(entries, vec![(1, 4), (2, 1)]);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_without_preserves_order() {
        let cart = Cart::from(vec![product(1, 1), product(2, 2), product(3, 3)]);
        let next = cart.without(ProductId::new(2)).unwrap();
        let ids: Vec<i32> = next.items().iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.without(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_with_amount_only_touches_target() {
        let cart = Cart::from(vec![product(1, 1), product(2, 2)]);
        let next = cart.with_amount(ProductId::new(2), 5).unwrap();
        assert_eq!(next.get(ProductId::new(1)).unwrap().amount, 1);
        assert_eq!(next.get(ProductId::new(2)).unwrap().amount, 5);
        assert!(cart.with_amount(ProductId::new(3), 1).is_none());
    }

    #[test]
    fn test_totals() {
        let cart = Cart::from(vec![product(1, 2), product(2, 3)]);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.subtotal(), Decimal::new(5000, 2));
    }

    #[test]
    fn test_from_vec_drops_duplicate_ids() {
        let cart = Cart::from(vec![product(1, 1), product(1, 4)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_from_vec_drops_non_positive_amounts() {
        let cart = Cart::from(vec![product(1, 0), product(2, 2), product(3, -3), product(1, 1)]);
        let entries: Vec<(i32, i32)> = cart
            .items()
            .iter()
            .map(|p| (p.id.as_i32(), p.amount))
            .collect();
        assert_eq!(entries, vec![(2, 2), (1, 1)]);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::from(vec![product(42, 3)]);
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], 42);
        assert_eq!(json[0]["amount"], 3);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
