//! Core types for Rocket Cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod stock;

pub use cart::Cart;
pub use id::*;
pub use price::format_price;
pub use product::{CatalogProduct, Product};
pub use stock::Stock;
