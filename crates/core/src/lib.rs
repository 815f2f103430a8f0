//! Rocket Cart Core - Shared types library.
//!
//! This crate provides the domain types used across all Rocket Cart components:
//! - `rocket-cart` - The cart store, its HTTP clients and local storage
//! - `rocket-cart-cli` - Command-line driver for a single cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, catalog and cart entries, stock levels and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
