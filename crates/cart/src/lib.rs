//! Rocket Cart - shopping cart store.
//!
//! Tracks the products a shopper has added and their quantities, checks every
//! quantity against a remote stock service and mirrors the cart to local
//! storage so it survives restarts.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart and is the only thing that mutates it
//! - [`api`] defines the stock/catalog seams and their HTTP client
//! - [`storage`] defines the local key-value store the cart is written to
//! - [`notify`] defines the user-facing notices and their sinks
//! - [`config`] loads everything above from the environment
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::{ApiClient, CartConfig, CartStore, FileStore, LogNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let store = CartStore::load(
//!     ApiClient::new(&config.api)?,
//!     FileStore::open(&config.storage_dir)?,
//!     LogNotifier::new(config.locale),
//!     config.storage_key.clone(),
//! )?;
//!
//! let outcome = store.add_product(ProductId::new(1)).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiError, CatalogService, StockService};
pub use config::{ApiConfig, CartConfig, ConfigError};
pub use error::CartError;
pub use notify::{CollectingNotifier, Locale, LogNotifier, Notice, Notifier};
pub use rocket_cart_core::{Cart, CatalogProduct, Product, ProductId, Stock, format_price};
pub use storage::{FileStore, LocalStore, MemoryStore, StorageError};
pub use store::{CartOutcome, CartStore};
