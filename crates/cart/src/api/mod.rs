//! Stock and catalog service clients.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for stock; stock is never cached
//! - Catalog records are cached in memory via `moka` (TTL from config)
//! - `StockService` and `CatalogService` are the seams the cart store
//!   depends on; `ApiClient` implements both over HTTP
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` → `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` → `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let stock = client.get_stock(ProductId::new(1)).await?;
//! if stock.covers(1) {
//!     let product = client.get_product(ProductId::new(1)).await?;
//! }
//! ```

mod client;

use std::future::Future;

use rocket_cart_core::{CatalogProduct, ProductId, Stock};
use thiserror::Error;

pub use client::ApiClient;

/// Errors that can occur when talking to the stock or catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The requested record does not exist.
    #[error("Not found: {resource} {id}")]
    NotFound {
        resource: &'static str,
        id: ProductId,
    },

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Looks up how many units of a product are available.
pub trait StockService {
    /// # Errors
    ///
    /// Returns `ApiError` if the lookup fails or the product is unknown.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send;
}

/// Looks up product display data.
pub trait CatalogService {
    /// # Errors
    ///
    /// Returns `ApiError` if the lookup fails or the product is unknown.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<CatalogProduct, ApiError>> + Send;
}
