//! Unified error handling for cart operations.
//!
//! Each collaborator has its own error enum; `CartError` wraps them so a
//! failed operation can carry its cause back to the caller.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Error type for the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// Stock or catalog lookup failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Reading or writing the local store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The stored cart is not valid JSON for a product list.
    #[error("Stored cart under {key:?} is corrupt: {source}")]
    CorruptCart {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocket_cart_core::ProductId;

    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::from(ApiError::NotFound {
            resource: "stock",
            id: ProductId::new(9),
        });
        assert_eq!(err.to_string(), "API error: Not found: stock 9");

        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = CartError::CorruptCart {
            key: "cart".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Stored cart under \"cart\" is corrupt"));
    }
}
