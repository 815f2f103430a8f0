//! Stock levels reported by the stock service.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Units of a product available at the remote source.
///
/// Wire format: `{ "id": 1, "amount": 3 }`. The amount may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i32,
}

impl Stock {
    /// Whether at least `requested` units are available.
    #[must_use]
    pub const fn covers(&self, requested: i32) -> bool {
        self.amount >= requested
    }
}
