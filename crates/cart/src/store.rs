//! The cart store.
//!
//! Holds the shopper's cart, validates quantity changes against the stock
//! service and writes the full cart to local storage after every successful
//! change.
//!
//! # Consistency
//!
//! Each operation holds the store's async mutex from its stock lookup until
//! the new cart is committed, so operations on one store never interleave and
//! a stock check always applies to the cart it was made against. Stock can
//! still change remotely after the check.
//!
//! # Failure reporting
//!
//! Operations never return `Err`. Every failure leaves the cart unchanged,
//! sends one [`Notice`] to the notifier and is described by the returned
//! [`CartOutcome`].

use rocket_cart_core::{Cart, Product, ProductId, Stock};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, CatalogService, StockService};
use crate::error::CartError;
use crate::notify::{Notice, Notifier};
use crate::storage::LocalStore;

/// Result of a cart operation.
#[derive(Debug)]
pub enum CartOutcome {
    /// The cart changed and was persisted; carries the new cart.
    Updated(Cart),
    /// Requested amount was zero or negative; nothing happened.
    Ignored,
    /// The product is not in the cart.
    NotInCart(ProductId),
    /// Not enough stock for the requested amount.
    OutOfStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },
    /// Lookup, storage or serialization failed.
    Failed(CartError),
}

impl CartOutcome {
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    /// The new cart, if the operation changed it.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        match self {
            Self::Updated(cart) => Some(cart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    const fn failure_notice(self) -> Notice {
        match self {
            Self::Add => Notice::AddFailed,
            Self::Remove => Notice::RemoveFailed,
            Self::Update => Notice::UpdateFailed,
        }
    }
}

/// What an operation decided to do, before anything is written.
enum Plan {
    Commit(Cart),
    NotInCart,
    OutOfStock { requested: i32, available: i32 },
}

/// Shopping cart bound to a stock/catalog API, a local store and a notifier.
pub struct CartStore<A, S, N> {
    api: A,
    storage: S,
    notifier: N,
    key: String,
    state: Mutex<Cart>,
    changes: watch::Sender<Cart>,
}

impl<A, S, N> CartStore<A, S, N>
where
    A: StockService + CatalogService,
    S: LocalStore,
    N: Notifier,
{
    /// Build a store from whatever is saved under `key`.
    ///
    /// A missing or empty value yields an empty cart. Entries with an amount
    /// below 1 or repeating an earlier product ID are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read and
    /// `CartError::CorruptCart` if the saved value is not a product list.
    pub fn load(api: A, storage: S, notifier: N, key: impl Into<String>) -> Result<Self, CartError> {
        let key = key.into();

        let cart = match storage.get(&key)? {
            Some(raw) if !raw.trim().is_empty() => {
                let items: Vec<Product> =
                    serde_json::from_str(&raw).map_err(|source| CartError::CorruptCart {
                        key: key.clone(),
                        source,
                    })?;
                Cart::from(items)
            }
            _ => Cart::new(),
        };

        info!(key = %key, products = cart.len(), "Cart loaded");

        let (changes, _) = watch::channel(cart.clone());
        Ok(Self {
            api,
            storage,
            notifier,
            key,
            state: Mutex::new(cart),
            changes,
        })
    }

    /// Snapshot of the last committed cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.changes.borrow().clone()
    }

    /// Receiver that observes every committed cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.changes.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one, and failures are reported as update failures. A new product
    /// needs at least one unit in stock and is added with amount 1.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) -> CartOutcome {
        let mut cart = self.state.lock().await;

        if let Some(existing) = cart.get(id) {
            let requested = existing.amount.saturating_add(1);
            debug!(requested, "Product already in cart, increasing amount");
            let plan = self.plan_update(&cart, id, requested).await;
            return self.finish(Operation::Update, id, &mut cart, plan);
        }

        let plan = self.plan_add(&cart, id).await;
        self.finish(Operation::Add, id, &mut cart, plan)
    }

    /// Remove a product from the cart.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> CartOutcome {
        let mut cart = self.state.lock().await;
        let plan = Ok(cart.without(id).map_or(Plan::NotInCart, Plan::Commit));
        self.finish(Operation::Remove, id, &mut cart, plan)
    }

    /// Set a product's amount, if the stock covers it.
    ///
    /// Zero and negative amounts are ignored without a notice.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_product_amount(&self, id: ProductId, amount: i32) -> CartOutcome {
        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return CartOutcome::Ignored;
        }

        let mut cart = self.state.lock().await;
        let plan = self.plan_update(&cart, id, amount).await;
        self.finish(Operation::Update, id, &mut cart, plan)
    }

    /// Stock for `id`, rejecting a response about a different product.
    async fn stock_for(&self, id: ProductId) -> Result<Stock, ApiError> {
        let stock = self.api.stock(id).await?;
        if stock.id != id {
            return Err(ApiError::Parse(format!(
                "stock service returned product {} for id {id}",
                stock.id
            )));
        }
        Ok(stock)
    }

    async fn plan_add(&self, cart: &Cart, id: ProductId) -> Result<Plan, CartError> {
        let stock = self.stock_for(id).await?;
        if !stock.covers(1) {
            return Ok(Plan::OutOfStock {
                requested: 1,
                available: stock.amount,
            });
        }

        let entry = self.api.product(id).await?;
        if entry.id != id {
            return Err(ApiError::Parse(format!(
                "catalog returned product {} for id {id}",
                entry.id
            ))
            .into());
        }

        Ok(Plan::Commit(cart.with_product(Product::from_catalog(entry, 1))))
    }

    async fn plan_update(&self, cart: &Cart, id: ProductId, amount: i32) -> Result<Plan, CartError> {
        if !cart.contains(id) {
            return Ok(Plan::NotInCart);
        }

        let stock = self.stock_for(id).await?;
        if !stock.covers(amount) {
            return Ok(Plan::OutOfStock {
                requested: amount,
                available: stock.amount,
            });
        }

        Ok(cart.with_amount(id, amount).map_or(Plan::NotInCart, Plan::Commit))
    }

    /// Apply a plan: persist and publish on commit, notify on anything else.
    fn finish(
        &self,
        op: Operation,
        id: ProductId,
        cart: &mut Cart,
        plan: Result<Plan, CartError>,
    ) -> CartOutcome {
        let outcome = match plan {
            Ok(Plan::Commit(next)) => match self.persist(&next) {
                Ok(()) => {
                    cart.clone_from(&next);
                    self.changes.send_replace(next.clone());
                    info!(
                        operation = ?op,
                        products = next.len(),
                        items = next.item_count(),
                        "Cart updated"
                    );
                    return CartOutcome::Updated(next);
                }
                Err(error) => CartOutcome::Failed(error),
            },
            Ok(Plan::NotInCart) => CartOutcome::NotInCart(id),
            Ok(Plan::OutOfStock {
                requested,
                available,
            }) => CartOutcome::OutOfStock {
                product_id: id,
                requested,
                available,
            },
            Err(error) => CartOutcome::Failed(error),
        };

        match &outcome {
            CartOutcome::NotInCart(_) => {
                debug!(operation = ?op, "Product not in cart");
                self.notifier.notify(op.failure_notice());
            }
            CartOutcome::OutOfStock {
                requested,
                available,
                ..
            } => {
                debug!(operation = ?op, requested, available, "Insufficient stock");
                self.notifier.notify(Notice::OutOfStock);
            }
            CartOutcome::Failed(error) => {
                warn!(operation = ?op, error = %error, "Cart operation failed");
                self.notifier.notify(op.failure_notice());
            }
            CartOutcome::Updated(_) | CartOutcome::Ignored => {}
        }

        outcome
    }

    fn persist(&self, cart: &Cart) -> Result<(), CartError> {
        let json = serde_json::to_string(cart).map_err(CartError::Serialize)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }
}
