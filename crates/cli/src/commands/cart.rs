//! Cart commands.
//!
//! # Environment Variables
//!
//! - `CART_API_URL` - Base URL of the stock and catalog API (required)
//! - `CART_STORAGE_DIR` - Where the cart file lives (default: `.rocket-cart`)
//!
//! See `rocket_cart::config` for the full list.

use rocket_cart::{
    ApiClient, Cart, CartConfig, CartError, CartOutcome, CartStore, FileStore, LogNotifier,
    ProductId, format_price,
};

pub type Store = CartStore<ApiClient, FileStore, LogNotifier>;

/// Build the cart store from environment configuration.
///
/// # Errors
///
/// Returns error if configuration is invalid, the storage directory cannot be
/// created, or the saved cart is corrupt.
pub fn open_store() -> Result<Store, CartError> {
    let config = CartConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let api = ApiClient::new(&config.api)?;
    let storage = FileStore::open(&config.storage_dir)?;
    let notifier = LogNotifier::new(config.locale);

    CartStore::load(api, storage, notifier, config.storage_key)
}

pub fn show(store: &Store) {
    print_cart(&store.cart());
}

pub async fn add(store: &Store, product_id: ProductId) -> bool {
    report(store.add_product(product_id).await)
}

pub async fn remove(store: &Store, product_id: ProductId) -> bool {
    report(store.remove_product(product_id).await)
}

pub async fn update(store: &Store, product_id: ProductId, amount: i32) -> bool {
    report(store.update_product_amount(product_id, amount).await)
}

/// Print the new cart on success. Refusals were already logged by the notifier.
fn report(outcome: CartOutcome) -> bool {
    match outcome {
        CartOutcome::Updated(cart) => {
            print_cart(&cart);
            true
        }
        CartOutcome::Ignored => {
            tracing::info!("Amount must be positive; cart unchanged");
            true
        }
        CartOutcome::NotInCart(id) => {
            tracing::debug!(product_id = %id, "Product not in cart");
            false
        }
        CartOutcome::OutOfStock {
            product_id,
            requested,
            available,
        } => {
            tracing::debug!(%product_id, requested, available, "Out of stock");
            false
        }
        CartOutcome::Failed(error) => {
            tracing::debug!(%error, "Operation failed");
            false
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for product in cart.items() {
        println!(
            "{:>6}  {:<40}  {:>3} x {:>10}  = {:>10}",
            product.id.as_i32(),
            product.title,
            product.amount,
            format_price(product.price),
            format_price(product.line_total()),
        );
    }
    println!(
        "{:>6}  {:<40}  {:>3}                 = {:>10}",
        "",
        "Subtotal",
        cart.item_count(),
        format_price(cart.subtotal()),
    );
}
