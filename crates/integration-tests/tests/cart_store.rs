//! End-to-end tests for the cart store.
//!
//! The store runs against the real HTTP client (talking to the local fake
//! API) and a file-backed local store in a temporary directory.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use rocket_cart::{
    ApiClient, Cart, CartError, CartOutcome, CartStore, CollectingNotifier, FileStore, LocalStore,
    Notice, ProductId,
};
use rocket_cart_integration_tests::FakeApi;
use rust_decimal::Decimal;

const KEY: &str = "@RocketShoes:cart";

type Store = CartStore<ApiClient, FileStore, CollectingNotifier>;

fn open(api: &FakeApi, dir: &Path) -> (Store, CollectingNotifier) {
    let notifier = CollectingNotifier::new();
    let store = CartStore::load(
        ApiClient::new(&api.config()).unwrap(),
        FileStore::open(dir).unwrap(),
        notifier.clone(),
        KEY,
    )
    .unwrap();
    (store, notifier)
}

fn amounts(cart: &Cart) -> Vec<(i32, i32)> {
    cart.items()
        .iter()
        .map(|p| (p.id.as_i32(), p.amount))
        .collect()
}

fn stored(dir: &Path) -> Cart {
    let raw = FileStore::open(dir).unwrap().get(KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Scenario
// =============================================================================

#[tokio::test]
async fn test_shopper_session() {
    let api = FakeApi::start().await;
    api.add_product(42, "Tênis Adidas Duramo Lite 2.0", 219.9, 5);
    let dir = tempfile::tempdir().unwrap();
    let (store, notifier) = open(&api, dir.path());
    let id = ProductId::new(42);

    let outcome = store.add_product(id).await;
    assert_eq!(amounts(outcome.cart().unwrap()), vec![(42, 1)]);
    assert_eq!(stored(dir.path()), store.cart());

    let outcome = store.update_product_amount(id, 3).await;
    assert_eq!(amounts(outcome.cart().unwrap()), vec![(42, 3)]);

    let outcome = store.update_product_amount(id, 10).await;
    assert!(matches!(
        outcome,
        CartOutcome::OutOfStock {
            requested: 10,
            available: 5,
            ..
        }
    ));
    assert_eq!(amounts(&stored(dir.path())), vec![(42, 3)]);
    assert_eq!(notifier.take(), vec![Notice::OutOfStock]);

    let outcome = store.remove_product(id).await;
    assert!(outcome.cart().unwrap().is_empty());
    assert!(stored(dir.path()).is_empty());
    assert!(notifier.notices().is_empty());
}

// =============================================================================
// Persistence across sessions
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let api = FakeApi::start().await;
    api.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 3);
    api.add_product(2, "Tênis VR Caminhada Confortável", 139.9, 5);
    let dir = tempfile::tempdir().unwrap();

    {
        let (store, _) = open(&api, dir.path());
        store.add_product(ProductId::new(2)).await;
        store.add_product(ProductId::new(1)).await;
        store.add_product(ProductId::new(1)).await;
    }

    let (store, _) = open(&api, dir.path());
    let cart = store.cart();
    assert_eq!(amounts(&cart), vec![(2, 1), (1, 2)]);
    assert_eq!(cart.subtotal(), Decimal::new(4997, 1));
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn test_corrupt_file_fails_to_load() {
    let api = FakeApi::start().await;
    let dir = tempfile::tempdir().unwrap();
    FileStore::open(dir.path())
        .unwrap()
        .set(KEY, "[{\"id\": 1,")
        .unwrap();

    let result: Result<Store, CartError> = CartStore::load(
        ApiClient::new(&api.config()).unwrap(),
        FileStore::open(dir.path()).unwrap(),
        CollectingNotifier::new(),
        KEY,
    );

    assert!(matches!(result, Err(CartError::CorruptCart { .. })));
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_out_of_stock_product_is_not_fetched() {
    let api = FakeApi::start().await;
    api.add_product(1, "Tênis", 99.9, 0);
    let dir = tempfile::tempdir().unwrap();
    let (store, notifier) = open(&api, dir.path());

    let outcome = store.add_product(ProductId::new(1)).await;

    assert!(matches!(outcome, CartOutcome::OutOfStock { available: 0, .. }));
    assert_eq!(api.product_hits(), 0);
    assert_eq!(notifier.notices(), vec![Notice::OutOfStock]);
    assert!(FileStore::open(dir.path()).unwrap().get(KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_api_outage_leaves_cart_unchanged() {
    let api = FakeApi::start().await;
    api.add_product(1, "Tênis", 99.9, 5);
    api.add_product(2, "Tênis", 99.9, 5);
    let dir = tempfile::tempdir().unwrap();
    let (store, notifier) = open(&api, dir.path());
    store.add_product(ProductId::new(1)).await;

    api.fail_with(Some(500));
    let add = store.add_product(ProductId::new(2)).await;
    let update = store.update_product_amount(ProductId::new(1), 2).await;

    assert!(matches!(add, CartOutcome::Failed(CartError::Api(_))));
    assert!(matches!(update, CartOutcome::Failed(CartError::Api(_))));
    assert_eq!(amounts(&store.cart()), vec![(1, 1)]);
    assert_eq!(amounts(&stored(dir.path())), vec![(1, 1)]);
    assert_eq!(notifier.notices(), vec![Notice::AddFailed, Notice::UpdateFailed]);

    // Removal needs no lookup, so it still works
    let outcome = store.remove_product(ProductId::new(1)).await;
    assert!(outcome.cart().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_adds_do_not_lose_updates() {
    let api = FakeApi::start().await;
    api.add_product(7, "Tênis", 99.9, 10);
    let dir = tempfile::tempdir().unwrap();
    let (store, _) = open(&api, dir.path());
    let id = ProductId::new(7);

    let outcomes = tokio::join!(
        store.add_product(id),
        store.add_product(id),
        store.add_product(id),
    );

    assert!(outcomes.0.is_updated() && outcomes.1.is_updated() && outcomes.2.is_updated());
    assert_eq!(amounts(&store.cart()), vec![(7, 3)]);
    assert_eq!(amounts(&stored(dir.path())), vec![(7, 3)]);
}
