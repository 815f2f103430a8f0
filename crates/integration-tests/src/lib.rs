//! Integration tests for Rocket Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-cart-integration-tests
//! ```
//!
//! # Test Support
//!
//! [`FakeApi`] serves `GET /stock/{id}` and `GET /products/{id}` from an
//! in-memory table on an ephemeral local port, so the real `ApiClient` can be
//! exercised end to end without network access.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocket_cart::ApiConfig;
use serde_json::{Value, json};
use url::Url;

#[derive(Default)]
struct Tables {
    stock: HashMap<i32, i32>,
    products: HashMap<i32, Value>,
    stock_hits: usize,
    product_hits: usize,
    fail_with: Option<u16>,
    last_authorization: Option<String>,
}

/// Handle to a running fake stock/catalog API.
#[derive(Clone)]
pub struct FakeApi {
    addr: SocketAddr,
    tables: Arc<Mutex<Tables>>,
}

impl FakeApi {
    /// Bind to an ephemeral port and start serving in the background.
    pub async fn start() -> Self {
        let tables = Arc::new(Mutex::new(Tables::default()));

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&tables));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Fake API has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake API crashed");
        });

        Self { addr, tables }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Base URL of the fake API.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid fake API URL")
    }

    /// Client configuration pointing at this API with a short timeout.
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        let mut config = ApiConfig::new(self.base_url());
        config.timeout = Duration::from_secs(5);
        config
    }

    /// Register a product and its available amount.
    pub fn add_product(&self, id: i32, title: &str, price: f64, available: i32) {
        let mut tables = self.tables();
        tables.stock.insert(id, available);
        tables.products.insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.example.com/{id}.jpg"),
            }),
        );
    }

    /// Replace the catalog record for `id` with arbitrary JSON.
    pub fn set_product_json(&self, id: i32, value: Value) {
        self.tables().products.insert(id, value);
    }

    pub fn set_stock(&self, id: i32, available: i32) {
        self.tables().stock.insert(id, available);
    }

    /// Make every request answer with `status` until cleared with `None`.
    pub fn fail_with(&self, status: Option<u16>) {
        self.tables().fail_with = status;
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.tables().stock_hits
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.tables().product_hits
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.tables().last_authorization.clone()
    }
}

type SharedTables = Arc<Mutex<Tables>>;

fn record(tables: &mut Tables, headers: &HeaderMap) -> Option<Response> {
    tables.last_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    tables.fail_with.map(|code| {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, "fake failure").into_response()
    })
}

async fn stock(
    State(tables): State<SharedTables>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut tables = tables.lock().unwrap_or_else(PoisonError::into_inner);
    tables.stock_hits += 1;
    if let Some(failure) = record(&mut tables, &headers) {
        return failure;
    }

    match tables.stock.get(&id) {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn product(
    State(tables): State<SharedTables>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut tables = tables.lock().unwrap_or_else(PoisonError::into_inner);
    tables.product_hits += 1;
    if let Some(failure) = record(&mut tables, &headers) {
        return failure;
    }

    match tables.products.get(&id) {
        Some(value) => Json(value.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}
