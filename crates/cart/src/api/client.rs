//! HTTP implementation of the stock and catalog services.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rocket_cart_core::{CatalogProduct, ProductId, Stock};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, CatalogService, StockService};
use crate::config::ApiConfig;

const STOCK: &str = "stock";
const PRODUCTS: &str = "products";

/// Client for the stock and catalog API.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_cache: Option<Cache<ProductId, CatalogProduct>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let catalog_cache = (!config.catalog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.catalog_cache_ttl)
                .build()
        });

        // Url::join drops the last path segment unless it ends with '/'
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                catalog_cache,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the available stock for a product. Never cached.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the API has no stock record for `id`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let stock: Stock = self.get_json(STOCK, id).await?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    /// Get a product's catalog record, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the catalog has no product `id`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, ApiError> {
        if let Some(cache) = &self.inner.catalog_cache
            && let Some(product) = cache.get(&id).await
        {
            debug!("Catalog cache hit");
            return Ok(product);
        }

        let product: CatalogProduct = self.get_json(PRODUCTS, id).await?;
        debug!(title = %product.title, "Fetched catalog record");

        if let Some(cache) = &self.inner.catalog_cache {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }

    /// Drop all cached catalog records.
    pub fn invalidate_catalog(&self) {
        if let Some(cache) = &self.inner.catalog_cache {
            cache.invalidate_all();
        }
    }

    /// Execute `GET {base}/{resource}/{id}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        id: ProductId,
    ) -> Result<T, ApiError> {
        let url = self
            .inner
            .base_url
            .join(&format!("{resource}/{id}"))
            .map_err(|e| ApiError::Parse(format!("Invalid request URL: {e}")))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { resource, id });
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }
}

impl StockService for ApiClient {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        self.get_stock(id).await
    }
}

impl CatalogService for ApiClient {
    async fn product(&self, id: ProductId) -> Result<CatalogProduct, ApiError> {
        self.get_product(id).await
    }
}
