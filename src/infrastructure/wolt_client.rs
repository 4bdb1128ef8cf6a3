//! # Wolt Order History Client
//!
//! HTTP client for the `/v2/order_details/` endpoint.
//!
//! ## Authentication
//!
//! Every request carries `Authorization: Bearer <token>`. The header is set
//! once as a default header of the underlying `reqwest::Client` and marked
//! sensitive, so it is attached to every call and never printed.
//!
//! ## Behavior
//!
//! - One GET per page, bounded by the configured timeout
//! - Anything but `200 OK` is an error, no retries

use crate::config::AppConfig;
use crate::domain::entities::raw_order::RawOrder;
use crate::domain::repositories::order_source::{FetchError, FetchResult, OrderSource};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

/// Path of the order history endpoint
const ORDER_DETAILS_PATH: &str = "/v2/order_details/";

/// Wolt API client
pub struct WoltClient {
    client: Client,
    base_url: Url,
}

impl std::fmt::Debug for WoltClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WoltClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl WoltClient {
    /// Create a client for the given API host
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> FetchResult<Self> {
        Self::with_builder(Client::builder(), api_base, token, timeout)
    }

    /// Create a client on top of a preconfigured `reqwest` builder
    pub fn with_builder(
        builder: reqwest::ClientBuilder,
        api_base: &str,
        token: &str,
        timeout: Duration,
    ) -> FetchResult<Self> {
        let base_url = Url::parse(api_base)?;

        let bearer = Zeroizing::new(format!("Bearer {}", token));
        let mut auth_value = HeaderValue::from_str(bearer.as_str())?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);

        let client = builder
            .user_agent(concat!("wolt-history/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the run configuration
    pub fn from_config(config: &AppConfig, token: &str) -> FetchResult<Self> {
        Self::new(&config.api_base, token, config.request_timeout)
    }

    /// Build the URL of one page of the order history
    fn orders_url(&self, limit: usize, skip: usize) -> FetchResult<Url> {
        let mut url = self.base_url.join(ORDER_DETAILS_PATH)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());
        Ok(url)
    }

    /// Request one page of orders
    pub async fn request_orders(&self, limit: usize, skip: usize) -> FetchResult<Vec<RawOrder>> {
        let url = self.orders_url(limit, skip)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let orders: Vec<RawOrder> = serde_json::from_str(&body)?;
        Ok(orders)
    }
}

#[async_trait]
impl OrderSource for WoltClient {
    async fn fetch_orders(&self, limit: usize, offset: usize) -> FetchResult<Vec<RawOrder>> {
        self.request_orders(limit, offset).await
    }
}
