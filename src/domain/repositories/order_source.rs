//! Order Source Trait
//!
//! Defines the `OrderSource` trait, the seam between the fetch orchestrator
//! and the upstream API. The production implementation is
//! [`WoltClient`](crate::infrastructure::wolt_client::WoltClient); tests
//! drive the orchestrator with in-memory pages instead.

use crate::domain::entities::raw_order::RawOrder;
use async_trait::async_trait;

/// Common result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while fetching or caching orders
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, including timeouts
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with something other than 200 OK
    #[error("got http status code: {status} - {body}")]
    Status { status: u16, body: String },

    /// Response or cache file was not valid order JSON
    #[error("Failed to decode orders: {0}")]
    Decode(#[from] serde_json::Error),

    /// Cache file could not be read or written
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

/// A paginated source of raw orders
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetch one page of orders
    ///
    /// # Arguments
    /// * `limit` - Maximum number of orders in the page
    /// * `offset` - Number of orders to skip
    ///
    /// # Returns
    /// The orders of the page; an empty page marks the end of the history
    async fn fetch_orders(&self, limit: usize, offset: usize) -> FetchResult<Vec<RawOrder>>;
}
