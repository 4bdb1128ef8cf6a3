//! Fetch Orchestrator
//!
//! Returns the full order history, preferring the local cache. On a cache
//! miss the history is paged out of an [`OrderSource`] until it returns an
//! empty page, and the result is written to the cache before returning.

use crate::domain::entities::raw_order::RawOrder;
use crate::domain::repositories::order_source::{FetchResult, OrderSource};
use crate::infrastructure::order_cache::OrderCache;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Paging parameters
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub page_size: usize,
    /// Pause between two consecutive page requests
    pub page_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            page_delay: Duration::from_secs(1),
        }
    }
}

impl From<&crate::config::AppConfig> for FetchConfig {
    fn from(config: &crate::config::AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            page_delay: config.page_delay,
        }
    }
}

/// Load the order history from the cache, or fetch and cache it
pub async fn get_orders<S>(
    source: &S,
    cache: &OrderCache,
    config: &FetchConfig,
) -> FetchResult<Vec<RawOrder>>
where
    S: OrderSource + ?Sized,
{
    if cache.exists().await? {
        info!("{} did exist, reusing", cache.path().display());
        return cache.read().await;
    }

    info!(
        "{} did not exist, fetching orders",
        cache.path().display()
    );
    let orders = fetch_all(source, config).await?;
    cache.write(&orders).await?;

    Ok(orders)
}

/// Page through `source` until an empty page comes back
pub async fn fetch_all<S>(source: &S, config: &FetchConfig) -> FetchResult<Vec<RawOrder>>
where
    S: OrderSource + ?Sized,
{
    let mut orders = Vec::new();
    let mut offset = 0;

    loop {
        let page = source.fetch_orders(config.page_size, offset).await?;
        info!("requested orders, got {} back", page.len());

        if page.is_empty() {
            break;
        }

        offset += page.len();
        orders.extend(page);

        if !config.page_delay.is_zero() {
            sleep(config.page_delay).await;
        }
    }

    info!("Fetched {} orders in total", orders.len());
    Ok(orders)
}
