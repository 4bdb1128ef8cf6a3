//! Local JSON cache of the fetched order history.
//!
//! The file is never invalidated automatically; delete it to force a fresh
//! fetch on the next run.

use crate::domain::entities::raw_order::RawOrder;
use crate::domain::repositories::order_source::FetchResult;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OrderCache {
    path: PathBuf,
}

impl OrderCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Presence of the file is the only cache-hit signal
    ///
    /// Only a missing file is a miss; any other I/O failure is an error.
    pub async fn exists(&self) -> FetchResult<bool> {
        Ok(tokio::fs::try_exists(&self.path).await?)
    }

    pub async fn read(&self) -> FetchResult<Vec<RawOrder>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let orders: Vec<RawOrder> = serde_json::from_slice(&bytes)?;
        debug!("Read {} orders from {}", orders.len(), self.path.display());
        Ok(orders)
    }

    /// Overwrite the cache with `orders` as pretty-printed JSON
    pub async fn write(&self, orders: &[RawOrder]) -> FetchResult<()> {
        let json = serde_json::to_vec_pretty(orders)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Wrote {} orders to {}", orders.len(), self.path.display());
        Ok(())
    }
}
