//! Pipeline
//!
//! One run, start to finish: fetch (or reuse) the order history, rebuild
//! the database from it, and write the report. Any failure aborts the run
//! before the report is written.

use crate::application::services::order_fetcher::{get_orders, FetchConfig};
use crate::application::services::report_builder::{build_report, ReportError};
use crate::config::AppConfig;
use crate::domain::repositories::order_source::{FetchError, OrderSource};
use crate::infrastructure::order_cache::OrderCache;
use crate::persistence::repository::OrderRepository;
use crate::persistence::{init_database, reset_schema, DatabaseError};
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub orders: i64,
    pub venues: i64,
}

/// Run the whole pipeline
///
/// `today` closes the weekly report range.
pub async fn run<S>(
    config: &AppConfig,
    source: &S,
    today: NaiveDate,
) -> Result<RunSummary, PipelineError>
where
    S: OrderSource + ?Sized,
{
    let cache = OrderCache::new(&config.cache_path);
    let orders = get_orders(source, &cache, &FetchConfig::from(config)).await?;
    info!("Loaded {} orders", orders.len());

    let pool = init_database(&config.database_url).await?;
    reset_schema(&pool).await?;

    let repo = OrderRepository::new(pool);
    repo.save_orders(&orders).await?;
    let stored = repo.count_orders().await?;
    let venues = repo.count_venues().await?;

    let report = build_report(&repo, config.report_start_date, today).await?;
    report.write_to(&config.report_path).await?;

    Ok(RunSummary {
        orders: stored,
        venues,
    })
}
