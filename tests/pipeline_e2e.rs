//! Pipeline End-to-End Tests
//!
//! Runs the full fetch → cache → database → report pipeline against an
//! in-memory order source and temporary files.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use wolt_history::application::pipeline::{run, PipelineError};
use wolt_history::config::AppConfig;
use wolt_history::domain::entities::raw_order::{DeliveryLocation, EpochMillis, GeoPoint, RawOrder};
use wolt_history::domain::repositories::order_source::{FetchError, FetchResult, OrderSource};

/// Serves a fixed history page by page and counts the calls
struct InMemorySource {
    orders: Vec<RawOrder>,
    calls: Mutex<usize>,
    fail: bool,
}

impl InMemorySource {
    fn new(orders: Vec<RawOrder>) -> Self {
        Self {
            orders,
            calls: Mutex::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            orders: Vec::new(),
            calls: Mutex::new(0),
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl OrderSource for InMemorySource {
    async fn fetch_orders(&self, limit: usize, offset: usize) -> FetchResult<Vec<RawOrder>> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(FetchError::Status {
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        Ok(self.orders.iter().skip(offset).take(limit).cloned().collect())
    }
}

fn order(id: usize, venue: &str, status: &str, day: u32) -> RawOrder {
    let paid = Utc.with_ymd_and_hms(2020, 1, day, 18, 30, 0).unwrap();
    RawOrder {
        order_id: format!("order-{}", id),
        status: status.to_string(),
        payment_amount: 2000,
        delivery_price: 390,
        items_price: 1610,
        total_price: 2000,
        payment_time: Some(EpochMillis::new(paid.timestamp_millis())),
        delivery_time: Some(EpochMillis::new(paid.timestamp_millis() + 1_800_000)),
        delivery_eta: Some(EpochMillis::new(0)),
        delivery_method: "homedelivery".to_string(),
        delivery_location: Some(DeliveryLocation {
            street: "Vesterbrogade 1".to_string(),
            coordinates: GeoPoint {
                kind: "Point".to_string(),
                coordinates: vec![12.56, 55.67],
            },
            ..Default::default()
        }),
        venue_id: venue.to_string(),
        venue_name: format!("Venue {}", venue),
        venue_coordinates: vec![12.5, 55.6],
        ..Default::default()
    }
}

fn history() -> Vec<RawOrder> {
    (0..120)
        .map(|i| {
            let venue = ["a", "b", "c"][i % 3];
            let status = if i % 10 == 0 { "rejected" } else { "delivered" };
            order(i, venue, status, 6 + (i % 20) as u32)
        })
        .collect()
}

fn test_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        cache_path: dir.path().join("orders.json"),
        database_url: format!("sqlite://{}", dir.path().join("wolt.db").display()),
        report_path: dir.path().join("wolt.html"),
        page_delay: Duration::ZERO,
        report_start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        ..AppConfig::default()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
}

#[tokio::test]
async fn test_full_run_writes_cache_database_and_report() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let source = InMemorySource::new(history());

    let summary = run(&config, &source, today()).await.unwrap();

    assert_eq!(summary.orders, 120);
    assert_eq!(summary.venues, 3);
    // 50 + 50 + 20 + empty page
    assert_eq!(source.calls(), 4);

    assert!(config.cache_path.exists());
    assert!(dir.path().join("wolt.db").exists());

    let html = std::fs::read_to_string(&config.report_path).unwrap();
    assert_eq!(html.matches("echarts.init(").count(), 5);
    assert!(html.contains("Orders per week"));
    assert!(html.contains("Venues by total spend on delivery"));
    assert!(html.contains("Venue a"));
}

#[tokio::test]
async fn test_second_run_reuses_cache_and_rebuilds_database() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let first = InMemorySource::new(history());
    run(&config, &first, today()).await.unwrap();

    // Same order ids again: only works because the schema is recreated
    let second = InMemorySource::new(Vec::new());
    let summary = run(&config, &second, today()).await.unwrap();

    assert_eq!(second.calls(), 0);
    assert_eq!(summary.orders, 120);
    assert_eq!(summary.venues, 3);
}

#[tokio::test]
async fn test_fetch_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let source = InMemorySource::failing();

    let result = run(&config, &source, today()).await;

    assert!(matches!(
        result,
        Err(PipelineError::Fetch(FetchError::Status { status: 401, .. }))
    ));
    assert!(!config.cache_path.exists());
    assert!(!config.report_path.exists());
}

#[tokio::test]
async fn test_duplicate_order_ids_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut orders = history();
    orders.push(order(5, "a", "delivered", 7));
    let source = InMemorySource::new(orders);

    let result = run(&config, &source, today()).await;

    assert!(matches!(result, Err(PipelineError::Database(_))));
    assert!(!config.report_path.exists());
}
