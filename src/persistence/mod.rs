//! Persistence Layer
//!
//! Single-file SQLite store for the normalized order history, accessed
//! asynchronously through sqlx.
//!
//! The schema is dropped and recreated on every run: the relational data
//! only lives for the duration of one pipeline run and the JSON cache is
//! the sole state kept between runs.
//!
//! # Database Schema
//!
//! ## wolt_venue
//! - venue_id: Primary key
//! - venue_name, venue_product_line, venue_url: Text
//! - venue_coordinate_x, venue_coordinate_y: Real
//!
//! ## wolt_order
//! - order_id: Primary key
//! - venue_id: Foreign key to wolt_venue
//! - Prices and surcharges: Integer, minor currency units
//! - payment_time, delivery_time, delivery_eta, preorder_time: Nullable timestamps
//! - delivery_coordinate_x, delivery_coordinate_y: Nullable real
//! - status, delivery_method, driver_type, ...: Text
//!
//! ## view_wolt_order
//! - wolt_order joined with its wolt_venue row

pub mod models;
pub mod repository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use tracing::info;

/// Database connection pool
pub type DbPool = SqlitePool;

/// Database error
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

/// Open the database
///
/// # Arguments
/// - `database_url`: SQLite URL (e.g., "sqlite://wolt.db" or "sqlite::memory:")
///
/// The file is created when missing. The pool holds a single connection;
/// the pipeline never issues concurrent statements and an in-memory
/// database is private to its connection.
pub async fn init_database(database_url: &str) -> Result<DbPool, DatabaseError> {
    info!("Opening database: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .log_statements(tracing::log::LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Drop and recreate the whole schema
///
/// Destructive: every row from a previous run is discarded.
pub async fn reset_schema(pool: &DbPool) -> Result<(), DatabaseError> {
    info!("Resetting database schema...");

    for statement in [
        "DROP VIEW IF EXISTS view_wolt_order",
        "DROP TABLE IF EXISTS wolt_order",
        "DROP TABLE IF EXISTS wolt_venue",
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("{}: {}", statement, e)))?;
    }

    sqlx::query(
        r#"
        CREATE TABLE wolt_venue (
            venue_id TEXT PRIMARY KEY,
            venue_name TEXT,
            venue_product_line TEXT,
            venue_coordinate_x REAL,
            venue_coordinate_y REAL,
            venue_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create wolt_venue table: {}", e))
    })?;

    sqlx::query(
        r#"
        CREATE TABLE wolt_order (
            order_id TEXT PRIMARY KEY,
            client_pre_estimate TEXT NOT NULL,
            delivery_street TEXT,
            delivery_coordinate_x REAL,
            delivery_coordinate_y REAL,
            delivery_distance INTEGER,
            delivery_eta DATETIME,
            delivery_method TEXT,
            delivery_price INTEGER,
            delivery_size_surcharge INTEGER,
            delivery_distance_surcharge INTEGER,
            delivery_time DATETIME,
            driver_type TEXT,
            items_price INTEGER,
            payment_amount INTEGER,
            payment_time DATETIME,
            status TEXT,
            service_fee INTEGER,
            subscribed BOOLEAN,
            total_price INTEGER,
            venue_id TEXT REFERENCES wolt_venue(venue_id),
            preorder_time DATETIME
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create wolt_order table: {}", e))
    })?;

    sqlx::query(
        r#"
        CREATE VIEW view_wolt_order AS
            SELECT o.*, v.venue_name, v.venue_product_line,
                   v.venue_coordinate_x, v.venue_coordinate_y, v.venue_url
            FROM wolt_order o
            JOIN wolt_venue v ON o.venue_id = v.venue_id
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create view_wolt_order view: {}", e))
    })?;

    sqlx::query("CREATE INDEX idx_wolt_order_status ON wolt_order(status)")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    info!("✓ Database schema ready");

    Ok(())
}
