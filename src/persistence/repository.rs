//! Database Repository
//!
//! Bulk load of the order history and the aggregate queries behind the
//! report. Every aggregate only looks at orders with status `delivered`.

use super::models::*;
use super::{DatabaseError, DbPool};
use crate::domain::entities::order::{Order, Venue};
use crate::domain::entities::raw_order::RawOrder;
use chrono::NaiveDate;
use tracing::{debug, error, info};

/// Status of an order that reached the customer
pub const DELIVERED: &str = "delivered";

/// Order history repository
pub struct OrderRepository {
    pool: DbPool,
}

impl OrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Normalize and store the whole order history
    ///
    /// Venues are inserted with `INSERT OR IGNORE` (first write wins), then
    /// every order with a strict `INSERT`. Both happen in one transaction, so
    /// a duplicate order id leaves the store untouched.
    pub async fn save_orders(&self, orders: &[RawOrder]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin transaction: {}", e);
            DatabaseError::QueryError(format!("Failed to begin transaction: {}", e))
        })?;

        for venue in orders.iter().map(Venue::from_raw) {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO wolt_venue (
                    venue_id, venue_name, venue_product_line,
                    venue_coordinate_x, venue_coordinate_y, venue_url
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&venue.venue_id)
            .bind(&venue.venue_name)
            .bind(&venue.venue_product_line)
            .bind(venue.venue_coordinate_x)
            .bind(venue.venue_coordinate_y)
            .bind(&venue.venue_url)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to insert venue {}: {}", venue.venue_id, e);
                DatabaseError::QueryError(format!("Failed to insert venue: {}", e))
            })?;
        }

        for order in orders.iter().map(Order::from_raw) {
            sqlx::query(
                r#"
                INSERT INTO wolt_order (
                    order_id, client_pre_estimate, delivery_street,
                    delivery_coordinate_x, delivery_coordinate_y, delivery_distance,
                    delivery_eta, delivery_method, delivery_price,
                    delivery_size_surcharge, delivery_distance_surcharge, delivery_time,
                    driver_type, items_price, payment_amount, payment_time, status,
                    service_fee, subscribed, total_price, venue_id, preorder_time
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                        ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)
                "#,
            )
            .bind(&order.order_id)
            .bind(&order.client_pre_estimate)
            .bind(&order.delivery_street)
            .bind(order.delivery_coordinate_x)
            .bind(order.delivery_coordinate_y)
            .bind(order.delivery_distance)
            .bind(order.delivery_eta)
            .bind(&order.delivery_method)
            .bind(order.delivery_price)
            .bind(order.delivery_size_surcharge)
            .bind(order.delivery_distance_surcharge)
            .bind(order.delivery_time)
            .bind(&order.driver_type)
            .bind(order.items_price)
            .bind(order.payment_amount)
            .bind(order.payment_time)
            .bind(&order.status)
            .bind(order.service_fee)
            .bind(order.subscribed)
            .bind(order.total_price)
            .bind(&order.venue_id)
            .bind(order.preorder_time)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to insert order {}: {}", order.order_id, e);
                DatabaseError::QueryError(format!("Failed to insert order: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit orders: {}", e);
            DatabaseError::QueryError(format!("Failed to commit orders: {}", e))
        })?;

        info!("Saved {} orders", orders.len());
        Ok(())
    }

    /// Venues by total payment amount, smallest first
    pub async fn top_venues_by_total_spend(&self) -> Result<Vec<VenueAggregate>, DatabaseError> {
        self.top_venues("SUM(payment_amount)", "SUM(payment_amount) / 100.0")
            .await
    }

    /// Venues by number of delivered orders, smallest first
    pub async fn top_venues_by_order_count(&self) -> Result<Vec<VenueAggregate>, DatabaseError> {
        self.top_venues("COUNT(*)", "CAST(COUNT(*) AS REAL)").await
    }

    /// Venues by total delivery price, smallest first
    pub async fn top_venues_by_delivery_spend(
        &self,
    ) -> Result<Vec<VenueAggregate>, DatabaseError> {
        self.top_venues("SUM(delivery_price)", "SUM(delivery_price) / 100.0")
            .await
    }

    /// Group delivered orders by venue, ordered ascending by `order_expr`
    async fn top_venues(
        &self,
        order_expr: &str,
        value_expr: &str,
    ) -> Result<Vec<VenueAggregate>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT venue_name, {value_expr} AS venue_value
            FROM view_wolt_order
            WHERE status = ?1
            GROUP BY venue_id, venue_name
            ORDER BY {order_expr} ASC, venue_name ASC
            "#
        );

        let records = sqlx::query_as::<_, VenueAggregate>(&sql)
            .bind(DELIVERED)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to aggregate venues by {}: {}", order_expr, e);
                DatabaseError::QueryError(format!("Failed to aggregate venues: {}", e))
            })?;

        debug!("Aggregated {} venues by {}", records.len(), order_expr);
        Ok(records)
    }

    /// Food (payment minus delivery) and delivery spend over delivered orders
    pub async fn total_food_and_delivery_spend(&self) -> Result<SpendSplit, DatabaseError> {
        let record = sqlx::query_as::<_, SpendSplit>(
            r#"
            SELECT COALESCE(SUM(payment_amount - delivery_price), 0) / 100.0 AS sum_food,
                   COALESCE(SUM(delivery_price), 0) / 100.0 AS sum_delivery
            FROM view_wolt_order
            WHERE status = ?1
            "#,
        )
        .bind(DELIVERED)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to compute spend split: {}", e);
            DatabaseError::QueryError(format!("Failed to compute spend split: {}", e))
        })?;

        Ok(record)
    }

    /// Delivered orders per `%Y%W` week for every week between `start` and
    /// `until` (inclusive), weeks without orders reported as zero
    pub async fn weekly_order_counts(
        &self,
        start: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<WeeklyOrderCount>, DatabaseError> {
        let records = sqlx::query_as::<_, WeeklyOrderCount>(
            r#"
            WITH RECURSIVE days(day) AS (
                SELECT date(?1)
                UNION ALL
                SELECT date(day, '+1 day') FROM days WHERE day < date(?2)
            ),
            weeks AS (
                SELECT DISTINCT strftime('%Y%W', day) AS year_week FROM days
            ),
            counts AS (
                SELECT strftime('%Y%W', payment_time) AS year_week, COUNT(*) AS order_count
                FROM view_wolt_order
                WHERE status = ?3
                GROUP BY 1
            )
            SELECT w.year_week AS year_week, COALESCE(c.order_count, 0) AS order_count
            FROM weeks w
            LEFT JOIN counts c ON c.year_week = w.year_week
            ORDER BY w.year_week
            "#,
        )
        .bind(start)
        .bind(until)
        .bind(DELIVERED)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to count weekly orders: {}", e);
            DatabaseError::QueryError(format!("Failed to count weekly orders: {}", e))
        })?;

        debug!("Counted orders over {} weeks", records.len());
        Ok(records)
    }

    /// Number of stored orders
    pub async fn count_orders(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wolt_order")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("Failed to count orders: {}", e)))?;
        Ok(count.0)
    }

    /// Number of stored venues
    pub async fn count_venues(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wolt_venue")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("Failed to count venues: {}", e)))?;
        Ok(count.0)
    }
}
