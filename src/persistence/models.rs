//! Database Models
//!
//! Rows returned by the aggregate queries.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One venue and its aggregated value (spend in major units, or a count)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VenueAggregate {
    pub venue_name: String,
    pub venue_value: f64,
}

/// Delivered-order spend split into food and delivery, in major units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SpendSplit {
    #[sqlx(rename = "sum_food")]
    pub total_food: f64,
    #[sqlx(rename = "sum_delivery")]
    pub total_delivery: f64,
}

/// Delivered orders in one `%Y%W` year-week bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WeeklyOrderCount {
    pub year_week: String,
    pub order_count: i64,
}
