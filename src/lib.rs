//! Wolt order history report
//!
//! Fetches a user's order history from the Wolt API, caches it as JSON,
//! loads it into SQLite and renders aggregate statistics as an HTML page
//! of charts.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
