pub mod order_cache;
pub mod wolt_client;
