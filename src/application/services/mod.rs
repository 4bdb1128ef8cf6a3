pub mod order_fetcher;
pub mod report_builder;
