pub mod order;
pub mod raw_order;
