pub mod pipeline;
pub mod services;
