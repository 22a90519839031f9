pub mod alpha_vantage;
pub mod exchange_rate;
pub mod util;

// Re-export the cache for providers sharing one instance
pub use crate::core::cache::Cache;
