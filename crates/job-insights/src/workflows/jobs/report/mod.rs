mod summary;
pub mod views;

pub use summary::{dashboard_stats, JobMarketReport};
