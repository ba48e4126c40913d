//! Job-market aggregation for the job portal dashboard: listing snapshots,
//! filter selections, grouped counts and shares, and the HTTP surface that
//! serves them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
