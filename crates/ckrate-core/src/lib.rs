//! Core types and computations for ckrate
//!
//! This crate provides the domain types, error handling, timezone handling,
//! the hourly cost aggregator, and the summary rollups used by the other
//! ckrate crates.

pub mod aggregation;
pub mod columns;
pub mod config;
pub mod error;
pub mod period;
pub mod series;
pub mod summary;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use aggregation::HourlyCostAggregator;
pub use error::{CkrateError, Result};
pub use series::{Repartition, ServiceSeries};
pub use types::{Dataframe, ServiceId, SummaryRow, UsageRecord};
