//! ckrate - Render rating and billing summaries from a cloud rating service
//!
//! This library provides functionality to:
//! - Fetch rated dataframes and rate summaries from the rating API or from
//!   saved responses
//! - Turn rated dataframes into exact per-service totals and dense hourly
//!   cost series
//! - Build the project overview and project details tables
//! - Render reports as tables or JSON
//!
//! # Examples
//!
//! ```no_run
//! use ckrate::{
//!     aggregation::HourlyCostAggregator,
//!     period::resolve_period,
//!     report::{load_repartition, today_in},
//!     timezone::TimezoneConfig,
//! };
//! use ckrate_client::FileSource;
//!
//! #[tokio::main]
//! async fn main() -> ckrate::Result<()> {
//!     let source = FileSource::new("./dump")?;
//!     let timezone = TimezoneConfig::utc();
//!     let period = resolve_period(None, None, today_in(&timezone.tz), None);
//!
//!     let aggregator = HourlyCostAggregator::new(timezone);
//!     let repartition = load_repartition(&source, &aggregator, &period, None).await?;
//!     println!("{} services", repartition.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod report;

pub use ckrate_core::{aggregation, columns, config, error, period, series, summary, timezone, types};
pub use ckrate_terminal::output;

// Re-export commonly used types
pub use error::{CkrateError, Result};
pub use series::{Repartition, ServiceSeries};
pub use types::{Dataframe, ServiceId, UsageRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
