//! Hourly cost aggregation
//!
//! Buckets rated records into per-service cost series for stacked
//! time-series charts. Aggregation runs in three passes:
//!
//! 1. Every record is parsed and added to its service's exact decimal
//!    total and to the float bucket keyed by the record's parsed timestamp.
//!    The global min/max timestamp of the batch is tracked on the way.
//! 2. Every service gets a bucket for each 3600-second step from the global
//!    minimum to the global maximum, zero when the service was idle. All
//!    series therefore share the same x-axis.
//! 3. Buckets are kept in a `BTreeMap`, so consumers always iterate them in
//!    ascending time order.
//!
//! Bucket keys are the exact parsed timestamps. They are not floored to the
//! hour, so the grid is only clean when the input is hour-aligned.
//!
//! # Examples
//!
//! ```
//! use ckrate_core::aggregation::HourlyCostAggregator;
//! use ckrate_core::timezone::TimezoneConfig;
//! use ckrate_core::types::UsageRecord;
//! use serde_json::json;
//!
//! let aggregator = HourlyCostAggregator::new(TimezoneConfig::utc());
//! let records = vec![
//!     UsageRecord::new("compute", "2024-01-01T00:00:00", json!(1.5)),
//!     UsageRecord::new("volume", "2024-01-01T01:00:00", json!("0.25")),
//! ];
//!
//! let repartition = aggregator.aggregate(&records).unwrap();
//! assert_eq!(repartition.len(), 2);
//! for series in repartition.values() {
//!     assert_eq!(series.hourly.len(), 2);
//! }
//! ```

use crate::error::{CkrateError, Result};
use crate::series::{Repartition, ServiceSeries};
use crate::timezone::TimezoneConfig;
use crate::types::{Dataframe, ServiceId, UsageRecord, parse_amount};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use tracing::debug;

/// Width of one chart step in seconds
pub const HOUR_STEP_SECS: i64 = 3600;

/// Accumulator for one aggregation call
#[derive(Default)]
struct SeriesAccumulator {
    services: HashMap<ServiceId, ServiceSeries>,
    span: Option<(i64, i64)>,
}

impl SeriesAccumulator {
    fn observe(&mut self, timestamp: i64) {
        self.span = Some(match self.span {
            Some((start, end)) => (start.min(timestamp), end.max(timestamp)),
            None => (timestamp, timestamp),
        });
    }

    fn add(&mut self, service: ServiceId, timestamp: i64, amount: Decimal) {
        let series = self.services.entry(service).or_default();
        series.cumulated += amount;
        *series.hourly.entry(timestamp).or_insert(0.0) += amount.to_f64().unwrap_or(0.0);
    }

    /// Zero-fill every service over the shared span
    fn densify(&mut self) {
        let Some((start, end)) = self.span else {
            return;
        };

        let mut t = start;
        while t <= end {
            for series in self.services.values_mut() {
                series.hourly.entry(t).or_insert(0.0);
            }
            t += HOUR_STEP_SECS;
        }
    }

    fn finish(mut self) -> Repartition {
        self.densify();
        self.services.into_iter().collect()
    }
}

/// Aggregates rated records into hourly per-service cost series
#[derive(Debug, Clone)]
pub struct HourlyCostAggregator {
    timezone_config: TimezoneConfig,
}

impl HourlyCostAggregator {
    /// Create an aggregator interpreting timestamps in the given zone
    pub fn new(timezone_config: TimezoneConfig) -> Self {
        Self { timezone_config }
    }

    /// Get the timezone configuration
    pub fn timezone_config(&self) -> &TimezoneConfig {
        &self.timezone_config
    }

    /// Aggregate flattened usage records
    ///
    /// Fails on the first record with a malformed timestamp
    /// ([`CkrateError::Parse`]) or a non-numeric rating
    /// ([`CkrateError::InvalidAmount`]); nothing is returned in that case.
    pub fn aggregate(&self, records: &[UsageRecord]) -> Result<Repartition> {
        let mut acc = SeriesAccumulator::default();

        for (index, record) in records.iter().enumerate() {
            let describe = || format!("record #{index} (service '{}')", record.service_id);

            let timestamp = self
                .timezone_config
                .begin_to_epoch(&record.begin)
                .map_err(|e| CkrateError::parse(describe(), e))?;
            let amount = parse_amount(&record.rating, "rating", describe)?;

            acc.observe(timestamp);
            acc.add(record.service_id.clone(), timestamp, amount);
        }

        let repartition = acc.finish();
        debug!(
            "Aggregated {} records into {} service series",
            records.len(),
            repartition.len()
        );
        Ok(repartition)
    }

    /// Aggregate dataframes as returned by the storage API
    ///
    /// Same result as flattening with [`UsageRecord::from_dataframes`], except
    /// that frames without resources still widen the shared time span.
    pub fn aggregate_dataframes(&self, dataframes: &[Dataframe]) -> Result<Repartition> {
        let mut acc = SeriesAccumulator::default();

        for (frame_index, frame) in dataframes.iter().enumerate() {
            let timestamp = self
                .timezone_config
                .begin_to_epoch(&frame.begin)
                .map_err(|e| CkrateError::parse(format!("dataframe #{frame_index}"), e))?;
            acc.observe(timestamp);

            for (resource_index, resource) in frame.resources.iter().enumerate() {
                let amount = parse_amount(&resource.rating, "rating", || {
                    format!(
                        "resource #{resource_index} (service '{}') of dataframe #{frame_index}",
                        resource.service
                    )
                })?;
                acc.add(ServiceId::new(&resource.service), timestamp, amount);
            }
        }

        let repartition = acc.finish();
        debug!(
            "Aggregated {} dataframes into {} service series",
            dataframes.len(),
            repartition.len()
        );
        Ok(repartition)
    }
}
