//! Aggregated cost series types
//!
//! Pure data structures produced by the hourly aggregator and consumed by
//! the output formatters.

use crate::types::ServiceId;
use rust_decimal::Decimal;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Per-service cost series keyed by service identifier
pub type Repartition = BTreeMap<ServiceId, ServiceSeries>;

/// Cost series of a single service
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceSeries {
    /// Exact sum of every amount attributed to the service
    pub cumulated: Decimal,
    /// Float amount per epoch-second key, ascending
    #[serde(serialize_with = "serialize_points")]
    pub hourly: BTreeMap<i64, f64>,
}

impl ServiceSeries {
    /// Iterate `(epoch, amount)` pairs in time order
    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.hourly.iter().map(|(ts, value)| (*ts, *value))
    }

    /// Amount recorded at `ts`, zero when absent
    pub fn value_at(&self, ts: i64) -> f64 {
        self.hourly.get(&ts).copied().unwrap_or(0.0)
    }

    /// Number of buckets with non-zero activity
    pub fn active_buckets(&self) -> usize {
        self.hourly.values().filter(|v| **v != 0.0).count()
    }

    /// Bucket with the highest amount; the earliest one wins ties
    pub fn peak(&self) -> Option<(i64, f64)> {
        self.points()
            .fold(None, |best: Option<(i64, f64)>, (ts, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((ts, value)),
            })
    }
}

fn serialize_points<S>(hourly: &BTreeMap<i64, f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(hourly.len()))?;
    for point in hourly {
        seq.serialize_element(&point)?;
    }
    seq.end()
}

/// Totals across every series of a repartition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepartitionTotals {
    pub cumulated: Decimal,
    pub services: usize,
    /// Union of all bucket keys
    pub buckets: usize,
}

impl RepartitionTotals {
    pub fn from_repartition(repartition: &Repartition) -> Self {
        let mut totals = Self {
            services: repartition.len(),
            ..Self::default()
        };
        let mut keys = std::collections::BTreeSet::new();
        for series in repartition.values() {
            totals.cumulated += series.cumulated;
            keys.extend(series.hourly.keys().copied());
        }
        totals.buckets = keys.len();
        totals
    }
}
