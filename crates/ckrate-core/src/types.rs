//! Core domain types for ckrate
//!
//! This module contains the wire shapes returned by the rating service
//! (dataframes and summary rows) and the flattened [`UsageRecord`] consumed
//! by the hourly aggregator.

use crate::error::{CkrateError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Strongly-typed rated service identifier
///
/// # Examples
/// ```
/// use ckrate_core::types::ServiceId;
///
/// let service = ServiceId::new("compute");
/// assert_eq!(service.as_str(), "compute");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create a new ServiceId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One rated resource inside a dataframe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedResource {
    /// Service the resource was rated under
    pub service: String,
    /// Rated amount; kept raw so non-numeric values can be reported
    #[serde(default)]
    pub rating: Value,
}

/// A billing-period bundle as returned by the storage API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataframe {
    /// Period start, ISO-like (`2024-01-01T10:00:00`)
    pub begin: String,
    /// Period end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Owning project, when the API includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Rated resources in this period
    #[serde(default)]
    pub resources: Vec<RatedResource>,
}

/// Body of a dataframes query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataframeResponse {
    #[serde(default)]
    pub dataframes: Vec<Dataframe>,
}

/// Flattened usage record handed to the hourly aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Service the amount is attributed to
    pub service_id: ServiceId,
    /// Raw timestamp string; only the first 16 characters are significant
    pub begin: String,
    /// Raw amount; must be numeric
    pub rating: Value,
}

impl UsageRecord {
    pub fn new(service_id: impl Into<String>, begin: impl Into<String>, rating: Value) -> Self {
        Self {
            service_id: ServiceId::new(service_id),
            begin: begin.into(),
            rating,
        }
    }

    /// Flatten dataframes into one record per rated resource
    ///
    /// Frames without resources produce no records.
    pub fn from_dataframes(dataframes: &[Dataframe]) -> Vec<Self> {
        dataframes
            .iter()
            .flat_map(|frame| {
                frame.resources.iter().map(move |resource| Self {
                    service_id: ServiceId::new(&resource.service),
                    begin: frame.begin.clone(),
                    rating: resource.rating.clone(),
                })
            })
            .collect()
    }
}

/// One row of a grouped rating summary
///
/// The groupby dimensions vary per query, so everything except `rate` is
/// kept as a loose field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(default)]
    pub rate: Value,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl SummaryRow {
    /// Look up a groupby field as display text
    ///
    /// Strings are returned as-is, numbers and booleans are stringified,
    /// and null or missing fields yield `None`.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Body of a summary query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub results: Vec<SummaryRow>,
}

/// Identity service project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Body of a project listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Parse a raw JSON amount into an exact decimal
///
/// Numbers and numeric strings are accepted; anything else is an
/// [`CkrateError::InvalidAmount`] naming `field` and the record described by
/// `record`.
pub fn parse_amount(
    value: &Value,
    field: &'static str,
    record: impl FnOnce() -> String,
) -> Result<Decimal> {
    let parsed = match value {
        Value::Number(n) => parse_decimal_text(&n.to_string()),
        Value::String(s) => parse_decimal_text(s.trim()),
        _ => None,
    };

    parsed.ok_or_else(|| CkrateError::InvalidAmount {
        field,
        record: record(),
        value: value.to_string(),
    })
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_id() {
        let service = ServiceId::new("image.size");
        assert_eq!(service.as_str(), "image.size");
        assert_eq!(service.to_string(), "image.size");
    }

    #[test]
    fn test_parse_amount_accepts_numbers_and_numeric_strings() {
        let record = || "test".to_string();
        assert_eq!(
            parse_amount(&json!(1.25), "rating", record).unwrap(),
            Decimal::new(125, 2)
        );
        assert_eq!(
            parse_amount(&json!("0.0042"), "rating", record).unwrap(),
            Decimal::new(42, 4)
        );
        assert_eq!(
            parse_amount(&json!(3), "rating", record).unwrap(),
            Decimal::from(3)
        );
        assert_eq!(
            parse_amount(&json!(1e-7), "rating", record).unwrap(),
            Decimal::new(1, 7)
        );
    }

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        for value in [json!("abc"), json!(null), json!([1]), json!({"a": 1}), json!(true)] {
            let err = parse_amount(&value, "rating", || "resource #3".to_string()).unwrap_err();
            match err {
                CkrateError::InvalidAmount { field, record, .. } => {
                    assert_eq!(field, "rating");
                    assert_eq!(record, "resource #3");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_dataframe_deserialization_and_flattening() {
        let body = json!({
            "dataframes": [
                {
                    "begin": "2024-01-01T10:00:00",
                    "end": "2024-01-01T11:00:00",
                    "tenant_id": "p1",
                    "resources": [
                        {"service": "compute", "rating": "0.5", "volume": "1"},
                        {"service": "image.size", "rating": 0.25}
                    ]
                },
                {"begin": "2024-01-01T11:00:00", "resources": []}
            ]
        });

        let response: DataframeResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.dataframes.len(), 2);
        assert_eq!(response.dataframes[0].tenant_id.as_deref(), Some("p1"));

        let records = UsageRecord::from_dataframes(&response.dataframes);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].service_id.as_str(), "compute");
        assert_eq!(records[1].begin, "2024-01-01T10:00:00");
        assert_eq!(records[1].rating, json!(0.25));
    }

    #[test]
    fn test_summary_row_fields() {
        let row: SummaryRow = serde_json::from_value(json!({
            "rate": 12.5,
            "type": "instance",
            "user_id": null,
            "id": 42
        }))
        .unwrap();

        assert_eq!(row.rate, json!(12.5));
        assert_eq!(row.field("type").as_deref(), Some("instance"));
        assert_eq!(row.field("id").as_deref(), Some("42"));
        assert_eq!(row.field("user_id"), None);
        assert_eq!(row.field("project_id"), None);
    }
}
