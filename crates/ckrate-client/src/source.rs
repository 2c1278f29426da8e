//! Rating source trait
//!
//! Defines the `RatingSource` trait implemented by every way ckrate can
//! obtain rating data, so the binary can run the same report against a live
//! API or a directory of saved responses.

use async_trait::async_trait;
use ckrate_core::error::Result;
use ckrate_core::types::{DataframeResponse, SummaryResponse};
use std::collections::{BTreeMap, HashMap};

/// Grouping and filtering of a summary query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryQuery {
    pub groupby: Vec<String>,
    pub filters: BTreeMap<String, String>,
}

impl SummaryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groupby<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groupby = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// `groupby` query parameter (`a,b`)
    pub fn groupby_param(&self) -> Option<String> {
        (!self.groupby.is_empty()).then(|| self.groupby.join(","))
    }

    /// `filters` query parameter (`key:value,key:value`)
    pub fn filters_param(&self) -> Option<String> {
        (!self.filters.is_empty()).then(|| {
            self.filters
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}

/// Anything that can answer the rating queries ckrate reports are built from
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Rated dataframes between `begin` and `end`, optionally for one project
    async fn get_dataframes(
        &self,
        begin: &str,
        end: &str,
        tenant_id: Option<&str>,
    ) -> Result<DataframeResponse>;

    /// Grouped rate summary
    async fn get_summary(&self, query: &SummaryQuery) -> Result<SummaryResponse>;

    /// Project id to project name
    async fn list_projects(&self) -> Result<HashMap<String, String>>;
}
