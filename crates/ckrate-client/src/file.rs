//! JSON file rating source
//!
//! Serves rating queries from a directory of saved API responses:
//!
//! - `dataframes.json`: a dataframes response (`{"dataframes": [...]}`)
//! - `summary.json`: ungrouped summary rows (`{"results": [...]}`)
//! - `projects.json`: optional project listing (`{"projects": [...]}`)
//!
//! Queries are answered the way the API would: dataframes are restricted to
//! the requested window and project, and summary rows are filtered and then
//! regrouped by the requested fields.

use crate::source::{RatingSource, SummaryQuery};
use async_trait::async_trait;
use ckrate_core::error::{CkrateError, Result};
use ckrate_core::types::{
    DataframeResponse, ProjectsResponse, SummaryResponse, SummaryRow, parse_amount,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DATAFRAMES_FILE: &str = "dataframes.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const PROJECTS_FILE: &str = "projects.json";

/// Length of `YYYY-MM-DDTHH:MM:SS`
const COMPARABLE_TIMESTAMP_LEN: usize = 19;

/// Rating source reading saved responses from a directory
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(CkrateError::Config(format!(
                "Data directory not found: {}",
                dir.display()
            )));
        }
        info!("Reading rating data from {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        debug!("Reading {}", path.display());
        let content = tokio::fs::read_to_string(&path).await?;
        serde_json::from_str(&content).map_err(|e| {
            CkrateError::parse(path.display().to_string(), e.to_string())
        })
    }
}

fn comparable(timestamp: &str) -> &str {
    timestamp
        .get(..COMPARABLE_TIMESTAMP_LEN)
        .unwrap_or(timestamp)
}

/// Whether a row passes every `key:value` filter
///
/// Rows that lack a filtered field are kept; the field is simply not part of
/// their grouping.
fn matches_filters(row: &SummaryRow, filters: &BTreeMap<String, String>) -> bool {
    filters
        .iter()
        .all(|(key, wanted)| row.field(key).is_none_or(|value| &value == wanted))
}

/// Sum rates of rows sharing the same values for `groupby`
///
/// Groups keep first-seen order. With no groupby fields everything collapses
/// into a single row.
fn group_rows(rows: &[SummaryRow], groupby: &[String]) -> Result<Vec<SummaryRow>> {
    let mut groups: Vec<(Vec<Option<String>>, Decimal)> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let key: Vec<Option<String>> = groupby.iter().map(|field| row.field(field)).collect();
        let rate = parse_amount(&row.rate, "rate", || format!("summary row #{index}"))?;

        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, sum)) => *sum += rate,
            None => groups.push((key, rate)),
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, sum)| SummaryRow {
            rate: Value::String(sum.normalize().to_string()),
            fields: groupby
                .iter()
                .cloned()
                .zip(key.into_iter().map(|v| v.map_or(Value::Null, Value::String)))
                .collect(),
        })
        .collect())
}

#[async_trait]
impl RatingSource for FileSource {
    async fn get_dataframes(
        &self,
        begin: &str,
        end: &str,
        tenant_id: Option<&str>,
    ) -> Result<DataframeResponse> {
        let mut response: DataframeResponse = self.read_json(DATAFRAMES_FILE).await?;
        let total = response.dataframes.len();

        let (begin, end) = (comparable(begin), comparable(end));
        response.dataframes.retain(|frame| {
            let at = comparable(&frame.begin);
            let in_window = at >= begin && at <= end;
            let for_tenant = match (tenant_id, frame.tenant_id.as_deref()) {
                (Some(wanted), Some(owner)) => wanted == owner,
                _ => true,
            };
            in_window && for_tenant
        });

        debug!(
            "Kept {} of {} dataframes for {}..{}",
            response.dataframes.len(),
            total,
            begin,
            end
        );
        Ok(response)
    }

    async fn get_summary(&self, query: &SummaryQuery) -> Result<SummaryResponse> {
        let response: SummaryResponse = self.read_json(SUMMARY_FILE).await?;

        let filtered: Vec<SummaryRow> = response
            .results
            .into_iter()
            .filter(|row| matches_filters(row, &query.filters))
            .collect();

        let results = group_rows(&filtered, &query.groupby)?;
        debug!(
            "Grouped {} summary rows into {} by {:?}",
            filtered.len(),
            results.len(),
            query.groupby
        );
        Ok(SummaryResponse { results })
    }

    async fn list_projects(&self) -> Result<HashMap<String, String>> {
        if !self.dir.join(PROJECTS_FILE).exists() {
            debug!("No {} in data directory", PROJECTS_FILE);
            return Ok(HashMap::new());
        }

        let response: ProjectsResponse = self.read_json(PROJECTS_FILE).await?;
        Ok(response
            .projects
            .into_iter()
            .map(|project| (project.id, project.name))
            .collect())
    }
}
