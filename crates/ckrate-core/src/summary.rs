//! Rating summary rollups
//!
//! Turns grouped summary results into the rows of the two summary tables:
//! the per-project overview (with a cloud-wide total) and the per-project
//! details grouped by the configured fields (with a project total).

use crate::columns::GroupbyColumns;
use crate::config::RateFormat;
use crate::error::Result;
use crate::types::{SummaryRow, parse_amount};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Pseudo project id of the cloud-wide total row
pub const ALL_PROJECTS: &str = "ALL";

/// Display name of the cloud-wide total row
pub const CLOUD_TOTAL_NAME: &str = "Cloud Total";

/// Display name for projects missing from the project listing
pub const UNKNOWN_PROJECT_NAME: &str = "-";

/// Groupby value of the details total row
pub const DETAILS_TOTAL: &str = "TOTAL";

/// Field the details total row is stored under
pub const DETAILS_TOTAL_FIELD: &str = "type";

/// One row of the project overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummaryRow {
    /// Project the rate belongs to, `ALL` for the total row
    pub tenant_id: Option<String>,
    pub name: String,
    pub rate: Decimal,
    pub formatted_rate: String,
}

impl ProjectSummaryRow {
    /// Key of the details view this row links to
    pub fn details_key(&self) -> Option<&str> {
        self.tenant_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_total(&self) -> bool {
        self.tenant_id.as_deref() == Some(ALL_PROJECTS)
    }
}

/// One row of the project details table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    /// Groupby values as display text
    pub fields: BTreeMap<String, String>,
    pub rate: Decimal,
    pub formatted_rate: String,
}

impl DetailRow {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn row_id(&self, columns: &GroupbyColumns) -> String {
        columns.row_id(&self.fields)
    }

    pub fn is_total(&self) -> bool {
        self.field(DETAILS_TOTAL_FIELD) == Some(DETAILS_TOTAL)
    }
}

fn row_rate(row: &SummaryRow, index: usize) -> Result<Decimal> {
    parse_amount(&row.rate, "rate", || format!("summary row #{index}"))
}

/// Build the project overview from a summary grouped by `project_id`
///
/// Names come from `projects` (id to name); unknown projects show `-`. A
/// final `ALL` row named `Cloud Total` carries the sum of every rate.
pub fn summarize_projects(
    results: &[SummaryRow],
    projects: &HashMap<String, String>,
    rate_format: &RateFormat,
) -> Result<Vec<ProjectSummaryRow>> {
    let mut rows = Vec::with_capacity(results.len() + 1);
    let mut total = Decimal::ZERO;

    for (index, result) in results.iter().enumerate() {
        let rate = row_rate(result, index)?;
        total += rate;

        let tenant_id = result.field("project_id");
        let name = tenant_id
            .as_ref()
            .and_then(|id| projects.get(id))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PROJECT_NAME.to_string());

        rows.push(ProjectSummaryRow {
            tenant_id,
            name,
            rate,
            formatted_rate: rate_format.format(&rate),
        });
    }

    rows.push(ProjectSummaryRow {
        tenant_id: Some(ALL_PROJECTS.to_string()),
        name: CLOUD_TOTAL_NAME.to_string(),
        rate: total,
        formatted_rate: rate_format.format(&total),
    });

    debug!("Summarized {} projects", results.len());
    Ok(rows)
}

/// Build the details rows of one project (or `ALL`)
///
/// Every groupby field present in a result is kept as text; a final row
/// with `type` = `TOTAL` carries the sum of every rate.
pub fn summarize_details(
    results: &[SummaryRow],
    rate_format: &RateFormat,
) -> Result<Vec<DetailRow>> {
    let mut rows = Vec::with_capacity(results.len() + 1);
    let mut total = Decimal::ZERO;

    for (index, result) in results.iter().enumerate() {
        let rate = row_rate(result, index)?;
        total += rate;

        let fields = result
            .fields
            .keys()
            .filter_map(|name| result.field(name).map(|value| (name.clone(), value)))
            .collect();

        rows.push(DetailRow {
            fields,
            rate,
            formatted_rate: rate_format.format(&rate),
        });
    }

    let mut fields = BTreeMap::new();
    fields.insert(DETAILS_TOTAL_FIELD.to_string(), DETAILS_TOTAL.to_string());
    rows.push(DetailRow {
        fields,
        rate: total,
        formatted_rate: rate_format.format(&total),
    });

    Ok(rows)
}
