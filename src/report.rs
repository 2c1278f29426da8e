//! Report pipelines
//!
//! Each function runs the queries one ckrate command needs against a
//! [`RatingSource`] and turns the answers into report rows.

use chrono::{NaiveDate, Utc};
use ckrate_client::{RatingSource, SummaryQuery};
use ckrate_core::aggregation::HourlyCostAggregator;
use ckrate_core::config::ReportConfig;
use ckrate_core::error::Result;
use ckrate_core::period::ReportPeriod;
use ckrate_core::series::Repartition;
use ckrate_core::summary::{
    ALL_PROJECTS, DetailRow, ProjectSummaryRow, summarize_details, summarize_projects,
};
use tracing::info;

/// Current date in `tz`
pub fn today_in(tz: &chrono_tz::Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Hourly cost series of every service rated during `period`
pub async fn load_repartition(
    source: &dyn RatingSource,
    aggregator: &HourlyCostAggregator,
    period: &ReportPeriod,
    tenant_id: Option<&str>,
) -> Result<Repartition> {
    let response = source
        .get_dataframes(&period.begin_param(), &period.end_param(), tenant_id)
        .await?;
    info!(
        "Aggregating {} dataframes from {} to {}",
        response.dataframes.len(),
        period.start,
        period.end
    );

    aggregator.aggregate_dataframes(&response.dataframes)
}

/// Rate of every project plus the cloud-wide total
pub async fn load_project_summary(
    source: &dyn RatingSource,
    config: &ReportConfig,
) -> Result<Vec<ProjectSummaryRow>> {
    let query = SummaryQuery::new().with_groupby(["project_id"]);
    let (summary, projects) = tokio::try_join!(source.get_summary(&query), source.list_projects())?;

    summarize_projects(&summary.results, &projects, &config.rate_format)
}

/// Rates of one project (or `ALL`) grouped by the configured fields
pub async fn load_project_details(
    source: &dyn RatingSource,
    project_id: &str,
    config: &ReportConfig,
) -> Result<Vec<DetailRow>> {
    let mut query = SummaryQuery::new().with_groupby(config.groupby_list.iter().cloned());
    if project_id != ALL_PROJECTS {
        query = query.with_filter("project_id", project_id);
    }

    let summary = source.get_summary(&query).await?;
    info!(
        "Project {} has {} rated groups",
        project_id,
        summary.results.len()
    );
    summarize_details(&summary.results, &config.rate_format)
}
