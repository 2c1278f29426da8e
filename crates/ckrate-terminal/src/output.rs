//! Output formatting for ckrate reports
//!
//! This module provides formatters for displaying rating data in different
//! formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and chart renderers
//!
//! # Examples
//!
//! ```
//! use ckrate_core::config::RateFormat;
//! use ckrate_core::series::Repartition;
//! use ckrate_terminal::output::get_formatter;
//!
//! let repartition = Repartition::new();
//!
//! let formatter = get_formatter(false, RateFormat::default());
//! println!("{}", formatter.format_repartition(&repartition, &chrono_tz::UTC));
//!
//! let json_formatter = get_formatter(true, RateFormat::default());
//! println!("{}", json_formatter.format_repartition(&repartition, &chrono_tz::UTC));
//! ```

use chrono::DateTime;
use ckrate_core::columns::GroupbyColumns;
use ckrate_core::config::RateFormat;
use ckrate_core::series::{Repartition, RepartitionTotals};
use ckrate_core::summary::{DetailRow, ProjectSummaryRow};
use prettytable::{Cell, Row, Table, format, row};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeSet;

/// Trait for output formatters
///
/// Implementations provide one rendering of every report ckrate produces.
pub trait OutputFormatter {
    /// Format per-service hourly cost series
    fn format_repartition(&self, data: &Repartition, tz: &chrono_tz::Tz) -> String;

    /// Format the per-project overview
    fn format_project_summary(&self, rows: &[ProjectSummaryRow]) -> String;

    /// Format the details of one project
    fn format_project_details(&self, rows: &[DetailRow], columns: &GroupbyColumns) -> String;
}

/// Table formatter for human-readable output
pub struct TableFormatter {
    rate_format: RateFormat,
}

impl TableFormatter {
    pub fn new(rate_format: RateFormat) -> Self {
        Self { rate_format }
    }

    fn format_rate(&self, rate: &Decimal) -> String {
        self.rate_format.format(rate)
    }

    /// Format an hourly amount
    fn format_amount(amount: f64) -> String {
        format!("{amount:.4}")
    }

    /// Format an epoch bucket key in the given zone
    fn format_bucket(ts: i64, tz: &chrono_tz::Tz) -> String {
        match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
            None => ts.to_string(),
        }
    }

    fn bold(text: &str) -> Cell {
        Cell::new(text).style_spec("b")
    }

    fn right(text: &str) -> Cell {
        Cell::new(text).style_spec("r")
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }

    fn format_service_totals(&self, data: &Repartition, tz: &chrono_tz::Tz) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Service",
            b -> "Cumulated",
            b -> "Active Hours",
            b -> "Peak Hour",
            b -> "Peak"
        ]);

        for (service, series) in data {
            let (peak_hour, peak) = match series.peak() {
                Some((ts, value)) if value > 0.0 => {
                    (Self::format_bucket(ts, tz), Self::format_amount(value))
                }
                _ => ("-".to_string(), "-".to_string()),
            };

            table.add_row(row![
                service.as_str(),
                r -> self.format_rate(&series.cumulated),
                c -> series.active_buckets(),
                peak_hour,
                r -> peak
            ]);
        }

        let totals = RepartitionTotals::from_repartition(data);
        table.add_row(Row::new(vec![Cell::new(""); 5]));
        table.add_row(row![
            b -> "TOTAL",
            b -> self.format_rate(&totals.cumulated),
            "",
            "",
            ""
        ]);

        table.to_string()
    }

    /// Stacked grid: one row per bucket, one column per service
    fn format_hourly_grid(data: &Repartition, tz: &chrono_tz::Tz) -> String {
        let mut table = Self::new_table();

        let mut titles = vec![Self::bold("Hour")];
        titles.extend(data.keys().map(|service| Self::bold(service.as_str())));
        titles.push(Self::bold("Total"));
        table.set_titles(Row::new(titles));

        let buckets: BTreeSet<i64> = data
            .values()
            .flat_map(|series| series.hourly.keys().copied())
            .collect();

        for ts in buckets {
            let mut cells = vec![Cell::new(&Self::format_bucket(ts, tz))];
            let mut total = 0.0;
            for series in data.values() {
                let value = series.value_at(ts);
                total += value;
                cells.push(Self::right(&Self::format_amount(value)));
            }
            cells.push(Self::right(&Self::format_amount(total)));
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_repartition(&self, data: &Repartition, tz: &chrono_tz::Tz) -> String {
        if data.is_empty() {
            return "No rating data for this period.\n".to_string();
        }

        let mut output = self.format_service_totals(data, tz);
        output.push('\n');
        output.push_str(&Self::format_hourly_grid(data, tz));
        output
    }

    fn format_project_summary(&self, rows: &[ProjectSummaryRow]) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Project ID",
            b -> "Project Name",
            b -> "Project Total"
        ]);

        for summary in rows {
            let project_id = summary.tenant_id.as_deref().unwrap_or("-");
            if summary.is_total() {
                table.add_row(Row::new(vec![Cell::new(""); 3]));
                table.add_row(row![
                    b -> project_id,
                    b -> summary.name,
                    br -> summary.formatted_rate
                ]);
            } else {
                table.add_row(row![
                    project_id,
                    summary.name,
                    r -> summary.formatted_rate
                ]);
            }
        }

        table.to_string()
    }

    fn format_project_details(&self, rows: &[DetailRow], columns: &GroupbyColumns) -> String {
        let mut table = Self::new_table();
        let visible: Vec<_> = columns.visible().collect();

        let mut titles: Vec<Cell> = visible.iter().map(|c| Self::bold(&c.label)).collect();
        titles.push(Self::bold("Rate"));
        table.set_titles(Row::new(titles));

        for detail in rows {
            let mut cells: Vec<Cell> = visible
                .iter()
                .map(|c| Cell::new(detail.field(&c.field).unwrap_or("")))
                .collect();

            if detail.is_total() {
                cells = cells.into_iter().map(|c| c.style_spec("b")).collect();
                cells.push(Cell::new(&detail.formatted_rate).style_spec("br"));
            } else {
                cells.push(Self::right(&detail.formatted_rate));
            }
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }
}

/// JSON formatter for machine-readable output
///
/// Hourly series are emitted as `[epoch, amount]` pairs in time order, ready
/// for stacked chart renderers.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_repartition(&self, data: &Repartition, _tz: &chrono_tz::Tz) -> String {
        let output = json!({
            "services": data,
            "totals": RepartitionTotals::from_repartition(data),
        });

        serde_json::to_string_pretty(&output).unwrap_or_default()
    }

    fn format_project_summary(&self, rows: &[ProjectSummaryRow]) -> String {
        let output = json!({
            "projects": rows,
        });

        serde_json::to_string_pretty(&output).unwrap_or_default()
    }

    fn format_project_details(&self, rows: &[DetailRow], columns: &GroupbyColumns) -> String {
        let output = json!({
            "columns": columns.iter().map(|c| json!({
                "field": c.field,
                "label": c.label,
                "visible": c.visible,
            })).collect::<Vec<_>>(),
            "rows": rows.iter().map(|r| json!({
                "id": r.row_id(columns),
                "fields": r.fields,
                "rate": r.rate,
                "formatted_rate": r.formatted_rate,
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&output).unwrap_or_default()
    }
}

/// Get the appropriate formatter based on output format preference
pub fn get_formatter(json: bool, rate_format: RateFormat) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new(rate_format))
    }
}
