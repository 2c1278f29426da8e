//! Report period resolution
//!
//! Turns the optional start/end dates a user typed into the `begin`/`end`
//! bounds sent to the rating API, with the same fallbacks and warnings a
//! date picker form would give.

use chrono::{Datelike, Days, NaiveDate};
use tracing::warn;

/// Input format of user supplied dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const WARN_END_BEFORE_START: &str = "Invalid time period. The end date should be more recent than the start date. Setting the end as today.";
pub const WARN_FUTURE_START: &str =
    "Invalid time period. You are requesting data from the future which may not exist.";
pub const WARN_INVALID_FORMAT: &str = "Invalid date format: Using this month as default.";

/// Resolved reporting window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Problems found in the user input, in the order they were detected
    pub warnings: Vec<String>,
}

impl ReportPeriod {
    /// Lower bound in API form (`YYYY-MM-DDT00:00:00`)
    pub fn begin_param(&self) -> String {
        format!("{}T00:00:00", self.start.format(DATE_FORMAT))
    }

    /// Upper bound in API form (`YYYY-MM-DDT23:59:59`)
    pub fn end_param(&self) -> String {
        format!("{}T23:59:59", self.end.format(DATE_FORMAT))
    }
}

/// First day of `date`'s month
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of `date`'s month
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Start of the default window: `days_range` days ago, or the first of the month
///
/// A range reaching before the earliest representable date falls back to the
/// first of the month.
pub fn default_start(today: NaiveDate, days_range: Option<u32>) -> NaiveDate {
    days_range
        .filter(|days| *days > 0)
        .and_then(|days| today.checked_sub_days(Days::new(u64::from(days))))
        .unwrap_or_else(|| first_day_of_month(today))
}

fn default_period(today: NaiveDate, days_range: Option<u32>, warnings: Vec<String>) -> ReportPeriod {
    ReportPeriod {
        start: default_start(today, days_range),
        end: last_day_of_month(today),
        warnings,
    }
}

/// Resolve user input into a reporting window
///
/// * Both dates valid: used as given. An end before the start is replaced
///   by the last day of the current month; a start in the future only
///   warns.
/// * Both given but one unparseable: default window with a warning.
/// * Anything else: default window.
pub fn resolve_period(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    days_range: Option<u32>,
) -> ReportPeriod {
    let (Some(start_str), Some(end_str)) = (start, end) else {
        return default_period(today, days_range, Vec::new());
    };

    let parsed = (
        NaiveDate::parse_from_str(start_str.trim(), DATE_FORMAT),
        NaiveDate::parse_from_str(end_str.trim(), DATE_FORMAT),
    );
    let (Ok(start), Ok(mut end)) = parsed else {
        warn!("Rejected report period '{}'..'{}'", start_str, end_str);
        return default_period(today, days_range, vec![WARN_INVALID_FORMAT.to_string()]);
    };

    let mut warnings = Vec::new();
    if end < start {
        warnings.push(WARN_END_BEFORE_START.to_string());
        end = last_day_of_month(today);
    } else if start > today {
        warnings.push(WARN_FUTURE_START.to_string());
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    ReportPeriod {
        start,
        end,
        warnings,
    }
}
