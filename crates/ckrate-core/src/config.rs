//! Report configuration
//!
//! Settings that shape how rates and summary tables are presented. They are
//! built once by the binary and passed explicitly to the summary and output
//! functions.

use crate::error::{CkrateError, Result};
use rust_decimal::Decimal;

/// Groupby columns shown by the project details table when none are configured
pub const DEFAULT_GROUPBY_LIST: &[&str] = &["type"];

/// Prefix/postfix decoration applied to every displayed rate
///
/// # Examples
/// ```
/// use ckrate_core::config::RateFormat;
/// use rust_decimal::Decimal;
///
/// let format = RateFormat::new(Some("$".into()), Some(" USD".into()));
/// assert_eq!(format.format(&Decimal::new(1250, 2)), "$12.5 USD");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateFormat {
    pub prefix: Option<String>,
    pub postfix: Option<String>,
}

impl RateFormat {
    pub fn new(prefix: Option<String>, postfix: Option<String>) -> Self {
        Self { prefix, postfix }
    }

    /// Render a rate with trailing zeros dropped and affixes applied
    pub fn format(&self, rate: &Decimal) -> String {
        let mut out = String::new();
        if let Some(prefix) = self.prefix.as_deref().filter(|p| !p.is_empty()) {
            out.push_str(prefix);
        }
        out.push_str(&rate.normalize().to_string());
        if let Some(postfix) = self.postfix.as_deref().filter(|p| !p.is_empty()) {
            out.push_str(postfix);
        }
        out
    }
}

/// Everything the summary and output layers need to know about presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub rate_format: RateFormat,
    /// Fields the project details table offers as columns
    pub groupby_list: Vec<String>,
    /// When set, default reports start this many days before today
    pub days_range: Option<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rate_format: RateFormat::default(),
            groupby_list: DEFAULT_GROUPBY_LIST.iter().map(|f| f.to_string()).collect(),
            days_range: None,
        }
    }
}

impl ReportConfig {
    pub fn with_rate_format(mut self, rate_format: RateFormat) -> Self {
        self.rate_format = rate_format;
        self
    }

    pub fn with_groupby_list(mut self, groupby_list: Vec<String>) -> Self {
        self.groupby_list = groupby_list;
        self
    }

    pub fn with_days_range(mut self, days_range: Option<u32>) -> Self {
        self.days_range = days_range.filter(|d| *d > 0);
        self
    }
}

/// Split a comma separated field list, dropping blanks
///
/// Field names may only contain ASCII letters, digits, `_` and `.`.
pub fn parse_field_list(list: &str) -> Result<Vec<String>> {
    let mut fields: Vec<String> = Vec::new();
    for raw in list.split(',') {
        let field = raw.trim();
        if field.is_empty() {
            continue;
        }
        if !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(CkrateError::Config(format!(
                "Invalid groupby field name '{field}'"
            )));
        }
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }
    Ok(fields)
}
