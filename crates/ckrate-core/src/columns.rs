//! Groupby column configuration
//!
//! Summary tables grow one column per groupby field. The set of fields comes
//! from configuration; which of them are shown comes from the user's
//! selection.

use crate::error::{CkrateError, Result};
use std::collections::BTreeMap;

/// Fields a user may select to group the rating summary by
pub const SELECTABLE_FIELDS: &[&str] = &["type", "id", "user_id", "project_id"];

/// Row id used when a row has no groupby values at all
pub const UNKNOWN_ROW_ID: &str = "unknown";

/// Turn a field name into a column label
///
/// Underscores become spaces, every word is title-cased and `Id` is spelled
/// `ID`.
///
/// # Examples
/// ```
/// use ckrate_core::columns::format_title;
///
/// assert_eq!(format_title("user_id"), "User ID");
/// assert_eq!(format_title("type"), "Type");
/// ```
pub fn format_title(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut titled = String::with_capacity(spaced.len());
    let mut prev_cased = false;
    for ch in spaced.chars() {
        if ch.is_alphabetic() {
            if prev_cased {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            prev_cased = true;
        } else {
            titled.push(ch);
            prev_cased = false;
        }
    }
    titled.replace(" Id", " ID").replace("Id", "ID")
}

/// User choice of groupby fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupbySelection {
    fields: Vec<String>,
}

impl GroupbySelection {
    /// No field selected
    pub fn none() -> Self {
        Self::default()
    }

    /// Select every selectable field of `fields`
    pub fn all_of(fields: &[String]) -> Self {
        let mut selection = Self::default();
        for field in fields {
            if SELECTABLE_FIELDS.contains(&field.as_str()) && !selection.contains(field) {
                selection.fields.push(field.clone());
            }
        }
        selection
    }

    /// Parse a comma separated selection, rejecting non-selectable fields
    pub fn parse(list: &str) -> Result<Self> {
        let mut fields: Vec<String> = Vec::new();
        for raw in list.split(',') {
            let field = raw.trim();
            if field.is_empty() {
                continue;
            }
            if !SELECTABLE_FIELDS.contains(&field) {
                return Err(CkrateError::InvalidArgument(format!(
                    "Cannot group by '{field}', expected one of: {}",
                    SELECTABLE_FIELDS.join(", ")
                )));
            }
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        Ok(Self { fields })
    }

    /// Selected fields in selection order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// One groupby column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: String,
    pub label: String,
    pub visible: bool,
}

/// Ordered groupby columns of a summary table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupbyColumns {
    columns: Vec<Column>,
}

impl GroupbyColumns {
    /// Build columns for `fields`, showing only those in `selection`
    pub fn new(fields: &[String], selection: &GroupbySelection) -> Self {
        Self {
            columns: fields
                .iter()
                .map(|field| Column {
                    field: field.clone(),
                    label: format_title(field),
                    visible: selection.contains(field),
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.field.as_str())
    }

    /// Stable id of a row: its non-empty groupby values joined by `_`
    ///
    /// Every configured field counts, visible or not, so rows that differ
    /// only in a hidden dimension still get distinct ids.
    pub fn row_id(&self, values: &BTreeMap<String, String>) -> String {
        let parts: Vec<&str> = self
            .fields()
            .filter_map(|field| values.get(field))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .collect();

        if parts.is_empty() {
            UNKNOWN_ROW_ID.to_string()
        } else {
            parts.join("_")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(list: &[&str]) -> Vec<String> {
        list.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title("type"), "Type");
        assert_eq!(format_title("id"), "ID");
        assert_eq!(format_title("user_id"), "User ID");
        assert_eq!(format_title("project_id"), "Project ID");
        assert_eq!(format_title("resource_type"), "Resource Type");
        assert_eq!(format_title("FLAVOR_name"), "Flavor Name");
        assert_eq!(format_title("metadata.size2gb"), "Metadata.Size2Gb");
    }

    #[test]
    fn test_selection_parse() {
        let selection = GroupbySelection::parse("type, user_id,type").unwrap();
        assert_eq!(selection.fields(), &["type".to_string(), "user_id".to_string()]);
        assert!(selection.contains("user_id"));
        assert!(!selection.contains("id"));

        assert!(GroupbySelection::parse("").unwrap().fields().is_empty());
        assert!(matches!(
            GroupbySelection::parse("type,flavor"),
            Err(CkrateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_selection_all_of_skips_unselectable() {
        let selection = GroupbySelection::all_of(&fields(&["type", "flavor", "user_id", "type"]));
        assert_eq!(selection.fields(), &["type".to_string(), "user_id".to_string()]);
    }

    #[test]
    fn test_column_visibility_follows_selection() {
        let selection = GroupbySelection::parse("user_id").unwrap();
        let columns = GroupbyColumns::new(&fields(&["type", "id", "user_id"]), &selection);

        let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Type", "ID", "User ID"]);

        let visible: Vec<&str> = columns.visible().map(|c| c.field.as_str()).collect();
        assert_eq!(visible, vec!["user_id"]);
    }

    #[test]
    fn test_row_id() {
        let columns = GroupbyColumns::new(&fields(&["type", "id", "user_id"]), &GroupbySelection::none());

        let mut values = BTreeMap::new();
        values.insert("type".to_string(), "instance".to_string());
        values.insert("user_id".to_string(), "u1".to_string());
        values.insert("id".to_string(), String::new());
        assert_eq!(columns.row_id(&values), "instance_u1");

        assert_eq!(columns.row_id(&BTreeMap::new()), UNKNOWN_ROW_ID);
    }
}
