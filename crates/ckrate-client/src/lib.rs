//! Rating data sources for ckrate
//!
//! This crate fetches dataframes, grouped summaries, and project names,
//! either from the rating service's HTTP API or from saved JSON responses.

pub mod api;
pub mod file;
pub mod source;

pub use api::ApiSource;
pub use file::FileSource;
pub use source::{RatingSource, SummaryQuery};
