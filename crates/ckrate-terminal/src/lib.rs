//! Terminal output for ckrate
//!
//! Table and JSON renderings of ckrate reports, plus the styling of warnings
//! shown next to them.

pub mod output;
pub mod warnings;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
pub use warnings::format_warnings;
