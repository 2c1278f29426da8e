//! CLI interface for ckrate
//!
//! This module defines the command-line interface using clap. Every setting
//! can also come from a `CKRATE_*` environment variable.
//!
//! # Example
//!
//! ```bash
//! # Hourly cost per service for January 2024
//! ckrate --endpoint http://rating:8889 repartition --start 2024-01-01 --end 2024-01-31
//!
//! # Overview of every project from saved responses
//! ckrate --data-dir ./dump summary --json
//!
//! # Details of one project, showing type and user columns
//! ckrate --groupby-list type,user_id details 6c3b0b2f --groupby type,user_id
//! ```

use ckrate_client::{ApiSource, FileSource, RatingSource};
use ckrate_core::columns::GroupbySelection;
use ckrate_core::config::{RateFormat, ReportConfig, parse_field_list};
use ckrate_core::error::{CkrateError, Result};
use ckrate_core::timezone::TimezoneConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Report on rated cloud usage
#[derive(Parser, Debug, Clone)]
#[command(name = "ckrate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Rating API base URL
    #[arg(long, global = true, env = "CKRATE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Identity API base URL used to resolve project names
    #[arg(long, global = true, env = "CKRATE_IDENTITY_ENDPOINT")]
    pub identity_endpoint: Option<String>,

    /// Read saved API responses from this directory instead of the API
    #[arg(long, global = true, conflicts_with = "endpoint")]
    pub data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Timezone used to read dataframe timestamps (e.g. "Europe/Paris", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Text shown before every rate
    #[arg(long, global = true, env = "CKRATE_RATE_PREFIX")]
    pub rate_prefix: Option<String>,

    /// Text shown after every rate
    #[arg(long, global = true, env = "CKRATE_RATE_POSTFIX")]
    pub rate_postfix: Option<String>,

    /// Comma separated fields the details report groups by
    #[arg(long, global = true, env = "CKRATE_GROUPBY_LIST", default_value = "type")]
    pub groupby_list: String,

    /// Start default reports this many days ago instead of on the first of the month
    #[arg(long, global = true, env = "CKRATE_OVERVIEW_DAYS_RANGE")]
    pub days_range: Option<u32>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments for the repartition report
#[derive(Args, Debug, Clone, Default)]
pub struct RepartitionArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Only include dataframes of this project
    #[arg(long)]
    pub tenant: Option<String>,
}

/// Arguments for the details report
#[derive(Args, Debug, Clone)]
pub struct DetailsArgs {
    /// Project id, or ALL for the whole cloud
    pub project_id: String,

    /// Columns to show (any of type, id, user_id, project_id)
    /// Defaults to every selectable field of the groupby list
    #[arg(long)]
    pub groupby: Option<String>,
}

impl DetailsArgs {
    /// Columns to show, each of which must be in the groupby list
    pub fn selection(&self, config: &ReportConfig) -> Result<GroupbySelection> {
        let Some(list) = &self.groupby else {
            return Ok(GroupbySelection::all_of(&config.groupby_list));
        };

        let selection = GroupbySelection::parse(list)?;
        if let Some(missing) = selection
            .fields()
            .iter()
            .find(|field| !config.groupby_list.contains(field))
        {
            return Err(CkrateError::InvalidArgument(format!(
                "Column '{missing}' is not grouped by, add it to --groupby-list (currently: {})",
                config.groupby_list.join(", ")
            )));
        }
        Ok(selection)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Hourly cost per service over a period
    Repartition(RepartitionArgs),

    /// Rate of every project
    Summary,

    /// Rates of one project grouped by the configured fields
    Details(DetailsArgs),
}

impl Cli {
    /// Presentation settings from the global flags
    pub fn report_config(&self) -> Result<ReportConfig> {
        Ok(ReportConfig::default()
            .with_rate_format(RateFormat::new(
                self.rate_prefix.clone(),
                self.rate_postfix.clone(),
            ))
            .with_groupby_list(parse_field_list(&self.groupby_list)?)
            .with_days_range(self.days_range))
    }

    pub fn timezone_config(&self) -> Result<TimezoneConfig> {
        TimezoneConfig::from_cli(self.timezone.as_deref(), self.utc)
    }

    /// Rating source selected by `--data-dir` or `--endpoint`
    pub fn rating_source(&self) -> Result<Box<dyn RatingSource>> {
        match (&self.data_dir, &self.endpoint) {
            (Some(dir), _) => Ok(Box::new(FileSource::new(dir)?)),
            (None, Some(endpoint)) => Ok(Box::new(ApiSource::new(
                endpoint,
                self.identity_endpoint.as_deref(),
            )?)),
            (None, None) => Err(CkrateError::Config(
                "No rating source: pass --endpoint (or CKRATE_ENDPOINT) or --data-dir".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckrate_core::columns::GroupbyColumns;
    use rust_decimal::Decimal;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["ckrate", "--json", "summary"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Summary));

        let cli = Cli::parse_from([
            "ckrate",
            "repartition",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--tenant",
            "p1",
        ]);
        match &cli.command {
            Command::Repartition(args) => {
                assert_eq!(args.start.as_deref(), Some("2024-01-01"));
                assert_eq!(args.end.as_deref(), Some("2024-01-31"));
                assert_eq!(args.tenant.as_deref(), Some("p1"));
            }
            _ => panic!("Expected Repartition command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ckrate", "details", "ALL", "--utc", "--quiet"]);
        assert!(cli.utc);
        assert!(cli.quiet);
        match &cli.command {
            Command::Details(args) => {
                assert_eq!(args.project_id, "ALL");
                assert!(args.groupby.is_none());
            }
            _ => panic!("Expected Details command"),
        }
    }

    #[test]
    fn test_data_dir_conflicts_with_endpoint() {
        let result = Cli::try_parse_from([
            "ckrate",
            "--endpoint",
            "http://rating:8889",
            "--data-dir",
            "/tmp",
            "summary",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_command_is_rejected() {
        assert!(Cli::try_parse_from(["ckrate", "--json"]).is_err());
    }

    #[test]
    fn test_report_config() {
        let cli = Cli::parse_from([
            "ckrate",
            "--rate-prefix",
            "$",
            "--groupby-list",
            "type, user_id",
            "--days-range",
            "7",
            "summary",
        ]);
        let config = cli.report_config().unwrap();
        assert_eq!(config.rate_format.format(&Decimal::new(25, 1)), "$2.5");
        assert_eq!(config.groupby_list, vec!["type", "user_id"]);
        assert_eq!(config.days_range, Some(7));

        let cli = Cli::parse_from(["ckrate", "--groupby-list", "bad field", "summary"]);
        assert!(matches!(cli.report_config(), Err(CkrateError::Config(_))));
    }

    #[test]
    fn test_details_selection() {
        let config = ReportConfig::default().with_groupby_list(vec![
            "type".to_string(),
            "user_id".to_string(),
            "flavor".to_string(),
        ]);

        let cli = Cli::parse_from(["ckrate", "details", "p1"]);
        let Command::Details(args) = &cli.command else {
            panic!("Expected Details command");
        };
        assert_eq!(
            args.selection(&config).unwrap().fields(),
            &["type".to_string(), "user_id".to_string()]
        );

        let cli = Cli::parse_from(["ckrate", "details", "p1", "--groupby", "user_id"]);
        let Command::Details(args) = &cli.command else {
            panic!("Expected Details command");
        };
        assert_eq!(args.selection(&config).unwrap().fields(), &["user_id".to_string()]);

        let cli = Cli::parse_from(["ckrate", "details", "p1", "--groupby", "flavor"]);
        let Command::Details(args) = &cli.command else {
            panic!("Expected Details command");
        };
        assert!(matches!(
            args.selection(&config),
            Err(CkrateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_details_selection_outside_groupby_list() {
        let cli = Cli::parse_from(["ckrate", "details", "p1", "--groupby", "type,user_id"]);
        let config = cli.report_config().unwrap();
        let Command::Details(args) = &cli.command else {
            panic!("Expected Details command");
        };
        let err = args.selection(&config).unwrap_err();
        assert!(matches!(err, CkrateError::InvalidArgument(_)));
        assert!(err.to_string().contains("user_id"));

        let cli = Cli::parse_from([
            "ckrate",
            "--groupby-list",
            "type,user_id",
            "details",
            "p1",
            "--groupby",
            "type,user_id",
        ]);
        let config = cli.report_config().unwrap();
        let Command::Details(args) = &cli.command else {
            panic!("Expected Details command");
        };
        let selection = args.selection(&config).unwrap();
        let columns = GroupbyColumns::new(&config.groupby_list, &selection);
        let visible: Vec<&str> = columns.visible().map(|c| c.field.as_str()).collect();
        assert_eq!(visible, vec!["type", "user_id"]);
    }

    #[test]
    fn test_timezone_config() {
        let cli = Cli::parse_from(["ckrate", "--timezone", "Asia/Tokyo", "summary"]);
        assert_eq!(cli.timezone_config().unwrap().tz, chrono_tz::Asia::Tokyo);

        let cli = Cli::parse_from(["ckrate", "--timezone", "Asia/Tokyo", "--utc", "summary"]);
        assert!(cli.timezone_config().unwrap().is_utc);

        let cli = Cli::parse_from(["ckrate", "--timezone", "Mars/Olympus", "summary"]);
        assert!(matches!(
            cli.timezone_config(),
            Err(CkrateError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_rating_source_selection() {
        let dir = tempfile::TempDir::new().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();

        let cli = Cli::parse_from(["ckrate", "--data-dir", &dir_arg, "summary"]);
        assert!(cli.rating_source().is_ok());

        let cli = Cli::parse_from(["ckrate", "--endpoint", "http://rating:8889", "summary"]);
        assert!(cli.rating_source().is_ok());
    }
}
