//! ckrate - Render rating and billing summaries from a cloud rating service

use ckrate::{
    aggregation::HourlyCostAggregator,
    cli::{Cli, Command},
    columns::GroupbyColumns,
    error::Result,
    output::get_formatter,
    period::resolve_period,
    report::{load_project_details, load_project_summary, load_repartition, today_in},
};
use ckrate_terminal::format_warnings;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The --quiet flag overrides RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ckrate=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !is_terminal::is_terminal(std::io::stderr()) {
        colored::control::set_override(false);
    }

    let config = cli.report_config()?;
    let source = cli.rating_source()?;
    let formatter = get_formatter(cli.json, config.rate_format.clone());

    match &cli.command {
        Command::Repartition(args) => {
            info!("Running repartition report");

            let tz_config = cli.timezone_config()?;
            info!("Using timezone: {}", tz_config.display_name());

            let period = resolve_period(
                args.start.as_deref(),
                args.end.as_deref(),
                today_in(&tz_config.tz),
                config.days_range,
            );
            eprint!("{}", format_warnings(&period.warnings));

            let tz = tz_config.tz;
            let aggregator = HourlyCostAggregator::new(tz_config);
            let repartition =
                load_repartition(source.as_ref(), &aggregator, &period, args.tenant.as_deref())
                    .await?;

            println!("{}", formatter.format_repartition(&repartition, &tz));
        }
        Command::Summary => {
            info!("Running project summary");

            let rows = load_project_summary(source.as_ref(), &config).await?;
            println!("{}", formatter.format_project_summary(&rows));
        }
        Command::Details(args) => {
            info!("Running details report for {}", args.project_id);

            let selection = args.selection(&config)?;
            let columns = GroupbyColumns::new(&config.groupby_list, &selection);
            let rows = load_project_details(source.as_ref(), &args.project_id, &config).await?;
            println!("{}", formatter.format_project_details(&rows, &columns));
        }
    }

    Ok(())
}
