mod cli;
mod tables;

use clap::{Parser, crate_version};
use evtariff::{CostBreakdown, Estimator, RateCatalog, RateSchedule, core::Location, prelude::*};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command, OutputFormat},
    tables::{build_breakdown_table, build_comparison_table, build_schedule_table},
};

#[derive(Serialize)]
struct Estimate<'a> {
    rate_schedule: RateSchedule<'a>,
    breakdown: CostBreakdown,
    notes: &'static str,
}

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let catalog = match &args.rates_path {
        Some(path) => RateCatalog::from_toml_file(path)?,
        None => RateCatalog::default(),
    };
    let estimator = Estimator::builder().catalog(&catalog).site(args.site.into()).build();

    match args.command {
        Command::Estimate(estimate_args) => {
            let parameters = estimate_args.tariff.parameters();
            let location = parameters.location();
            let (rate_schedule, breakdown) = estimator
                .calculate_at(location, &parameters)
                .with_context(|| format!("failed to estimate the cost at {location}"))?;
            match args.format {
                OutputFormat::Table => {
                    println!("{}", build_schedule_table(rate_schedule));
                    println!("{}", build_breakdown_table(&breakdown));
                    println!("{}", location.notes());
                }
                OutputFormat::Json => {
                    let estimate =
                        Estimate { rate_schedule, breakdown, notes: location.notes() };
                    println!("{}", serde_json::to_string_pretty(&estimate)?);
                }
            }
        }
        Command::Compare(compare_args) => {
            let breakdowns = compare_args
                .parameters()
                .iter()
                .map(|parameters| {
                    estimator.calculate(parameters).with_context(|| {
                        format!("failed to estimate the cost at {}", parameters.location())
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            match args.format {
                OutputFormat::Table => println!("{}", build_comparison_table(&breakdowns)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdowns)?),
            }
        }
        Command::Rates(rates_args) => match (rates_args.location, args.format) {
            (Some(location), OutputFormat::Table) => {
                println!("{}", build_schedule_table(catalog.schedule(location)));
            }
            (Some(location), OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&catalog.schedule(location))?);
            }
            (None, OutputFormat::Table) => {
                for location in Location::ALL {
                    println!("{}", build_schedule_table(catalog.schedule(location)));
                }
            }
            (None, OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            }
        },
    }

    info!("done!");
    Ok(())
}
