use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mainline::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mainline")]
#[command(about = "Builds continuous main-contract series from daily futures data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //build the continuous series
    Build {
        //path to the merged per-contract csv
        #[arg(long)]
        data: Option<PathBuf>,

        //instrument code (eg rb, hc, cu)
        #[arg(long)]
        instrument: Option<String>,

        //json configuration; flags given here override it
        #[arg(long)]
        config: Option<PathBuf>,

        //output path for the continuous series csv
        #[arg(long)]
        output: Option<PathBuf>,

        //output path for the oi/volume disagreement log csv
        #[arg(long)]
        diagnostics: Option<PathBuf>,

        //first date to include (YYYYMMDD)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        //last date to include (YYYYMMDD)
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,

        //select dates in parallel
        #[arg(long)]
        parallel: bool,
    },

    //print the trading calendar of an instrument
    Calendar {
        //path to the merged per-contract csv
        #[arg(long)]
        data: PathBuf,

        //instrument code (eg rb, hc, cu)
        #[arg(long)]
        instrument: String,
    },
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    mainline::data::parse_date(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            data,
            instrument,
            config,
            output,
            diagnostics,
            start,
            end,
            parallel,
        } => {
            let mut build_config = match &config {
                Some(path) => BuildConfiguration::from_json_file(path)
                    .context(format!("Failed to read config {:?}", path))?,
                None => BuildConfiguration::default(),
            };

            if let Some(data) = data {
                build_config.data_path = data;
            }
            if let Some(instrument) = instrument {
                build_config.instrument = instrument;
            }
            if output.is_some() {
                build_config.output_path = output;
            }
            if diagnostics.is_some() {
                build_config.diagnostics_path = diagnostics;
            }
            if start.is_some() {
                build_config.start_date = start;
            }
            if end.is_some() {
                build_config.end_date = end;
            }
            build_config.parallel |= parallel;

            run_build(build_config)?;
        }
        Commands::Calendar { data, instrument } => {
            print_calendar(data, instrument)?;
        }
    }

    Ok(())
}

fn run_build(config: BuildConfiguration) -> Result<()> {
    println!("Mainline Continuous Contract Builder");
    println!("====================================\n");

    println!("Data: {:?}", config.data_path);
    println!("Instrument: {}\n", config.instrument);

    let builder = ContinuousBuilder::new(config);
    let result = builder.run()?;

    println!("Summary");
    println!("=======\n");
    result.summary.pretty_print_table();

    if !result.rollovers.is_empty() {
        println!("\nRollovers");
        println!("=========\n");
        pretty_print_rollovers(&result.rollovers);
    }

    if let Some(path) = &builder.config().output_path {
        println!("\nContinuous series saved to {:?}", path);
    }
    if let Some(path) = &builder.config().diagnostics_path {
        println!("Diagnostics saved to {:?}", path);
    }

    Ok(())
}

fn print_calendar(data: PathBuf, instrument: String) -> Result<()> {
    let builder = ContinuousBuilder::new(BuildConfiguration::new(data, instrument));
    let bars = builder.load_bars()?;
    let calendar = build_calendar(&bars).context(format!(
        "No data found for instrument {}",
        builder.config().instrument
    ))?;

    println!("index,date");
    for (index, date) in calendar.iter() {
        println!("{},{}", index, date.format("%Y%m%d"));
    }

    Ok(())
}
