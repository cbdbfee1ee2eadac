//! Dataset inspector.
//!
//! Prints the header of a gridded dataset and, for a chosen variable, its
//! time axis, spatial reference and vertical levels.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nc_inspect::{load_dataset, InspectConfig, OutputFormat, Report};

#[derive(Parser, Debug)]
#[command(name = "nc-inspect")]
#[command(about = "Inspect gridded climate datasets")]
struct Args {
    /// Dataset path (.json description, or .nc with the native feature)
    uri: PathBuf,

    /// Variable to summarise
    #[arg(short, long)]
    variable: Option<String>,

    /// Output format [env: NC_INSPECT_FORMAT]
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Log level [env: NC_INSPECT_LOG_LEVEL]
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = InspectConfig::from_env()?.with_overrides(args.format, args.log_level.clone());

    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Logs go to stderr so stdout carries only the report
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    info!(uri = %args.uri.display(), format = ?config.format, "Starting inspection");

    let ds = load_dataset(&args.uri)?;
    let uri = args.uri.display().to_string();
    let report = Report::build(&uri, &ds, args.variable.as_deref())?;

    match config.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
