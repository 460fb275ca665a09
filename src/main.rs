use std::path::PathBuf;
use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use log::{error, info};
use demandcast::analytics::ACCURACY_NOISE_STREAM;
use demandcast::batch::{collect_files, run_batch, RowOutcome};
use demandcast::config::{load_config, Config};
use demandcast::logging::setup_logger;
use demandcast::noise::SeededNoise;
use demandcast::report::Dashboard;
use demandcast::service::{PredictionService, PredictionSession};
use demandcast::validation::{validate, RawForecastInput};

#[derive(Parser)]
#[command(name = "demandcast", version, about = "Hourly electricity demand forecasting")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seed for the noise source, overrides the configured seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print JSON instead of the text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a 24-hour forecast from weather parameters
    Predict {
        /// Temperature in °C
        #[arg(long, default_value = "28")]
        temperature: String,
        /// Relative humidity in %
        #[arg(long, default_value = "75")]
        humidity: String,
        /// Rainfall in mm
        #[arg(long, default_value = "0")]
        rainfall: String,
        /// Wind speed in km/h
        #[arg(long, default_value = "12")]
        wind_speed: String,
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Start hour 0-23, defaults to the current hour
        #[arg(long)]
        hour: Option<String>,
        /// Model, one of ridge, rf, lstm
        #[arg(long, default_value = "lstm")]
        model: String,
    },
    /// Generate forecasts for every row of one or more CSV files
    Batch {
        /// CSV files or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config).context("loading configuration")?;
    if cli.seed.is_some() {
        config.generator.seed = cli.seed;
    }
    setup_logger(&config.general).context("setting up logging")?;
    info!("demandcast version: {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Predict { temperature, humidity, rainfall, wind_speed, date, hour, model } => {
            let now = Local::now();
            let raw = RawForecastInput {
                temperature,
                humidity,
                rainfall,
                wind_speed,
                date: date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
                hour: hour.unwrap_or_else(|| now.hour().to_string()),
                model,
            };
            predict(&config, raw, cli.json).await
        }
        Command::Batch { patterns } => batch(&config, &patterns, cli.json),
    }
}

/// Validates the input, runs one prediction and prints the dashboard
///
/// # Arguments
///
/// * 'config' - configuration struct
/// * 'raw' - raw input from the command line
/// * 'json' - print JSON instead of text
async fn predict(config: &Config, raw: RawForecastInput, json: bool) -> Result<()> {
    let request = validate(&raw, &config.validation).context("invalid input")?;
    let session = PredictionSession::new(PredictionService::from_config(config));

    info!("Generating forecast: {}", request);
    let submission = session.submit(request);
    tokio::pin!(submission);
    let result = tokio::select! {
        r = &mut submission => r,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            submission.await
        }
    };
    result.inspect_err(|e| error!("{}", e))?;

    let prediction = session.current().context("no prediction on display")?;
    let mut accuracy_noise = SeededNoise::for_stream(config.generator.seed, ACCURACY_NOISE_STREAM);
    let dashboard = Dashboard::new(prediction, &mut accuracy_noise);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", dashboard);
    }

    Ok(())
}

/// Runs all rows of the matching CSV files and prints the outcome per row
///
/// # Arguments
///
/// * 'config' - configuration struct
/// * 'patterns' - CSV files or glob patterns
/// * 'json' - print JSON instead of text
fn batch(config: &Config, patterns: &[String], json: bool) -> Result<()> {
    let files: Vec<PathBuf> = collect_files(patterns)?;
    let service = PredictionService::from_config(config);
    let rows = run_batch(&files, &config.validation, &service)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        match &row.outcome {
            RowOutcome::Ok { prediction, analytics } => {
                println!("{}:{} {} -> avg {:.0} MW, peak {:.0} MW at {}, total {:.0} MWh",
                         row.file, row.line, prediction.request, analytics.average, analytics.max,
                         analytics.peaks.first().map_or("-", |p| p.hour_label.as_str()), analytics.total);
            }
            RowOutcome::Error { message } => {
                println!("{}:{} error: {}", row.file, row.line, message);
            }
        }
    }
    let failed = rows.iter().filter(|r| !r.is_ok()).count();
    println!("{} rows, {} failed", rows.len(), failed);

    Ok(())
}
