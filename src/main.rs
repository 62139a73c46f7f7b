//! SnowDay - School closure probability calculator
//!
//! The binary provides:
//! - One-off closure estimates for a postal or ZIP code
//! - The 48-hour closure outlook around a base probability
//! - The JSON HTTP API

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rand::RngExt;
use snowday::api::{CalculateResponse, ForecastResponse, outlook_base};
use snowday::{
    CalculationResult, ClosureEngine, ForecastPoint, ForecastProjector, ForecastSummary,
    LocationResolver, SnowDayConfig, WeatherObservation, WeightConfig, WeightPreset, advise, web,
};

/// SnowDay CLI
#[derive(Parser)]
#[command(name = "snowday")]
#[command(about = "Estimate the chance of a snow day", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SNOWDAY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the closure probability for a postal or ZIP code
    Calculate {
        /// US ZIP or Canadian postal code
        #[arg(short, long)]
        zip: String,

        /// Air temperature in °F
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<f64>,

        /// Expected snowfall in inches
        #[arg(long)]
        snowfall: Option<f64>,

        /// Wind speed in mph
        #[arg(long)]
        wind: Option<f64>,

        /// Factor weights as temperature,snowfall,wind,district
        #[arg(long, conflicts_with = "preset")]
        weights: Option<WeightConfig>,

        /// Named weight preset (default, conservative, balanced, snow-sensitive)
        #[arg(long)]
        preset: Option<WeightPreset>,

        /// Also print the 48-hour outlook
        #[arg(long)]
        forecast: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Project the 48-hour outlook around a base probability
    Forecast {
        /// Base closure probability (0-100)
        #[arg(short, long)]
        base: f64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SnowDayConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Calculate {
            zip,
            temperature,
            snowfall,
            wind,
            weights,
            preset,
            forecast,
            json,
        } => {
            let observation =
                resolve_observation(&zip, temperature, snowfall, wind, &mut rand::rng());
            observation.validate()?;

            let weights = resolve_weights(weights, preset, config.weights);
            weights.validate()?;

            run_calculate(&zip, &observation, &weights, forecast, json)
        }
        Commands::Forecast { base, json } => {
            check_base_probability(base)?;
            let (points, summary) = ForecastProjector::project_with_summary(
                base,
                Local::now().fixed_offset(),
                &mut rand::rng(),
            );
            if json {
                let response = ForecastResponse::new(&points, summary.as_ref());
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_forecast(&points, summary.as_ref());
            }
            Ok(())
        }
        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting SnowDay API on {}", config.bind_address());
            web::run(config).await
        }
    }
}

/// Readings from the command line, or demo conditions for the code's
/// region when any of the three is missing
fn resolve_observation<R: RngExt + ?Sized>(
    zip: &str,
    temperature: Option<f64>,
    snowfall: Option<f64>,
    wind: Option<f64>,
    rng: &mut R,
) -> WeatherObservation {
    match (temperature, snowfall, wind) {
        (Some(t), Some(s), Some(w)) => WeatherObservation::new(t, s, w),
        _ => {
            warn!("Temperature, snowfall and wind not all given, using demo conditions");
            let region = LocationResolver::classify(zip).region;
            WeatherObservation::demo(region, rng)
        }
    }
}

/// Explicit weights, then the preset, then the configured defaults
fn resolve_weights(
    weights: Option<WeightConfig>,
    preset: Option<WeightPreset>,
    configured: WeightConfig,
) -> WeightConfig {
    weights
        .or_else(|| preset.map(WeightPreset::weights))
        .unwrap_or(configured)
}

fn check_base_probability(base: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&base) {
        bail!("Base probability must be between 0 and 100, got {base}");
    }
    Ok(())
}

fn init_tracing(config: &SnowDayConfig, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run_calculate(
    zip: &str,
    observation: &WeatherObservation,
    weights: &WeightConfig,
    with_forecast: bool,
    json: bool,
) -> Result<()> {
    let result = ClosureEngine::compute(observation, zip, weights);

    let (points, summary) = if with_forecast {
        ForecastProjector::project_with_summary(
            outlook_base(&result),
            Local::now().fixed_offset(),
            &mut rand::rng(),
        )
    } else {
        (Vec::new(), None)
    };

    if json {
        println!("{}", calculation_json(zip, &result, &points, summary.as_ref())?);
        return Ok(());
    }

    print_result(&result);
    if with_forecast {
        println!();
        print_forecast(&points, summary.as_ref());
    }
    Ok(())
}

fn calculation_json(
    zip: &str,
    result: &CalculationResult,
    points: &[ForecastPoint],
    summary: Option<&ForecastSummary>,
) -> Result<String> {
    let response = CalculateResponse::new(zip, result, points, summary);
    Ok(serde_json::to_string_pretty(&response)?)
}

fn print_result(result: &CalculationResult) {
    println!("{}", result.location);
    println!(
        "Snow day probability: {}% ({})",
        result.probability, result.risk
    );
    println!("   {}", result.recommendation);

    println!();
    println!("Conditions:");
    println!("  Temperature: {}", result.descriptions.temperature);
    println!("  Snowfall:    {}", result.descriptions.snowfall);
    println!("  Wind:        {}", result.descriptions.wind_speed);

    let distribution = result.applied_weights.distribution();
    let shares = result.contribution_shares();
    println!();
    println!("Factor          Weight   Share");
    for (name, weight, share) in [
        ("Temperature", distribution.temperature, shares.temperature),
        ("Snowfall", distribution.snowfall, shares.snowfall),
        ("Wind", distribution.wind_speed, shares.wind_speed),
        ("District", distribution.school_district, shares.school_district),
    ] {
        println!("  {name:<13} {weight:>5.1}%  {share:>5.1}%");
    }

    println!();
    println!("Advice:");
    for advice in advise(result) {
        println!("  [{}] {}: {}", advice.priority, advice.title, advice.description);
    }
}

fn print_forecast(points: &[ForecastPoint], summary: Option<&ForecastSummary>) {
    let today = Local::now().date_naive();

    if let Some(summary) = summary {
        println!(
            "48-hour outlook: peak {}% at {}, average {}%",
            summary.peak_probability,
            summary.peak_at.format("%a %-I:%M %p"),
            summary.average_probability
        );
    }
    for point in points {
        let bar = "█".repeat(usize::from(point.probability / 5));
        println!("  {:<24} {:>3}% {}", point.label(today), point.probability, bar);
    }
}
