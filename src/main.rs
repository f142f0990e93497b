//! Earthquake Felt-Intensity Service - CLI
//!
//! Fetches a USGS real-time feed snapshot, estimates how strongly each event
//! was felt at the observer's position and prints them strongest first.
//!
//! Usage:
//!   cargo run --release -- --lat 35.62 --lon -117.67      # explicit position
//!   cargo run --release -- --observer ridgecrest --window 7d
//!   cargo run --release -- --endpoint 8080                # serve /felt over HTTP
//!
//! Without --lat/--lon or --observer the position comes from
//! QUAKEMON_LATITUDE / QUAKEMON_LONGITUDE (optionally via .env).
//!
//! Environment:
//!   RUST_LOG          - log filter (default: info)
//!   QUAKEMON_CONFIG   - configuration file (default: quakemon.toml)

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quakemon_service::analysis::ranking::rank;
use quakemon_service::config::{self, Config, DEFAULT_CONFIG_PATH};
use quakemon_service::endpoint::{self, FeltService};
use quakemon_service::ingest::usgs::{EventSource, UsgsFeed};
use quakemon_service::location::{CachedLocation, EnvLocation, LocationProvider, locate_within};
use quakemon_service::model::{IntensityResult, ObserverLocation, TimeWindow};

#[derive(Parser, Debug)]
#[command(
    name = "quakemon",
    version,
    about = "Rank recent earthquakes by how strongly they were felt at a location"
)]
struct Cli {
    /// Observer latitude in degrees
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// Observer longitude in degrees
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// Position accuracy in meters (informational)
    #[arg(long, requires = "lat")]
    accuracy: Option<f64>,

    /// Named observer preset from the configuration file
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    observer: Option<String>,

    /// Feed time window: 24h, 7d or 30d
    #[arg(long, short)]
    window: Option<TimeWindow>,

    /// Maximum number of events to print
    #[arg(long, short, default_value_t = 20)]
    limit: usize,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Configuration file
    #[arg(long, env = "QUAKEMON_CONFIG")]
    config: Option<PathBuf>,

    /// Serve the /felt HTTP endpoint on this port instead of printing
    #[arg(long, value_name = "PORT")]
    endpoint: Option<u16>,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = load_config(cli.config.as_deref())?;
    let window = cli.window.unwrap_or(config.feed.default_window);
    let feed = UsgsFeed::new(config.feed.base_url.clone(), config.fetch_timeout())?;

    if let Some(port) = cli.endpoint {
        println!("🌎 Earthquake Felt-Intensity Service");
        println!("====================================\n");

        let options = config.location_options();
        let default_observer: Arc<dyn LocationProvider + Send + Sync> =
            Arc::new(CachedLocation::new(EnvLocation::from_env(), options.maximum_age));
        let service = FeltService::new(Box::new(feed), window)
            .with_default_observer(default_observer, options.timeout);

        return endpoint::start_endpoint_server(port, service);
    }

    let observer = resolve_observer(&cli, &config)?;
    info!(
        latitude = observer.latitude,
        longitude = observer.longitude,
        %window,
        "ranking felt intensity"
    );

    let events = feed.fetch(window)?;
    let ranked = rank(&events, &observer);

    if cli.json {
        let shown: Vec<&IntensityResult> = ranked.iter().take(cli.limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        print_table(&observer, window, &ranked, cli.limit);
    }

    Ok(())
}

/// Explicit path must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    match path {
        Some(path) => config::load_config_from(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => config::load_config(),
        None => {
            info!("{} not found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Ok(Config::default())
        }
    }
}

fn resolve_observer(cli: &Cli, config: &Config) -> Result<ObserverLocation, Box<dyn Error + Send + Sync>> {
    if let (Some(latitude), Some(longitude)) = (cli.lat, cli.lon) {
        return Ok(ObserverLocation { latitude, longitude, accuracy: cli.accuracy });
    }

    if let Some(name) = &cli.observer {
        return Ok(config.observer(name)?);
    }

    let options = config.location_options();
    Ok(locate_within(Arc::new(EnvLocation::from_env()), options.timeout)?)
}

fn print_table(observer: &ObserverLocation, window: TimeWindow, ranked: &[IntensityResult], limit: usize) {
    println!(
        "🌎 Felt intensity at ({:.4}, {:.4}) - past {}",
        observer.latitude, observer.longitude, window
    );
    println!("   {} events in snapshot\n", ranked.len());

    if ranked.is_empty() {
        println!("   No earthquakes reported in this window.");
        return;
    }

    println!(
        "   {:>5}  {:<11}  {:>5}  {:>9}  {:<16}  {}",
        "I", "Felt", "Mag", "Dist km", "Time (UTC)", "Place"
    );

    for result in ranked.iter().take(limit) {
        let when = result
            .event
            .occurred_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "   {:>5.2}  {:<11}  {:>5.1}  {:>9.1}  {:<16}  {}",
            result.intensity,
            result.intensity_label.as_str(),
            result.event.magnitude,
            result.distance_km,
            when,
            result.event.place
        );
    }

    if ranked.len() > limit {
        println!("\n   ... {} more (use --limit to show more)", ranked.len() - limit);
    }
}
