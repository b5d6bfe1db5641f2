use std::{process::ExitCode, time::Duration};

use argh::FromArgs;
use ip_forecast::{Config, FetchError, Pipeline, PipelineError, Stage};
use tracing::{Instrument, debug, info, span};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Print the weather forecast for this machine's approximate location,
/// found from its public IP address.
struct Args {
    /// per-request timeout in seconds
    #[argh(option)]
    timeout_secs: Option<u64>,

    /// also print the IP address and coordinate found by the pipeline
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Ip(IpArgs),
    Locate(LocateArgs),
    Forecast(ForecastArgs),
}

/// Print the public IP address
#[derive(FromArgs)]
#[argh(subcommand, name = "ip")]
struct IpArgs {}

/// Print "latitude longitude" for an IPv4 address
#[derive(FromArgs)]
#[argh(subcommand, name = "locate")]
struct LocateArgs {
    /// dotted-quad IPv4 address
    #[argh(positional)]
    ip_address: String,
}

/// Print the forecast for a coordinate. Give latitude then longitude;
/// put `--` before them when either is negative.
#[derive(FromArgs)]
#[argh(subcommand, name = "forecast")]
struct ForecastArgs {
    /// latitude then longitude
    #[argh(positional)]
    coordinates: Vec<String>,
}

/// Parses arguments, runs the requested stage or the whole pipeline, and
/// prints the result. Failures go to stderr with their stage and kind.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();

    let mut config = Config::from_env();
    if let Some(secs) = args.timeout_secs.filter(|secs| *secs > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let pipeline = Pipeline::from_config(&config)?;

    let outcome = tokio::select! {
        result = execute(&pipeline, &args).instrument(span!(tracing::Level::INFO, "execute")) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            return Ok(ExitCode::from(130));
        }
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} failed ({}): {}", e.stage, e.kind(), e.source);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn execute(pipeline: &Pipeline, args: &Args) -> Result<String, PipelineError> {
    let tag = |stage: Stage| move |e: FetchError| PipelineError::new(stage, e);

    match &args.command {
        Some(Command::Ip(_)) => {
            let ip_address = pipeline
                .ip_address()
                .resolve()
                .await
                .map_err(tag(Stage::IpAddress))?;
            Ok(format!("Public IP Address: {}", ip_address))
        }
        Some(Command::Locate(locate)) => {
            let coordinate = pipeline
                .geolocation()
                .resolve(&locate.ip_address)
                .await
                .map_err(tag(Stage::Geolocation))?;
            Ok(format!("{} {}", coordinate.latitude, coordinate.longitude))
        }
        Some(Command::Forecast(forecast)) => pipeline
            .forecast()
            .resolve_positional(forecast.coordinates.as_slice())
            .await
            .map_err(tag(Stage::Forecast)),
        None => {
            info!("Running full pipeline");
            let report = pipeline.run_report().await?;
            debug!("Pipeline report: {:?}", report);
            if args.verbose {
                Ok(format!(
                    "IP address: {}\nLocation: {}\nForecast: {}",
                    report.ip_address, report.coordinate, report.forecast
                ))
            } else {
                Ok(report.forecast)
            }
        }
    }
}
