use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archiver_core::{
    Archiver, CityOutcome, CityStatus, Config, ObjectStore, OpenWeatherClient, S3ObjectStore,
    pipeline,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-archiver",
    version,
    about = "Fetch current weather for the configured cities and archive each snapshot to S3"
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_logging();

        let config = Config::load()?;
        report_configuration(&config);

        let provider = OpenWeatherClient::new(config.api_key.clone());
        let archiver = build_archiver(&config);

        let outcomes = pipeline::run(&provider, &archiver, &config.cities).await;

        for outcome in &outcomes {
            print_outcome(outcome);
        }

        let archived = outcomes.iter().filter(|outcome| outcome.archived()).count();
        println!("{archived}/{} cities archived", outcomes.len());

        // City-level failures are already reported above; the run itself
        // always exits cleanly.
        Ok(())
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}

/// Log which settings are present. Values stay out of the logs, the API
/// key above all.
fn report_configuration(config: &Config) {
    if config.api_key.is_none() {
        error!("OPEN_WEATHER_API_KEY is not set, fetches will fail");
    }
    if config.bucket.is_none() {
        error!("AWS_BUCKET_NAME is not set, snapshots will not be archived");
    }

    info!(region = %config.region, cities = config.cities.len(), "starting archiver run");
}

fn build_archiver(config: &Config) -> Archiver {
    let Some(bucket) = config.bucket.as_deref() else {
        return Archiver::new(None, config.region.clone());
    };

    match S3ObjectStore::new(bucket, &config.region) {
        Ok(store) => {
            Archiver::new(Some(Arc::new(store) as Arc<dyn ObjectStore>), config.region.clone())
        }
        Err(err) => {
            error!(error = %err, "failed to initialize the S3 client, archiving is disabled");
            Archiver::unavailable(err.to_string(), config.region.clone())
        }
    }
}

fn print_outcome(outcome: &CityOutcome) {
    if let Some(report) = &outcome.report {
        println!(
            "{}: {:.1}°F (feels like {:.1}°F), {}% humidity, {}",
            outcome.city,
            report.temperature_f,
            report.feels_like_f,
            report.humidity_pct,
            report.condition,
        );
    }

    match &outcome.status {
        CityStatus::Archived(key) => println!("{}: archived as {key}", outcome.city),
        CityStatus::FetchFailed(err) => println!("{}: fetch failed: {err}", outcome.city),
        CityStatus::ArchiveFailed(err) => println!("{}: archive failed: {err}", outcome.city),
    }
}
