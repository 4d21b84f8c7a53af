use tracing::{info, warn};

use crate::archive::Archiver;
use crate::error::{FetchError, StorageError};
use crate::model::WeatherReport;
use crate::provider::WeatherProvider;

/// How one city's pass through the pipeline ended.
#[derive(Debug)]
pub enum CityStatus {
    /// Snapshot persisted under this key.
    Archived(String),
    /// Fetch or extraction failed; archival was skipped.
    FetchFailed(FetchError),
    /// Fetched fine, but the write failed.
    ArchiveFailed(StorageError),
}

/// Per-city outcome reported to the operator.
#[derive(Debug)]
pub struct CityOutcome {
    pub city: String,
    /// Display fields, present whenever extraction succeeded.
    pub report: Option<WeatherReport>,
    pub status: CityStatus,
}

impl CityOutcome {
    pub fn archived(&self) -> bool {
        matches!(self.status, CityStatus::Archived(_))
    }
}

/// Run the pipeline once: provision the bucket, then fetch and archive every
/// configured city in order. All failures are city-local; every city is
/// attempted regardless of earlier outcomes.
pub async fn run(
    provider: &dyn WeatherProvider,
    archiver: &Archiver,
    cities: &[String],
) -> Vec<CityOutcome> {
    if let Err(err) = archiver.ensure_bucket().await {
        warn!(error = %err, "bucket provisioning failed, archive writes may fail");
    }

    let mut outcomes = Vec::with_capacity(cities.len());
    for city in cities {
        outcomes.push(process_city(provider, archiver, city).await);
    }

    outcomes
}

async fn process_city(
    provider: &dyn WeatherProvider,
    archiver: &Archiver,
    city: &str,
) -> CityOutcome {
    info!(city, "fetching current weather");

    let snapshot = match provider.current(city).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(city, error = %err, "fetch failed");
            return CityOutcome {
                city: city.to_string(),
                report: None,
                status: CityStatus::FetchFailed(err),
            };
        }
    };

    // A document that misses the documented schema is skipped; the remaining
    // cities still run.
    let report = match snapshot.report() {
        Ok(report) => report,
        Err(err) => {
            warn!(city, error = %err, "response is missing expected fields, skipping archive");
            return CityOutcome {
                city: city.to_string(),
                report: None,
                status: CityStatus::FetchFailed(err),
            };
        }
    };

    info!(
        city,
        temperature_f = report.temperature_f,
        feels_like_f = report.feels_like_f,
        humidity_pct = report.humidity_pct,
        condition = %report.condition,
        "fetched current conditions"
    );

    match archiver.archive(&snapshot).await {
        Ok(key) => CityOutcome {
            city: city.to_string(),
            report: Some(report),
            status: CityStatus::Archived(key),
        },
        Err(err) => {
            warn!(city, error = %err, "archive failed");
            CityOutcome {
                city: city.to_string(),
                report: Some(report),
                status: CityStatus::ArchiveFailed(err),
            }
        }
    }
}
