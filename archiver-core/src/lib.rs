//! Core library for the weather archiver.
//!
//! This crate defines:
//! - Configuration handling (config file + environment overrides)
//! - The OpenWeather fetch client behind a provider trait
//! - Object-storage provisioning and timestamped snapshot archival
//! - The per-run pipeline tying fetch and archive together
//!
//! It is used by `archiver-cli`, but can also be reused by other binaries or services.

pub mod archive;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod storage;

pub use archive::{ARCHIVE_PREFIX, Archiver, archive_key};
pub use config::{Config, DEFAULT_REGION};
pub use error::{FetchError, StorageError};
pub use model::{Document, WeatherReport, WeatherSnapshot};
pub use pipeline::{CityOutcome, CityStatus, run};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient};
pub use storage::{ObjectStore, location_constraint, s3::S3ObjectStore};
