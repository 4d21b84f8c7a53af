use crate::{error::FetchError, model::WeatherSnapshot};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current weather observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`, used verbatim as the location
    /// query. Returns the provider's response document unmodified; field
    /// extraction is the caller's job (see `WeatherSnapshot::report`).
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}
