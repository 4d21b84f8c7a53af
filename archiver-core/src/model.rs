use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

/// Raw provider response document, preserved field-for-field for archival.
pub type Document = serde_json::Map<String, Value>;

/// One weather observation for one city, as returned by the provider.
///
/// The document is kept opaque here; the capture timestamp is added by the
/// archive writer at persist time, never earlier.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub city: String,
    pub document: Document,
}

/// Display fields extracted from a snapshot document.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub condition: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl WeatherSnapshot {
    pub fn new(city: impl Into<String>, document: Document) -> Self {
        Self { city: city.into(), document }
    }

    /// Extract the display fields from the document, checking the documented
    /// schema: `main.temp`, `main.feels_like`, `main.humidity`,
    /// `weather[0].description`. Anything missing or mistyped is reported as
    /// a malformed response.
    pub fn report(&self) -> Result<WeatherReport, FetchError> {
        let parsed: OwCurrent = serde_json::from_value(Value::Object(self.document.clone()))
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .ok_or_else(|| FetchError::Malformed("weather list is empty".to_string()))?;

        Ok(WeatherReport {
            temperature_f: parsed.main.temp,
            feels_like_f: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            condition,
        })
    }
}
