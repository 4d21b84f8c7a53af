use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{Document, WeatherSnapshot};

use super::WeatherProvider;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the OpenWeather current-conditions endpoint.
///
/// Holds one long-lived HTTP client reused across all fetches in a run.
/// The API key is optional so a misconfigured run can still report the
/// failure per city instead of refusing to start.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: OPENWEATHER_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn new_with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(FetchError::MissingApiKey);
        };

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", api_key), ("units", "imperial")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let document: Document = serde_json::from_str(&body)?;
        debug!(city, fields = document.len(), "fetched current conditions");

        Ok(WeatherSnapshot::new(city, document))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // The cutoff can land inside a multi-byte character; back up to the
    // nearest boundary before slicing.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}
