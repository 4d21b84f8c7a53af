use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

const ENV_API_KEY: &str = "OPEN_WEATHER_API_KEY";
const ENV_BUCKET: &str = "AWS_BUCKET_NAME";
const ENV_REGION: &str = "AWS_REGION";

/// Region used when `AWS_REGION` is set nowhere.
pub const DEFAULT_REGION: &str = "eu-west-2";

/// Top-level configuration for one archiver run.
///
/// Values come from an optional `config.toml` in the platform config
/// directory, overridden by the `OPEN_WEATHER_API_KEY`, `AWS_BUCKET_NAME`
/// and `AWS_REGION` environment variables. Blank values count as unset.
///
/// Example TOML:
/// api_key = "..."
/// bucket = "my-weather-archive"
/// region = "eu-west-2"
/// cities = ["Philadelphia", "Seattle", "New York"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key. Required for fetching.
    pub api_key: Option<String>,

    /// Destination bucket name. Required for provisioning and archival.
    pub bucket: Option<String>,

    /// Bucket region.
    #[serde(default = "default_region")]
    pub region: String,

    /// Cities fetched each run, in order.
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            bucket: None,
            region: default_region(),
            cities: default_cities(),
        }
    }
}

impl Config {
    /// Load config from disk (or defaults if no file exists yet), then apply
    /// environment overrides. All environment access happens here; the rest
    /// of the crate receives settings through constructors.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg: Self = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        Ok(cfg
            .overlaid(env_value(ENV_API_KEY), env_value(ENV_BUCKET), env_value(ENV_REGION))
            .normalized())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-archiver", "archiver-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Lay environment values over the file values. A missing or blank
    /// environment value leaves the file value in place.
    fn overlaid(
        mut self,
        api_key: Option<String>,
        bucket: Option<String>,
        region: Option<String>,
    ) -> Self {
        if let Some(key) = api_key.and_then(non_blank) {
            self.api_key = Some(key);
        }
        if let Some(bucket) = bucket.and_then(non_blank) {
            self.bucket = Some(bucket);
        }
        if let Some(region) = region.and_then(non_blank) {
            self.region = region;
        }

        self
    }

    /// Blank strings count as unset, wherever they came from.
    fn normalized(mut self) -> Self {
        self.api_key = self.api_key.and_then(non_blank);
        self.bucket = self.bucket.and_then(non_blank);
        if self.region.trim().is_empty() {
            self.region = default_region();
        }
        self.cities.retain(|city| !city.trim().is_empty());

        self
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_cities() -> Vec<String> {
    vec![
        "Philadelphia".to_string(),
        "Seattle".to_string(),
        "New York".to_string(),
    ]
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
