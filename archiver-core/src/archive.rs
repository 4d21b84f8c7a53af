use chrono::{DateTime, Local};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::model::WeatherSnapshot;
use crate::storage::{ObjectStore, location_constraint};

/// Prefix under which all archive records are stored.
pub const ARCHIVE_PREFIX: &str = "weather-data/";

const CONTENT_TYPE_JSON: &str = "application/json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Provisions the destination bucket and writes timestamped snapshot
/// records.
///
/// Built without a store when no bucket is configured; every operation then
/// reports [`StorageError::MissingBucket`] instead of touching the backend.
/// A store that was configured but failed to initialize is carried as
/// [`StorageError::Unavailable`] so per-city reports name the real cause.
pub struct Archiver {
    store: StoreState,
    region: String,
}

enum StoreState {
    Ready(Arc<dyn ObjectStore>),
    MissingName,
    Unavailable(String),
}

impl Archiver {
    pub fn new(store: Option<Arc<dyn ObjectStore>>, region: impl Into<String>) -> Self {
        let store = match store {
            Some(store) => StoreState::Ready(store),
            None => StoreState::MissingName,
        };

        Self { store, region: region.into() }
    }

    /// Archiver for a run whose store failed to initialize. Every operation
    /// reports the reason instead of touching the backend.
    pub fn unavailable(reason: impl Into<String>, region: impl Into<String>) -> Self {
        Self { store: StoreState::Unavailable(reason.into()), region: region.into() }
    }

    fn store(&self) -> Result<&Arc<dyn ObjectStore>, StorageError> {
        match &self.store {
            StoreState::Ready(store) => Ok(store),
            StoreState::MissingName => Err(StorageError::MissingBucket),
            StoreState::Unavailable(reason) => Err(StorageError::Unavailable(reason.clone())),
        }
    }

    /// Ensure the destination bucket exists. Called once per run; a probe
    /// failure of any kind falls through to a single creation attempt.
    pub async fn ensure_bucket(&self) -> Result<(), StorageError> {
        let store = self.store()?;

        match store.bucket_exists().await {
            Ok(true) => {
                debug!("bucket already exists");
                return Ok(());
            }
            Ok(false) => info!("bucket not found, creating"),
            Err(err) => warn!(error = %err, "bucket probe failed, attempting creation"),
        }

        store.create_bucket(location_constraint(&self.region)).await
    }

    /// Timestamp and persist one snapshot. Returns the object key.
    ///
    /// The capture timestamp comes from the local clock, is injected into a
    /// copy of the document under `timestamp`, and is embedded in the key,
    /// so key and body always agree.
    pub async fn archive(&self, snapshot: &WeatherSnapshot) -> Result<String, StorageError> {
        if snapshot.document.is_empty() {
            return Err(StorageError::EmptyDocument);
        }

        let store = self.store()?;

        let timestamp = capture_timestamp(Local::now());
        let key = archive_key(&snapshot.city, &timestamp);

        let mut document = snapshot.document.clone();
        document.insert("timestamp".to_string(), Value::String(timestamp));
        let body = serde_json::to_vec(&document)?;

        store.put_object(&key, &body, CONTENT_TYPE_JSON).await?;
        debug!(city = %snapshot.city, key, bytes = body.len(), "archived snapshot");

        Ok(key)
    }
}

fn capture_timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Object key for one capture: `weather-data/{city}-{timestamp}.json`.
pub fn archive_key(city: &str, timestamp: &str) -> String {
    format!("{ARCHIVE_PREFIX}{city}-{timestamp}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::RecordingStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn snapshot(city: &str) -> WeatherSnapshot {
        let document = json!({
            "main": {"temp": 72.5, "feels_like": 70.1, "humidity": 40},
            "weather": [{"description": "clear sky"}],
        });
        WeatherSnapshot::new(city, document.as_object().cloned().unwrap())
    }

    fn archiver(store: &Arc<RecordingStore>, region: &str) -> Archiver {
        Archiver::new(Some(store.clone() as Arc<dyn ObjectStore>), region)
    }

    #[test]
    fn key_for_a_fixed_capture_time() {
        let captured = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        let timestamp = capture_timestamp(captured);

        assert_eq!(timestamp, "20240301-090507");
        assert_eq!(
            archive_key("Seattle", &timestamp),
            "weather-data/Seattle-20240301-090507.json"
        );
    }

    #[tokio::test]
    async fn ensure_bucket_probes_once_and_skips_creation_when_present() {
        let store = Arc::new(RecordingStore::new(true));

        archiver(&store, "eu-west-2").ensure_bucket().await.unwrap();

        assert_eq!(*store.probes.lock().unwrap(), 1);
        assert!(store.creates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ensure_bucket_creates_with_the_region_as_constraint() {
        let store = Arc::new(RecordingStore::new(false));

        archiver(&store, "eu-west-2").ensure_bucket().await.unwrap();

        assert_eq!(*store.creates.lock().unwrap(), vec![Some("eu-west-2".to_string())]);
    }

    #[tokio::test]
    async fn ensure_bucket_omits_the_constraint_in_the_default_region() {
        let store = Arc::new(RecordingStore::new(false));

        archiver(&store, "us-east-1").ensure_bucket().await.unwrap();

        assert_eq!(*store.creates.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn probe_failure_falls_through_to_creation() {
        let store = Arc::new(RecordingStore::with_failing_probe());

        archiver(&store, "eu-west-2").ensure_bucket().await.unwrap();

        assert_eq!(store.creates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_bucket_without_a_configured_bucket_reports_missing() {
        let archiver = Archiver::new(None, "eu-west-2");

        let err = archiver.ensure_bucket().await.unwrap_err();
        assert!(matches!(err, StorageError::MissingBucket));
    }

    #[tokio::test]
    async fn archive_round_trips_the_document_with_an_injected_timestamp() {
        let store = Arc::new(RecordingStore::new(true));
        let snapshot = snapshot("Portland");

        let key = archiver(&store, "eu-west-2").archive(&snapshot).await.unwrap();

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].key, key);
        assert_eq!(puts[0].content_type, "application/json");

        let timestamp = key
            .strip_prefix("weather-data/Portland-")
            .and_then(|rest| rest.strip_suffix(".json"))
            .expect("key follows the archive layout");

        let mut written: serde_json::Map<String, Value> =
            serde_json::from_slice(&puts[0].body).unwrap();
        assert_eq!(written.remove("timestamp"), Some(Value::String(timestamp.to_string())));
        assert_eq!(written, snapshot.document);
    }

    #[tokio::test]
    async fn archive_rejects_an_empty_document_without_touching_storage() {
        let store = Arc::new(RecordingStore::new(true));
        let empty = WeatherSnapshot::new("Seattle", serde_json::Map::new());

        let err = archiver(&store, "eu-west-2").archive(&empty).await.unwrap_err();

        assert!(matches!(err, StorageError::EmptyDocument));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn archive_without_a_configured_bucket_reports_missing() {
        let archiver = Archiver::new(None, "eu-west-2");

        let err = archiver.archive(&snapshot("Seattle")).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingBucket));
    }

    #[tokio::test]
    async fn a_store_that_failed_to_initialize_reports_its_reason() {
        let archiver = Archiver::unavailable("no credentials found", "eu-west-2");

        let err = archiver.archive(&snapshot("Seattle")).await.unwrap_err();
        match err {
            StorageError::Unavailable(reason) => assert_eq!(reason, "no credentials found"),
            other => panic!("expected Unavailable, got {other:?}"),
        }

        let err = archiver.ensure_bucket().await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[tokio::test]
    async fn archive_surfaces_storage_failures() {
        let store = Arc::new(RecordingStore::with_failing_puts());

        let err = archiver(&store, "eu-west-2").archive(&snapshot("Seattle")).await.unwrap_err();

        assert!(matches!(err, StorageError::UnexpectedStatus { op: "put_object", .. }));
    }
}
