use thiserror::Error;

/// Failures while fetching current conditions from the weather provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No API key is configured; the request is never sent.
    #[error("no OpenWeather API key configured")]
    MissingApiKey,

    /// The request did not produce a response (DNS, connect, TLS, read).
    #[error("request to OpenWeather failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("OpenWeather request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not a JSON object.
    #[error("failed to parse OpenWeather response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded, but is missing fields of the documented schema.
    #[error("malformed OpenWeather response: {0}")]
    Malformed(String),
}

/// Failures while provisioning the bucket or writing archive records.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No bucket name is configured; storage operations are unavailable.
    #[error("no bucket name configured")]
    MissingBucket,

    /// A bucket is configured but the store could not be initialized, so
    /// archiving is off for the rest of the run. Carries the init failure.
    #[error("object storage is unavailable: {0}")]
    Unavailable(String),

    /// The configured region string could not be resolved.
    #[error("unrecognized region '{0}'")]
    Region(String),

    /// AWS credentials could not be resolved from the environment.
    #[error("failed to resolve AWS credentials: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    /// The S3 client reported a transport or backend failure.
    #[error("S3 request failed: {0}")]
    Backend(#[from] s3::error::S3Error),

    /// The backend accepted the request but answered with an unexpected status.
    #[error("S3 {op} returned status {status}")]
    UnexpectedStatus { op: &'static str, status: u16 },

    /// Refused to archive an empty snapshot document.
    #[error("snapshot document is empty")]
    EmptyDocument,

    /// The snapshot document could not be serialized for upload.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages_name_the_provider() {
        let err = FetchError::MissingApiKey;
        assert_eq!(err.to_string(), "no OpenWeather API key configured");

        let err = FetchError::Malformed("missing field `main`".to_string());
        assert!(err.to_string().contains("malformed OpenWeather response"));
        assert!(err.to_string().contains("missing field `main`"));
    }

    #[test]
    fn storage_error_messages_carry_detail() {
        let err = StorageError::MissingBucket;
        assert_eq!(err.to_string(), "no bucket name configured");

        let err = StorageError::UnexpectedStatus { op: "put_object", status: 403 };
        assert_eq!(err.to_string(), "S3 put_object returned status 403");

        let err = StorageError::Unavailable("no credentials found".to_string());
        assert_eq!(err.to_string(), "object storage is unavailable: no credentials found");

        let err = StorageError::Region("moon-base-1".to_string());
        assert!(err.to_string().contains("moon-base-1"));
    }

    #[test]
    fn serde_errors_convert_into_both_enums() {
        let fetch: FetchError =
            serde_json::from_str::<serde_json::Value>("{not json").unwrap_err().into();
        assert!(matches!(fetch, FetchError::Decode(_)));

        let storage: StorageError =
            serde_json::from_str::<serde_json::Value>("{not json").unwrap_err().into();
        assert!(matches!(storage, StorageError::Serialize(_)));
    }
}
