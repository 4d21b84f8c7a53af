use async_trait::async_trait;
use s3::BucketConfiguration;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use tracing::debug;

use super::ObjectStore;
use crate::error::StorageError;

/// S3-backed [`ObjectStore`] bound to the configured archive bucket.
///
/// Credentials come from the standard AWS resolution chain (environment,
/// shared credentials file, instance profile) at construction time.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    name: String,
    region: Region,
    credentials: Credentials,
}

impl S3ObjectStore {
    pub fn new(name: &str, region: &str) -> Result<Self, StorageError> {
        let region = parse_region(region)?;
        let credentials = Credentials::default()?;
        let bucket = Bucket::new(name, region.clone(), credentials.clone())?;

        Ok(Self { bucket, name: name.to_string(), region, credentials })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self) -> Result<bool, StorageError> {
        Ok(self.bucket.exists().await?)
    }

    async fn create_bucket(&self, location: Option<&str>) -> Result<(), StorageError> {
        // rust-s3 derives the CreateBucketConfiguration payload from the
        // bucket's region and omits it for us-east-1, which matches the
        // constraint computed by the caller; nothing extra to attach.
        debug!(bucket = %self.name, ?location, "creating bucket");

        let response = Bucket::create(
            &self.name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await?;

        if !response.success() {
            return Err(StorageError::UnexpectedStatus {
                op: "create_bucket",
                status: response.response_code,
            });
        }

        Ok(())
    }

    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self.bucket.put_object_with_content_type(key, body, content_type).await?;

        let code = response.status_code();
        if code != 200 {
            return Err(StorageError::UnexpectedStatus { op: "put_object", status: code });
        }

        debug!(bucket = %self.name, key, bytes = body.len(), "stored object");
        Ok(())
    }
}

/// Map the configured region name onto the AWS commercial regions.
/// Unknown names are a configuration error rather than a guessed endpoint.
fn parse_region(name: &str) -> Result<Region, StorageError> {
    let region = match name {
        "us-east-1" => Region::UsEast1,
        "us-east-2" => Region::UsEast2,
        "us-west-1" => Region::UsWest1,
        "us-west-2" => Region::UsWest2,
        "ca-central-1" => Region::CaCentral1,
        "eu-west-1" => Region::EuWest1,
        "eu-west-2" => Region::EuWest2,
        "eu-west-3" => Region::EuWest3,
        "eu-central-1" => Region::EuCentral1,
        "eu-north-1" => Region::EuNorth1,
        "ap-south-1" => Region::ApSouth1,
        "ap-southeast-1" => Region::ApSoutheast1,
        "ap-southeast-2" => Region::ApSoutheast2,
        "ap-northeast-1" => Region::ApNortheast1,
        "ap-northeast-2" => Region::ApNortheast2,
        "ap-northeast-3" => Region::ApNortheast3,
        "sa-east-1" => Region::SaEast1,
        // Commercial regions the client library has no named variant for.
        // All of them serve S3 at s3.{region}.amazonaws.com.
        "af-south-1" | "ap-east-1" | "ap-east-2" | "ap-south-2" | "ap-southeast-3"
        | "ap-southeast-4" | "ap-southeast-5" | "ap-southeast-6" | "ap-southeast-7"
        | "ca-west-1" | "eu-central-2" | "eu-south-1" | "eu-south-2" | "il-central-1"
        | "me-central-1" | "me-south-1" | "mx-central-1" => Region::Custom {
            region: name.to_string(),
            endpoint: format!("s3.{name}.amazonaws.com"),
        },
        other => return Err(StorageError::Region(other.to_string())),
    };

    Ok(region)
}
