use crate::error::StorageError;
use async_trait::async_trait;

pub mod s3;

/// The storage backend's default region. Creating a bucket there must omit
/// the location constraint; every other region must name itself. This
/// asymmetry is the backend's API contract, not ours.
pub const S3_DEFAULT_REGION: &str = "us-east-1";

/// Location constraint to attach when creating a bucket in `region`.
pub fn location_constraint(region: &str) -> Option<&str> {
    if region == S3_DEFAULT_REGION { None } else { Some(region) }
}

/// Narrow interface over the object-storage backend, bound to one bucket.
///
/// Only the three operations the archiver consumes are exposed. Keys written
/// through `put_object` are never read back, updated, or deleted by this
/// system; writing the same key twice silently overwrites.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Cheap existence probe for the bucket.
    async fn bucket_exists(&self) -> Result<bool, StorageError>;

    /// Create the bucket, with `location` carrying the region name for every
    /// region except the backend default (see [`location_constraint`]).
    async fn create_bucket(&self, location: Option<&str>) -> Result<(), StorageError>;

    /// Write one object.
    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;
}
