//! Async bucket resolver
//!
//! Loads bucket records and source lists from Postgres and exposes the
//! pure routing rules from [`crate::domain::resolver`] as a service.

use uuid::Uuid;
use vfxsh_common::{Error, Result};

use crate::domain::entities::BucketType;
use crate::domain::resolver::Resolved;
use crate::repository::{BucketRepository, SourceRepository};

#[derive(Clone)]
pub struct BucketResolver {
    buckets: BucketRepository,
    sources: SourceRepository,
}

impl BucketResolver {
    pub fn new(buckets: BucketRepository, sources: SourceRepository) -> Self {
        Self { buckets, sources }
    }

    /// Resolve a logical bucket name to its physical location(s).
    ///
    /// A virtual bucket with zero sources is a valid record but not a
    /// resolvable target; that case is reported as `Conflict` so the
    /// caller can distinguish it from an unknown name.
    pub async fn resolve(&self, org_id: Uuid, bucket_name: &str) -> Result<Resolved> {
        let bucket = self
            .buckets
            .get(org_id, bucket_name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Bucket {} not found", bucket_name)))?;

        match bucket.bucket_type {
            BucketType::Standard => {
                // Both fields are enforced at creation for standard buckets
                let provider_id = bucket.provider_id.ok_or_else(|| {
                    Error::Internal(format!("Standard bucket {} has no provider", bucket_name))
                })?;
                let remote_bucket_name = bucket.remote_bucket_name.ok_or_else(|| {
                    Error::Internal(format!("Standard bucket {} has no remote name", bucket_name))
                })?;
                Ok(Resolved::Physical {
                    provider_id,
                    remote_bucket_name,
                })
            }
            BucketType::Virtual => {
                let sources = self.sources.list_for_bucket(org_id, bucket_name).await?;
                if sources.is_empty() {
                    return Err(Error::conflict_on(
                        "Virtual bucket has no sources configured",
                        bucket_name,
                    ));
                }
                Ok(Resolved::Virtual { sources })
            }
        }
    }
}
