//! Storage entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vfxsh_common::{Error, Result};

use super::validation::validate_bucket_name;

/// Logical bucket kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bucket_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BucketType {
    Standard,
    Virtual,
}

/// Storage provider endpoint (platform-scoped).
///
/// Credentials are write-only: this struct is never serialized to API
/// consumers (see [`ProviderSummary`]) and Debug redacts the secret.
#[derive(Clone, sqlx::FromRow)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub endpoint_url: String,
    pub region: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Provider as serialized to any API consumer: no credential fields
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProviderSummary {
    pub id: Uuid,
    pub name: String,
    pub endpoint_url: String,
    pub region: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Provider> for ProviderSummary {
    fn from(p: Provider) -> Self {
        ProviderSummary {
            id: p.id,
            name: p.name,
            endpoint_url: p.endpoint_url,
            region: p.region,
            enabled: p.enabled,
            created_at: p.created_at,
        }
    }
}

/// Logical bucket, org-scoped and unique by name within the org
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Bucket {
    pub bucket_name: String,
    pub org_id: Uuid,
    pub bucket_type: BucketType,
    /// Required for standard buckets, absent for virtual ones
    pub provider_id: Option<Uuid>,
    pub remote_bucket_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Bucket {
    /// Standard bucket: 1:1 mapping to a physical bucket on a provider
    pub fn standard(
        org_id: Uuid,
        bucket_name: String,
        provider_id: Uuid,
        remote_bucket_name: String,
    ) -> Result<Self> {
        validate_bucket_name(&bucket_name).map_err(Error::Validation)?;
        if remote_bucket_name.is_empty() {
            return Err(Error::Validation(
                "Remote bucket name is required for standard buckets".to_string(),
            ));
        }

        Ok(Bucket {
            bucket_name,
            org_id,
            bucket_type: BucketType::Standard,
            provider_id: Some(provider_id),
            remote_bucket_name: Some(remote_bucket_name),
            created_at: Utc::now(),
        })
    }

    /// Virtual bucket: contents come from an ordered list of sources
    pub fn new_virtual(org_id: Uuid, bucket_name: String) -> Result<Self> {
        validate_bucket_name(&bucket_name).map_err(Error::Validation)?;

        Ok(Bucket {
            bucket_name,
            org_id,
            bucket_type: BucketType::Virtual,
            provider_id: None,
            remote_bucket_name: None,
            created_at: Utc::now(),
        })
    }
}

/// One source folder aggregated into a virtual bucket.
///
/// Sources are probed in `sort_order` ascending; the source with
/// sort_order 0 is the default write target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VirtualBucketSource {
    pub id: Uuid,
    pub org_id: Uuid,
    pub virtual_bucket_name: String,
    /// Standard bucket the content comes from
    pub source_bucket_name: String,
    /// Folder within the source bucket; empty means the bucket root
    pub source_prefix: String,
    pub display_name: Option<String>,
    /// Path under the virtual bucket where this source appears
    pub mount_point: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Platform many-to-many assignment of a bucket to an organization
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BucketOrgAssignment {
    pub id: Uuid,
    pub bucket_name: String,
    pub org_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_bucket_requires_remote_name() {
        let result = Bucket::standard(Uuid::new_v4(), "dailies".into(), Uuid::new_v4(), "".into());
        assert!(result.is_err());
    }

    #[test]
    fn test_bucket_name_is_validated() {
        assert!(Bucket::new_virtual(Uuid::new_v4(), "Bad Name".into()).is_err());
        assert!(Bucket::new_virtual(Uuid::new_v4(), "show.renders".into()).is_ok());
    }

    #[test]
    fn test_virtual_bucket_has_no_physical_mapping() {
        let b = Bucket::new_virtual(Uuid::new_v4(), "all-shots".into()).unwrap();
        assert_eq!(b.bucket_type, BucketType::Virtual);
        assert!(b.provider_id.is_none());
        assert!(b.remote_bucket_name.is_none());
    }

    #[test]
    fn test_provider_debug_redacts_secret() {
        let p = Provider {
            id: Uuid::new_v4(),
            name: "wasabi-eu".into(),
            endpoint_url: "https://s3.eu-central-1.wasabisys.com".into(),
            region: Some("eu-central-1".into()),
            access_key_id: "AKIA123".into(),
            secret_access_key: "super-secret".into(),
            enabled: true,
            created_at: Utc::now(),
        };
        let debug = format!("{:?}", p);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
