//! Storage gateway client
//!
//! The gateway is the external collaborator that does the actual
//! S3-compatible I/O. This core only asks it two things: list a prefix
//! (for the console's file browser) and report advisory file locks.
//! Unreachability maps to `UpstreamUnavailable`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vfxsh_common::{Error, Result};

/// Folder entry within a browse listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    pub prefix: String,
}

/// File entry within a browse listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Listing of one prefix within a physical bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseResponse {
    pub folders: Vec<FolderEntry>,
    pub files: Vec<FileEntry>,
    pub prefix: String,
    pub is_truncated: bool,
}

/// Advisory file lock held by some gateway client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLock {
    pub bucket_name: String,
    pub path: String,
    pub owner: String,
    pub acquired_at: DateTime<Utc>,
}

/// Interface to the storage gateway collaborator
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// List one prefix of a physical bucket on a provider
    async fn browse(
        &self,
        provider_id: uuid::Uuid,
        remote_bucket_name: &str,
        prefix: &str,
    ) -> Result<BrowseResponse>;

    /// Advisory file locks currently held. Read-only and
    /// staleness-tolerant; callers must not treat failure as fatal.
    async fn active_locks(&self) -> Result<Vec<FileLock>>;
}

/// HTTP client for the real gateway service
#[derive(Clone)]
pub struct HttpStorageGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStorageGateway {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn unavailable(e: reqwest::Error) -> Error {
        tracing::warn!(error = %e, "Storage gateway request failed");
        Error::UpstreamUnavailable(format!("Storage gateway unreachable: {}", e))
    }
}

#[async_trait]
impl StorageGateway for HttpStorageGateway {
    async fn browse(
        &self,
        provider_id: uuid::Uuid,
        remote_bucket_name: &str,
        prefix: &str,
    ) -> Result<BrowseResponse> {
        let url = format!(
            "{}/v1/providers/{}/buckets/{}/list",
            self.base_url, provider_id, remote_bucket_name
        );
        let response = self
            .client
            .get(&url)
            .query(&[("prefix", prefix)])
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;

        response.json().await.map_err(Self::unavailable)
    }

    async fn active_locks(&self) -> Result<Vec<FileLock>> {
        let url = format!("{}/v1/locks", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;

        response.json().await.map_err(Self::unavailable)
    }
}

#[cfg(test)]
pub mod mock {
    //! In-memory gateway for handler and resolver tests

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockGateway {
        pub browse_response: Mutex<Option<BrowseResponse>>,
        pub locks: Mutex<Vec<FileLock>>,
        pub fail: Mutex<bool>,
    }

    #[async_trait]
    impl StorageGateway for MockGateway {
        async fn browse(
            &self,
            _provider_id: uuid::Uuid,
            _remote_bucket_name: &str,
            prefix: &str,
        ) -> Result<BrowseResponse> {
            if *self.fail.lock().unwrap() {
                return Err(Error::UpstreamUnavailable("mock gateway down".into()));
            }
            let mut response = self
                .browse_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_default();
            response.prefix = prefix.to_string();
            Ok(response)
        }

        async fn active_locks(&self) -> Result<Vec<FileLock>> {
            if *self.fail.lock().unwrap() {
                return Err(Error::UpstreamUnavailable("mock gateway down".into()));
            }
            Ok(self.locks.lock().unwrap().clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockGateway;
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_failure_maps_to_upstream_unavailable() {
        let gateway = MockGateway::default();
        *gateway.fail.lock().unwrap() = true;

        let err = gateway.active_locks().await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_mock_browse_echoes_prefix() {
        let gateway = MockGateway::default();
        let listing = gateway
            .browse(uuid::Uuid::new_v4(), "vfx-show-a", "plates/")
            .await
            .unwrap();
        assert_eq!(listing.prefix, "plates/");
        assert!(!listing.is_truncated);
    }
}
