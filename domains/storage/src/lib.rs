//! Storage domain: where logical buckets actually live
//!
//! Providers (platform-scoped endpoints), logical buckets (standard or
//! virtual), virtual bucket sources, the resolver that maps a logical
//! name and path to a physical location, and the client for the
//! external storage gateway.

pub mod api;
pub mod domain;
pub mod gateway;
pub mod repository;
pub mod resolver;

pub use domain::entities::{
    Bucket, BucketOrgAssignment, BucketType, Provider, ProviderSummary, VirtualBucketSource,
};
pub use domain::resolver::{route_read, route_write, Resolved};
pub use gateway::{BrowseResponse, FileLock, HttpStorageGateway, StorageGateway};
pub use repository::StorageRepositories;
pub use resolver::BucketResolver;
