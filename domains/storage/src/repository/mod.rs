//! Persistence for the storage domain

pub mod assignments;
pub mod buckets;
pub mod providers;
pub mod sources;

pub use assignments::AssignmentRepository;
pub use buckets::BucketRepository;
pub use providers::ProviderRepository;
pub use sources::SourceRepository;

use sqlx::PgPool;

/// All repositories for the storage domain
#[derive(Clone)]
pub struct StorageRepositories {
    pub providers: ProviderRepository,
    pub buckets: BucketRepository,
    pub sources: SourceRepository,
    pub assignments: AssignmentRepository,
}

impl StorageRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            providers: ProviderRepository::new(pool.clone()),
            buckets: BucketRepository::new(pool.clone()),
            sources: SourceRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool),
        }
    }
}
