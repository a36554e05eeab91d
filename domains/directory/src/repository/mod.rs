//! Persistence for the directory domain

pub mod access_keys;
pub mod groups;
pub mod memberships;
pub mod organizations;
pub mod transactions;
pub mod users;

pub use access_keys::AccessKeyRepository;
pub use groups::GroupRepository;
pub use memberships::MembershipRepository;
pub use organizations::OrganizationRepository;
pub use users::UserRepository;

use sqlx::{PgPool, Postgres, Transaction};
use vfxsh_common::db::RepositoryError;

/// All repositories for the directory domain
#[derive(Clone)]
pub struct DirectoryRepositories {
    pool: PgPool,
    pub organizations: OrganizationRepository,
    pub users: UserRepository,
    pub memberships: MembershipRepository,
    pub groups: GroupRepository,
    pub access_keys: AccessKeyRepository,
}

impl DirectoryRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            organizations: OrganizationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            access_keys: AccessKeyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a transaction for multi-step invariant-guarded mutations
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        Ok(self.pool.begin().await?)
    }
}
