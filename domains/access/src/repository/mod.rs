//! Persistence for the ACL store
//!
//! All queries use runtime `sqlx::query_as` with explicit binds. ACL
//! mutations are keyed atomic upserts (`ON CONFLICT ... DO UPDATE`), so
//! two concurrent writes to the same (entity, bucket) key can never lose
//! an update the way fetch-list-then-replace logic would.

pub mod group_acls;
pub mod user_acls;

pub use group_acls::GroupAclRepository;
pub use user_acls::{AclEntry, UserAclRepository};

use sqlx::PgPool;

/// All repositories for the access domain
#[derive(Clone)]
pub struct AccessRepositories {
    pub user_acls: UserAclRepository,
    pub group_acls: GroupAclRepository,
}

impl AccessRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            user_acls: UserAclRepository::new(pool.clone()),
            group_acls: GroupAclRepository::new(pool),
        }
    }
}
