//! Transactional free functions for the directory domain
//!
//! Invariant-guarded mutations (last-owner protection, group cascade
//! deletes) run as multi-step transactions; handlers begin the
//! transaction, call these helpers and commit.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;
use vfxsh_common::OrgRole;

/// Count an organization's owners while locking their membership rows.
///
/// `FOR UPDATE` cannot be combined with aggregates in PostgreSQL, so the
/// rows are locked in a subquery and counted outside. Holding the locks
/// until commit keeps two concurrent owner removals from both passing
/// the last-owner check.
pub async fn count_owners_tx(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM (SELECT user_id FROM memberships WHERE org_id = $1 AND role = 'owner' FOR UPDATE) AS locked",
    )
    .bind(org_id)
    .fetch_one(&mut **tx)
    .await
}

/// Load a member's role within the transaction, locking the row
pub async fn membership_role_tx(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
    user_id: Uuid,
) -> Result<Option<OrgRole>, sqlx::Error> {
    sqlx::query_scalar::<_, OrgRole>(
        "SELECT role FROM memberships WHERE org_id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(org_id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Delete a membership within an existing transaction
pub async fn remove_membership_tx(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
    user_id: Uuid,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM memberships WHERE org_id = $1 AND user_id = $2")
        .bind(org_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Update a membership role within an existing transaction
pub async fn update_membership_role_tx(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
    user_id: Uuid,
    role: OrgRole,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE memberships SET role = $3 WHERE org_id = $1 AND user_id = $2")
        .bind(org_id)
        .bind(user_id)
        .bind(role)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Delete a group and cascade its membership edges and ACL grants
pub async fn delete_group_tx(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
    group_id: &str,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM group_acls WHERE org_id = $1 AND group_id = $2")
        .bind(org_id)
        .bind(group_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM group_memberships WHERE org_id = $1 AND group_id = $2")
        .bind(org_id)
        .bind(group_id)
        .execute(&mut **tx)
        .await?;

    let result = sqlx::query("DELETE FROM groups WHERE org_id = $1 AND id = $2")
        .bind(org_id)
        .bind(group_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Replace an access key's secret hash within an existing transaction.
///
/// The old hash is overwritten in place; after commit the previous
/// secret can no longer verify against anything.
pub async fn rotate_key_secret_tx(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
    access_key_id: &str,
    secret_hash: &str,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE access_keys SET secret_hash = $3 WHERE org_id = $1 AND access_key_id = $2",
    )
    .bind(org_id)
    .bind(access_key_id)
    .bind(secret_hash)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
