//! Optimistic ACL matrix cache
//!
//! Mirrors server ACL state for a console-style client: a mutation is
//! applied to the cached matrix immediately, and on failure the prior
//! snapshot is restored exactly. Snapshots are whole-matrix, not
//! field-level patches, so a failed mutation can never leave partial
//! state behind. Slots are keyed by (scope kind, org id) and the handle
//! is passed explicitly to mutation routines.

use std::collections::HashMap;

use uuid::Uuid;

use super::permission::{AclMatrix, AclPermission};

/// Which ACL matrix a cache slot mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclScope {
    User,
    Group,
}

#[derive(Debug, Default)]
struct Slot {
    current: AclMatrix,
    /// Present while an optimistic mutation is in flight
    snapshot: Option<AclMatrix>,
}

/// Client-side cache of ACL matrices with optimistic update + rollback
#[derive(Debug, Default)]
pub struct AclMatrixCache {
    slots: HashMap<(AclScope, Uuid), Slot>,
}

impl AclMatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a slot with a server-fetched matrix, clearing any pending
    /// snapshot.
    pub fn load(&mut self, scope: AclScope, org_id: Uuid, matrix: AclMatrix) {
        self.slots.insert(
            (scope, org_id),
            Slot {
                current: matrix,
                snapshot: None,
            },
        );
    }

    pub fn matrix(&self, scope: AclScope, org_id: Uuid) -> Option<&AclMatrix> {
        self.slots.get(&(scope, org_id)).map(|s| &s.current)
    }

    /// Apply a permission change optimistically.
    ///
    /// Takes a whole-matrix snapshot the first time a slot is mutated
    /// with no mutation pending; repeated applies before commit/rollback
    /// keep the original snapshot. `None` removes the entry (sparse
    /// matrix), pruning the entity row when it empties.
    pub fn apply(
        &mut self,
        scope: AclScope,
        org_id: Uuid,
        entity_id: &str,
        bucket_name: &str,
        permission: Option<AclPermission>,
    ) {
        let slot = self.slots.entry((scope, org_id)).or_default();
        if slot.snapshot.is_none() {
            slot.snapshot = Some(slot.current.clone());
        }

        match permission {
            Some(p) => {
                slot.current
                    .entry(entity_id.to_string())
                    .or_default()
                    .insert(bucket_name.to_string(), p);
            }
            None => {
                if let Some(buckets) = slot.current.get_mut(entity_id) {
                    buckets.remove(bucket_name);
                    if buckets.is_empty() {
                        slot.current.remove(entity_id);
                    }
                }
            }
        }
    }

    /// Confirm the in-flight mutation, discarding the snapshot
    pub fn commit(&mut self, scope: AclScope, org_id: Uuid) {
        if let Some(slot) = self.slots.get_mut(&(scope, org_id)) {
            slot.snapshot = None;
        }
    }

    /// Restore the slot to its exact pre-mutation state
    pub fn rollback(&mut self, scope: AclScope, org_id: Uuid) {
        if let Some(slot) = self.slots.get_mut(&(scope, org_id)) {
            if let Some(snapshot) = slot.snapshot.take() {
                slot.current = snapshot;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn matrix_with(entity: &str, bucket: &str, p: AclPermission) -> AclMatrix {
        let mut buckets = BTreeMap::new();
        buckets.insert(bucket.to_string(), p);
        let mut m = AclMatrix::new();
        m.insert(entity.to_string(), buckets);
        m
    }

    #[test]
    fn test_apply_then_commit_keeps_change() {
        let org = Uuid::new_v4();
        let mut cache = AclMatrixCache::new();
        cache.load(AclScope::User, org, AclMatrix::new());

        cache.apply(
            AclScope::User,
            org,
            "u1",
            "dailies",
            Some(AclPermission::Write),
        );
        cache.commit(AclScope::User, org);

        let m = cache.matrix(AclScope::User, org).unwrap();
        assert_eq!(m["u1"]["dailies"], AclPermission::Write);
    }

    #[test]
    fn test_rollback_restores_exact_snapshot() {
        let org = Uuid::new_v4();
        let initial = matrix_with("u1", "dailies", AclPermission::Read);
        let mut cache = AclMatrixCache::new();
        cache.load(AclScope::User, org, initial.clone());

        cache.apply(
            AclScope::User,
            org,
            "u1",
            "dailies",
            Some(AclPermission::Admin),
        );
        cache.apply(
            AclScope::User,
            org,
            "u2",
            "renders",
            Some(AclPermission::Read),
        );
        cache.rollback(AclScope::User, org);

        assert_eq!(cache.matrix(AclScope::User, org), Some(&initial));
    }

    #[test]
    fn test_remove_prunes_empty_entity_row() {
        let org = Uuid::new_v4();
        let mut cache = AclMatrixCache::new();
        cache.load(
            AclScope::Group,
            org,
            matrix_with("render-wranglers", "dailies", AclPermission::Read),
        );

        cache.apply(AclScope::Group, org, "render-wranglers", "dailies", None);
        cache.commit(AclScope::Group, org);

        let m = cache.matrix(AclScope::Group, org).unwrap();
        assert!(!m.contains_key("render-wranglers"));
    }

    #[test]
    fn test_scopes_are_independent() {
        let org = Uuid::new_v4();
        let mut cache = AclMatrixCache::new();
        cache.load(AclScope::User, org, AclMatrix::new());
        cache.load(AclScope::Group, org, AclMatrix::new());

        cache.apply(
            AclScope::User,
            org,
            "u1",
            "dailies",
            Some(AclPermission::Read),
        );
        cache.rollback(AclScope::Group, org);

        // rollback on the group scope does not touch the pending user change
        let m = cache.matrix(AclScope::User, org).unwrap();
        assert_eq!(m["u1"]["dailies"], AclPermission::Read);
    }

    #[test]
    fn test_reapplying_same_grant_is_idempotent() {
        let org = Uuid::new_v4();
        let mut cache = AclMatrixCache::new();
        cache.load(AclScope::User, org, AclMatrix::new());

        cache.apply(
            AclScope::User,
            org,
            "u1",
            "dailies",
            Some(AclPermission::Write),
        );
        cache.commit(AclScope::User, org);
        let once = cache.matrix(AclScope::User, org).unwrap().clone();

        cache.apply(
            AclScope::User,
            org,
            "u1",
            "dailies",
            Some(AclPermission::Write),
        );
        cache.commit(AclScope::User, org);

        assert_eq!(cache.matrix(AclScope::User, org), Some(&once));
        assert_eq!(once["u1"].len(), 1);
    }

    #[test]
    fn test_rollback_without_pending_mutation_is_noop() {
        let org = Uuid::new_v4();
        let initial = matrix_with("u1", "dailies", AclPermission::Read);
        let mut cache = AclMatrixCache::new();
        cache.load(AclScope::User, org, initial.clone());

        cache.rollback(AclScope::User, org);
        assert_eq!(cache.matrix(AclScope::User, org), Some(&initial));
    }
}
