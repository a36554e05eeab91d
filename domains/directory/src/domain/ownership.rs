//! Last-owner protection
//!
//! An organization must always retain at least one owner. The decision
//! is pure; handlers load the locked owner count in a transaction and
//! ask it whether the change would orphan the organization.

use vfxsh_common::OrgRole;

/// Whether changing `current` to `new_role` (or removing the member
/// entirely, `None`) would leave the organization without an owner.
pub fn leaves_org_ownerless(
    current: OrgRole,
    new_role: Option<OrgRole>,
    owner_count: i64,
) -> bool {
    current == OrgRole::Owner && new_role != Some(OrgRole::Owner) && owner_count <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removing_sole_owner_is_blocked() {
        assert!(leaves_org_ownerless(OrgRole::Owner, None, 1));
    }

    #[test]
    fn test_demoting_sole_owner_is_blocked() {
        for new_role in [OrgRole::Admin, OrgRole::Member, OrgRole::Viewer] {
            assert!(
                leaves_org_ownerless(OrgRole::Owner, Some(new_role), 1),
                "demotion to {:?} must be blocked",
                new_role
            );
        }
    }

    #[test]
    fn test_owner_can_leave_when_another_owner_remains() {
        assert!(!leaves_org_ownerless(OrgRole::Owner, None, 2));
        assert!(!leaves_org_ownerless(OrgRole::Owner, Some(OrgRole::Member), 2));
    }

    #[test]
    fn test_owner_to_owner_change_is_never_blocked() {
        assert!(!leaves_org_ownerless(OrgRole::Owner, Some(OrgRole::Owner), 1));
    }

    #[test]
    fn test_non_owner_changes_are_never_blocked() {
        for current in [OrgRole::Admin, OrgRole::Member, OrgRole::Viewer] {
            assert!(!leaves_org_ownerless(current, None, 1));
            assert!(!leaves_org_ownerless(current, Some(OrgRole::Viewer), 1));
        }
    }
}
