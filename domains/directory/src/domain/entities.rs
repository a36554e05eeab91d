//! Directory entities

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vfxsh_common::crypto::hash_secret;
use vfxsh_common::{Error, OrgRole, Result};

use super::validation::validate_group_slug;

/// Organization entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// User record as stored (provisioned lazily on first sign-in)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub is_platform_operator: bool,
    pub created_at: DateTime<Utc>,
}

/// Organization membership edge. A user holds at most one role per
/// organization; the role is the sole source of org-level capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
}

/// Member row as rendered in the org members table (membership joined
/// with the user record)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberRecord {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
}

/// Group entity, identified by its immutable slug
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: String,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(
        org_id: Uuid,
        slug: String,
        name: String,
        description: Option<String>,
    ) -> Result<Self> {
        validate_group_slug(&slug).map_err(Error::Validation)?;
        if name.is_empty() || name.len() > 100 {
            return Err(Error::Validation(
                "Group name must be 1-100 characters".to_string(),
            ));
        }

        Ok(Group {
            id: slug,
            org_id,
            name,
            description,
            created_at: Utc::now(),
        })
    }
}

/// Member row within a group detail view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GroupMember {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// S3-style access key. The secret is hashed at rest; the plaintext is
/// disclosed exactly once, at creation or rotation.
#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct AccessKey {
    pub access_key_id: String,
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub name: Option<String>,
    pub secret_hash: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKey")
            .field("access_key_id", &self.access_key_id)
            .field("user_id", &self.user_id)
            .field("org_id", &self.org_id)
            .field("name", &self.name)
            .field("secret_hash", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("enabled", &self.enabled)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl AccessKey {
    /// Create a new access key.
    ///
    /// Returns `(AccessKey, secret)` — the plaintext secret exists only
    /// in this return value and is never retrievable afterward.
    pub fn generate(
        user_id: Uuid,
        org_id: Uuid,
        name: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(Self, String)> {
        if let Some(n) = &name {
            if n.len() > 100 {
                return Err(Error::Validation(
                    "Key name must be at most 100 characters".to_string(),
                ));
            }
        }

        let access_key_id = format!(
            "VFXAK{}",
            Uuid::new_v4().simple().to_string()[..16].to_uppercase()
        );
        let (secret, secret_hash) = new_secret()?;

        let key = AccessKey {
            access_key_id,
            user_id,
            org_id,
            name,
            secret_hash,
            expires_at,
            enabled: true,
            created_at: Utc::now(),
        };

        Ok((key, secret))
    }

    /// Replace the secret, invalidating the previous one.
    ///
    /// Returns the new plaintext secret (single disclosure, as at
    /// creation). The old hash is gone once the updated row is stored.
    pub fn rotate(&mut self) -> Result<String> {
        let (secret, secret_hash) = new_secret()?;
        self.secret_hash = secret_hash;
        Ok(secret)
    }

    /// Whether the key can currently authenticate
    pub fn is_valid(&self) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at < Utc::now() {
                return false;
            }
        }
        true
    }
}

/// Generate secret material: 32 random bytes, URL-safe base64 encoded
/// (43 chars), hashed with a fresh random salt.
fn new_secret() -> Result<(String, String)> {
    let mut secret_bytes = [0u8; 32];
    getrandom::getrandom(&mut secret_bytes)
        .map_err(|e| Error::Internal(format!("Failed to generate random bytes: {}", e)))?;
    let secret = URL_SAFE_NO_PAD.encode(secret_bytes);

    let salt: [u8; 32] = rand::thread_rng().gen();
    let secret_hash = hash_secret(&secret, &salt);
    Ok((secret, secret_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfxsh_common::crypto::verify_secret_hash;

    #[test]
    fn test_group_slug_is_validated() {
        let org_id = Uuid::new_v4();
        assert!(Group::new(org_id, "lighting".into(), "Lighting".into(), None).is_ok());
        assert!(Group::new(org_id, "Lighting!".into(), "Lighting".into(), None).is_err());
    }

    #[test]
    fn test_access_key_secret_verifies() {
        let (key, secret) = AccessKey::generate(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        assert!(verify_secret_hash(&secret, &key.secret_hash));
        assert!(key.access_key_id.starts_with("VFXAK"));
        assert!(key.is_valid());
    }

    #[test]
    fn test_rotation_invalidates_previous_secret() {
        let (mut key, first) =
            AccessKey::generate(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        let second = key.rotate().unwrap();

        assert_ne!(first, second);
        assert!(!verify_secret_hash(&first, &key.secret_hash));
        assert!(verify_secret_hash(&second, &key.secret_hash));
    }

    #[test]
    fn test_two_rotations_yield_distinct_secrets() {
        let (mut key, _) = AccessKey::generate(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        let a = key.rotate().unwrap();
        let b = key.rotate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expired_key_is_invalid() {
        let (mut key, _) = AccessKey::generate(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        key.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
        assert!(!key.is_valid());
    }

    #[test]
    fn test_disabled_key_is_invalid() {
        let (mut key, _) = AccessKey::generate(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        key.enabled = false;
        assert!(!key.is_valid());
    }

    #[test]
    fn test_debug_redacts_secret_hash() {
        let (key, _) = AccessKey::generate(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&key.secret_hash));
    }
}
