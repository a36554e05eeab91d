//! Referential deletion guards
//!
//! Pure decisions over row counts loaded (and locked) inside the
//! deleting transaction: a bucket still referenced by virtual sources
//! and a provider still backing buckets must not be deleted.

use uuid::Uuid;
use vfxsh_common::{Error, Result};

/// A bucket referenced by any virtual bucket source cannot be deleted.
pub fn ensure_bucket_unreferenced(bucket_name: &str, referencing_sources: i64) -> Result<()> {
    if referencing_sources > 0 {
        return Err(Error::conflict_on(
            format!(
                "Bucket is referenced by {} virtual bucket source(s)",
                referencing_sources
            ),
            bucket_name,
        ));
    }
    Ok(())
}

/// A provider with buckets still mapped to it cannot be deleted.
pub fn ensure_provider_unused(provider_id: Uuid, bucket_count: i64) -> Result<()> {
    if bucket_count > 0 {
        return Err(Error::conflict_on(
            format!("Provider is referenced by {} bucket(s)", bucket_count),
            provider_id.to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_referenced_bucket_delete_is_a_conflict() {
        let err = ensure_bucket_unreferenced("plates", 2).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        match err {
            Error::Conflict { message, resource } => {
                assert!(message.contains("2 virtual bucket source(s)"));
                assert_eq!(resource.as_deref(), Some("plates"));
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_unreferenced_bucket_delete_passes() {
        assert!(ensure_bucket_unreferenced("plates", 0).is_ok());
    }

    #[test]
    fn test_provider_in_use_delete_is_a_conflict() {
        let id = Uuid::new_v4();
        let err = ensure_provider_unused(id, 3).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        match err {
            Error::Conflict { resource, .. } => {
                assert_eq!(resource.as_deref(), Some(id.to_string().as_str()));
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_unused_provider_delete_passes() {
        assert!(ensure_provider_unused(Uuid::new_v4(), 0).is_ok());
    }
}
