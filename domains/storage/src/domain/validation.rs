//! Validation rules for storage entities

use regex::Regex;

lazy_static::lazy_static! {
    /// Bucket names: S3-compatible subset, lowercase alphanumerics with
    /// dots and hyphens, no leading or trailing punctuation.
    pub static ref BUCKET_NAME_REGEX: Regex =
        Regex::new(r"^[a-z0-9]([a-z0-9.-]*[a-z0-9])?$").unwrap();
}

pub const BUCKET_NAME_MIN_LEN: usize = 3;
pub const BUCKET_NAME_MAX_LEN: usize = 63;

/// Validate a logical bucket name, returning a human-readable reason on
/// failure
pub fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.len() < BUCKET_NAME_MIN_LEN || name.len() > BUCKET_NAME_MAX_LEN {
        return Err(format!(
            "Bucket name must be {}-{} characters",
            BUCKET_NAME_MIN_LEN, BUCKET_NAME_MAX_LEN
        ));
    }
    if !BUCKET_NAME_REGEX.is_match(name) {
        return Err(
            "Bucket name may only contain lowercase letters, digits, dots and hyphens".to_string(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bucket_names() {
        for name in ["dailies", "show.renders", "comp-output-v2", "abc"] {
            assert!(validate_bucket_name(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_invalid_bucket_names() {
        for name in ["ab", "Dailies", ".hidden", "trailing.", "under_score", ""] {
            assert!(validate_bucket_name(name).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_length_bounds() {
        assert!(validate_bucket_name(&"a".repeat(63)).is_ok());
        assert!(validate_bucket_name(&"a".repeat(64)).is_err());
    }
}
