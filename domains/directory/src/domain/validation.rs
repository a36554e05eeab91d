//! Validation rules for directory entities

use regex::Regex;

lazy_static::lazy_static! {
    /// Group slugs: lowercase alphanumerics and hyphens, no leading or
    /// trailing hyphen. The slug is the group's immutable identifier.
    pub static ref GROUP_SLUG_REGEX: Regex =
        Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").unwrap();
}

pub const GROUP_SLUG_MAX_LEN: usize = 63;

/// Validate a group slug, returning a human-readable reason on failure
pub fn validate_group_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() || slug.len() > GROUP_SLUG_MAX_LEN {
        return Err(format!(
            "Group slug must be 1-{} characters",
            GROUP_SLUG_MAX_LEN
        ));
    }
    if !GROUP_SLUG_REGEX.is_match(slug) {
        return Err(
            "Group slug may only contain lowercase letters, digits and hyphens".to_string(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        for slug in ["render-wranglers", "comp", "team-2", "a"] {
            assert!(validate_group_slug(slug).is_ok(), "{}", slug);
        }
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in ["", "Render", "spaces here", "-leading", "trailing-", "ünïcode"] {
            assert!(validate_group_slug(slug).is_err(), "{}", slug);
        }
    }

    #[test]
    fn test_slug_length_bound() {
        let max = "a".repeat(GROUP_SLUG_MAX_LEN);
        assert!(validate_group_slug(&max).is_ok());
        let too_long = "a".repeat(GROUP_SLUG_MAX_LEN + 1);
        assert!(validate_group_slug(&too_long).is_err());
    }
}
