//! Claims carried by identity-provider JWTs

use serde::{Deserialize, Serialize};

/// Claims we rely on from the external identity provider.
///
/// `sub` is the provider-assigned subject id; users are keyed on it for
/// lazy provisioning. Extra claims in the token are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdpClaims {
    /// Provider subject id (stable per user)
    pub sub: String,
    /// Email address (required; unique per user)
    pub email: String,
    /// Display name, if the provider supplies one
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry (unix seconds)
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_deserialize_without_name() {
        let claims: IdpClaims = serde_json::from_str(
            r#"{"sub": "idp_1234", "email": "artist@studio.example", "exp": 4102444800}"#,
        )
        .unwrap();
        assert_eq!(claims.sub, "idp_1234");
        assert!(claims.name.is_none());
    }

    #[test]
    fn test_claims_require_email() {
        let result: Result<IdpClaims, _> =
            serde_json::from_str(r#"{"sub": "idp_1234", "exp": 4102444800}"#);
        assert!(result.is_err());
    }
}
