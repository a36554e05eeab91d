//! JWT validation and token extraction helpers

use axum::http::HeaderValue;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::IdpClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validate a JWT issued by the external identity provider
pub(crate) fn validate_jwt_token(
    token: &str,
    config: &AuthConfig,
) -> Result<IdpClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);

    if let Some(aud) = &config.audience {
        validation.set_audience(&[aud]);
    } else {
        validation.validate_aud = false;
    }

    if let Some(iss) = &config.issuer {
        validation.set_issuer(&[iss]);
    }

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<IdpClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(AuthError::InvalidAuthorizationFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            issuer: None,
            audience: None,
        }
    }

    fn sign(claims: &IdpClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    fn valid_claims() -> IdpClaims {
        IdpClaims {
            sub: "idp_42".to_string(),
            email: "artist@studio.example".to_string(),
            name: None,
            exp: 4102444800, // far future
        }
    }

    #[test]
    fn test_validate_round_trip() {
        let token = sign(&valid_claims(), "unit-test-secret");
        let claims = validate_jwt_token(&token, &test_config()).unwrap();
        assert_eq!(claims.sub, "idp_42");
        assert_eq!(claims.email, "artist@studio.example");
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let token = sign(&valid_claims(), "other-secret");
        assert!(validate_jwt_token(&token, &test_config()).is_err());
    }

    #[test]
    fn test_validate_rejects_expired() {
        let mut claims = valid_claims();
        claims.exp = 1000; // 1970
        let token = sign(&claims, "unit-test-secret");
        assert!(validate_jwt_token(&token, &test_config()).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&header).unwrap(), "abc.def.ghi");

        let header = HeaderValue::from_static("abc.def.ghi");
        assert!(extract_bearer_token(&header).is_err());
    }
}
