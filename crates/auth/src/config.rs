//! Authentication configuration

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for HS256 validation
    pub jwt_secret: String,
    /// Expected issuer; skipped when `None`
    pub issuer: Option<String>,
    /// Expected audience; audience validation is disabled when `None`
    pub audience: Option<String>,
}
