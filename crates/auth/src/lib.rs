//! Authentication middleware for the VFX.sh admin API
//!
//! Token issuance is delegated to an external identity provider; this crate
//! only validates presented JWTs, lazily provisions user records on first
//! sign-in, and resolves the organization scope every org-level request
//! must carry. Extractors work with any domain state implementing
//! `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod types;

pub use backend::AuthBackend;
pub use claims::IdpClaims;
pub use config::AuthConfig;
pub use context::{AuthContext, OrgContext};
pub use error::AuthError;
pub use extractors::{AuthUser, OrgScoped, PlatformOperator};
pub use types::AuthIdentity;
