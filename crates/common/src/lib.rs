//! Shared utilities, configuration, and error handling for the VFX.sh admin core
//!
//! This crate provides common functionality used across the admin core:
//! - Configuration management following 12-factor principles
//! - Error taxonomy shared by all domain crates
//! - Custom axum extractors (pagination, validated JSON)
//! - Secret hashing for access-key material
//! - The canonical organization role enum

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod role;

pub use config::Config;
pub use crypto::{hash_secret, verify_secret_hash};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use role::OrgRole;
