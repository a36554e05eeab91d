//! Access domain: authorization core
//!
//! Combines three pieces:
//! - the role capability table (org-level gates),
//! - the ACL store (sparse per-user and per-group bucket permission
//!   matrices),
//! - the access decision engine, which gates on org capability first and
//!   bucket ACL second.
//!
//! The decision itself is a pure function; the engine only loads its
//! inputs from Postgres.

pub mod api;
pub mod domain;
pub mod engine;
pub mod repository;

pub use domain::capability::{capabilities_of, role_has, Capability};
pub use domain::cache::{AclMatrixCache, AclScope};
pub use domain::decision::{decide, AccessDecision, DenyReason};
pub use domain::permission::{effective_permission, AclMatrix, AclPermission};
pub use engine::AccessDecisionEngine;
pub use repository::AccessRepositories;
