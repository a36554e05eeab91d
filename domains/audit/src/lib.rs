//! Audit domain: append-only audit log
//!
//! Entries are written by mutating handlers across the workspace through
//! [`AuditRecorder`] and read back through the platform-only API. Entries
//! are immutable once written; there is no update or delete path.

pub mod api;
pub mod domain;
pub mod recorder;
pub mod repository;

pub use domain::entities::{AuditEntry, NewAuditEntry};
pub use recorder::AuditRecorder;
pub use repository::AuditLogRepository;
