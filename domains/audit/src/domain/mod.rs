//! Domain types for the audit log

pub mod entities;
