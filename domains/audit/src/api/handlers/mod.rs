//! Audit domain request handlers

pub mod audit_logs;
