//! Access domain request handlers

pub mod checks;
pub mod group_acls;
pub mod matrices;
pub mod user_acls;
