//! Directory domain request handlers

pub mod groups;
pub mod keys;
pub mod members;
pub mod platform;
pub mod users;
