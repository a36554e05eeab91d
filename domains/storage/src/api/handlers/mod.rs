//! Storage domain request handlers

pub mod buckets;
pub mod platform;
pub mod providers;
pub mod virtual_buckets;
