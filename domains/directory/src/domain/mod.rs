//! Domain types for the directory

pub mod entities;
pub mod ownership;
pub mod validation;
