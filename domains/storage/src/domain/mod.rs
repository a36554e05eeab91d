//! Domain types and pure logic for the storage domain

pub mod entities;
pub mod guards;
pub mod resolver;
pub mod validation;
