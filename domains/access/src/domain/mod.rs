//! Domain types and pure logic for the access domain

pub mod cache;
pub mod capability;
pub mod decision;
pub mod permission;
