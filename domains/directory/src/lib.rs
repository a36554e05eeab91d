//! Directory domain: who exists and who belongs where
//!
//! Organizations, memberships (with the last-owner guard), the org user
//! directory, groups with their membership edges, and access keys with
//! single-disclosure secrets.

pub mod api;
pub mod domain;
pub mod repository;

pub use domain::entities::{
    AccessKey, Group, GroupMember, MemberRecord, Membership, Organization, User,
};
pub use repository::DirectoryRepositories;
