//! # Directory Role Resolution
//!
//! Derives the gateway's internal roles from a principal's directory group
//! memberships and makes the role-based authorization decisions that guard
//! the entity endpoints.
//!
//! ```text
//! DirectoryEntry ──► LdapRoleFetcher ──► ResolvedRoles ──► Principal ──► authorize()
//!  ismemberof         regex + mapping     deduplicated       username     403 / allow
//! ```
//!
//! The fetcher is built once from configuration and shared immutably
//! (`Arc<dyn RoleFetcher>`) by every request.

pub mod entry;
pub mod fetcher;
pub mod mapping;
pub mod principal;

pub use entry::{DirectoryEntry, LdapEntry};
pub use fetcher::{
    DEFAULT_ATTRIBUTE_NAME, DEFAULT_GROUP_NAME_PATTERN, LdapRoleFetcher, ResolvedRoles,
    RoleFetcher, compile_group_name_pattern
};
pub use mapping::RoleMapping;
pub use principal::{AccessDenied, Principal, authorize};
