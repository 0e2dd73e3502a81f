//! Shared test fixtures for the R&D gateway workspace.
//!
//! - [`InMemoryFreezebee`]: an in-process stand-in for the R&D microservice
//! - directory entry and role mapping builders for the standard R&D groups

mod fixtures;
mod memory;

pub use fixtures::*;
pub use memory::InMemoryFreezebee;
