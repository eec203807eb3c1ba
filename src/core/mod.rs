//! Core building blocks for depot operations
//!
//! - **config**: Depot configuration (depot.toml) parsing and validation
//! - **error**: Error types with exit codes and contextual help messages
//! - **week**: Release-week calendar arithmetic
//! - **vcs**: Repository-log abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
pub mod week;
