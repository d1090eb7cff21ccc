//! `pnodectl`: inspect a physical node configuration.
//!
//! Loads a node configuration document into a registry and answers
//! read-only queries against it: listing, hostname lookup, failover groups
//! and the next pnid the allocator would hand out.

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
