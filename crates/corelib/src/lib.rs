//! Core library for the physical node registry.
//!
//! This crate provides the bookkeeping a cluster monitor needs for its
//! physical nodes:
//! - Node records (pnid, hostname, excluded cores, spare role)
//! - A fixed-capacity registry with lowest-first pnid reuse
//! - Insertion-ordered traversal and lookups by name or pnid
//! - Failover group ("spare set") computation

pub mod config;
pub mod diag;
pub mod error;
pub mod node;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod spare;

pub use config::{OverlapPolicy, RegistryConfig};
pub use diag::DiagCode;
pub use error::{Error, Result};
pub use node::{CoreRange, NodeRecord, Pnid, MAX_HOSTNAME_LEN};
pub use registry::NodeRegistry;
pub use shared::SharedRegistry;
pub use snapshot::{NodeSnapshot, RegistrySnapshot};
pub use spare::SpareSet;
