//! Node configuration loading.
//!
//! This crate turns an external description of the cluster into a populated
//! `corelib::NodeRegistry`:
//! - The configuration document format (primaries, spares, registry settings)
//! - Pluggable document sources
//! - All-or-nothing registry construction and reload

pub mod document;
pub mod error;
pub mod loader;
pub mod source;

pub use document::{ClusterDocument, NodeEntry, SpareEntry};
pub use error::{LoadError, Result};
pub use loader::{build_registry, load_registry, reload};
pub use source::{ConfigSource, JsonSource};
