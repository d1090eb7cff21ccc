//! Configuration source abstractions.
//!
//! A source produces a `ClusterDocument`. Where the document comes from (a
//! file on disk, an inline string, a future network feed) is the source's
//! business; the loader only sees the parsed document.

pub mod json;

pub use json::JsonSource;

use crate::document::ClusterDocument;
use crate::error::Result;

/// Trait for node configuration sources.
pub trait ConfigSource: Send + Sync {
    /// Read and parse the document.
    fn load(&self) -> Result<ClusterDocument>;

    /// Human-readable origin (for logging).
    fn describe(&self) -> String;
}
