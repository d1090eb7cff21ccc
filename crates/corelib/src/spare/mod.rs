//! Spare nodes and failover groups.
//!
//! A spare declares the primaries it can replace; the failover group of a
//! node is computed from those declarations on demand.

pub mod index;
pub mod set;

pub use index::SpareIndex;
pub use set::SpareSet;
