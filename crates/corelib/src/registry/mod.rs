//! Physical node registry.
//!
//! The registry owns every node record, hands out pnid slots lowest-first and
//! answers lookups and failover-group queries.

pub mod cursor;
pub mod registry;
pub mod slots;

pub use cursor::FreeCursor;
pub use registry::NodeRegistry;
pub use slots::SlotTable;
