//! Serialisable registry views.
//!
//! Snapshots are read-only copies used for diagnostics dumps; they are not a
//! persistence format and cannot be loaded back into a registry.

use crate::config::RegistryConfig;
use crate::node::{CoreRange, NodeRecord, Pnid};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub pnid: Pnid,
    pub name: String,
    #[serde(skip_serializing_if = "CoreRange::is_none", default)]
    pub excluded_cores: CoreRange,
    pub is_spare: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub backup_targets: Vec<Pnid>,
}

impl From<&NodeRecord> for NodeSnapshot {
    fn from(record: &NodeRecord) -> Self {
        Self {
            pnid: record.pnid(),
            name: record.name().to_string(),
            excluded_cores: record.excluded_cores(),
            is_spare: record.is_spare(),
            backup_targets: record.backup_targets().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub config: RegistryConfig,
    /// Cursor value at snapshot time; `None` when full.
    pub next_free: Option<Pnid>,
    /// Spares in registration order.
    pub spare_order: Vec<Pnid>,
    /// Live nodes in insertion order.
    pub nodes: Vec<NodeSnapshot>,
}
