//! Cluster node configuration document.
//!
//! ```json
//! {
//!   "registry": { "max_nodes": 8 },
//!   "nodes": [
//!     { "pnid": 0, "name": "n000", "excluded_cores": { "first": 0, "last": 1 } },
//!     { "pnid": 1, "name": "n001" }
//!   ],
//!   "spares": [
//!     { "pnid": 2, "name": "n002", "backs": [0, 1] }
//!   ]
//! }
//! ```

use crate::error::{LoadError, Result};
use corelib::{CoreRange, Pnid, RegistryConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A primary node entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub pnid: Pnid,
    pub name: String,
    #[serde(default, skip_serializing_if = "CoreRange::is_none")]
    pub excluded_cores: CoreRange,
}

/// A spare node entry and the pnids it can replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpareEntry {
    pub pnid: Pnid,
    pub name: String,
    #[serde(default, skip_serializing_if = "CoreRange::is_none")]
    pub excluded_cores: CoreRange,
    /// Empty means a registered spare with no active targets.
    #[serde(default)]
    pub backs: Vec<Pnid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterDocument {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub spares: Vec<SpareEntry>,
}

impl ClusterDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of node entries, spares included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() + self.spares.len()
    }

    /// Cross-entry checks the registry cannot make one call at a time.
    ///
    /// Duplicate pnids and duplicate names are rejected here so that a bad
    /// document is refused as a whole, naming both offending entries.
    pub fn validate(&self) -> Result<()> {
        self.registry
            .validate()
            .map_err(|e| LoadError::validation(e.to_string()))?;

        if self.node_count() > self.registry.max_nodes {
            return Err(LoadError::validation(format!(
                "{} nodes configured but max_nodes is {}",
                self.node_count(),
                self.registry.max_nodes
            )));
        }

        let entries = self
            .nodes
            .iter()
            .map(|n| (n.pnid, n.name.as_str()))
            .chain(self.spares.iter().map(|s| (s.pnid, s.name.as_str())));

        let mut by_pnid: BTreeMap<Pnid, &str> = BTreeMap::new();
        let mut by_name: BTreeMap<&str, Pnid> = BTreeMap::new();
        for (pnid, name) in entries {
            if let Some(other) = by_pnid.insert(pnid, name) {
                return Err(LoadError::validation(format!(
                    "pnid {} assigned to both {} and {}",
                    pnid, other, name
                )));
            }
            if let Some(other) = by_name.insert(name, pnid) {
                return Err(LoadError::validation(format!(
                    "name {} used by pnids {} and {}",
                    name, other, pnid
                )));
            }
        }
        Ok(())
    }
}
