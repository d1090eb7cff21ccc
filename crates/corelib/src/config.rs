//! Registry configuration.

use crate::error::{Error, Result};
use crate::node::MAX_HOSTNAME_LEN;
use serde::{Deserialize, Serialize};

/// Default capacity when a configuration omits `max_nodes`.
pub const DEFAULT_MAX_NODES: usize = 256;

/// What to do when a spare lists a target another spare already backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Allowed; the spare registered first determines the failover group.
    #[default]
    FirstRegisteredWins,
    /// Rejected with `Error::SpareConflict`.
    Reject,
}

/// Fixed parameters of a `NodeRegistry`, chosen at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of pnid slots. Never changes for the registry's lifetime.
    pub max_nodes: usize,

    /// Longest hostname accepted, in bytes.
    pub max_name_len: usize,

    /// Handling of overlapping backup targets between spares.
    pub overlap_policy: OverlapPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_name_len: MAX_HOSTNAME_LEN,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl RegistryConfig {
    pub fn with_max_nodes(max_nodes: usize) -> Self {
        Self {
            max_nodes,
            ..Self::default()
        }
    }

    pub fn overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_nodes > u32::MAX as usize {
            return Err(Error::config(format!(
                "max_nodes {} exceeds the pnid range",
                self.max_nodes
            )));
        }
        if self.max_name_len == 0 {
            return Err(Error::config("max_name_len must be at least 1"));
        }
        if self.max_name_len > MAX_HOSTNAME_LEN {
            return Err(Error::config(format!(
                "max_name_len {} exceeds the platform limit {}",
                self.max_name_len, MAX_HOSTNAME_LEN
            )));
        }
        Ok(())
    }
}
