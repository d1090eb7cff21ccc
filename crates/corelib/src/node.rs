//! Physical node records.
//!
//! A `NodeRecord` is the registry's view of one physical machine: its dense
//! `Pnid`, hostname, the excluded core range handed to the affinity layer and
//! its spare role. Records are created and destroyed only by the registry.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform limit on processor/host names, in bytes.
pub const MAX_HOSTNAME_LEN: usize = 256;

/// Physical node identifier.
///
/// Dense index into the registry's slot table, so it is always smaller than
/// the registry capacity once a record holds it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pnid(pub u32);

impl Pnid {
    /// Slot index for this pnid.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Pnid(index as u32)
    }
}

impl fmt::Display for Pnid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Pnid {
    fn from(value: u32) -> Self {
        Pnid(value)
    }
}

/// Range of cores the affinity layer keeps away from the workload.
///
/// Opaque to the registry. `CoreRange::NONE` means no core is excluded.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CoreRange {
    pub first: i32,
    pub last: i32,
}

impl CoreRange {
    pub const NONE: CoreRange = CoreRange { first: -1, last: -1 };

    pub fn new(first: i32, last: i32) -> Self {
        Self { first, last }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for CoreRange {
    fn default() -> Self {
        Self::NONE
    }
}

/// Check a hostname against the registry's naming rules.
pub fn validate_hostname(name: &str, max_len: usize) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "hostname cannot be empty"));
    }
    if name.len() > max_len {
        return Err(Error::invalid_name(
            name,
            format!("hostname is {} bytes, limit is {}", name.len(), max_len),
        ));
    }
    Ok(())
}

/// One physical node known to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pnid: Pnid,
    name: String,
    excluded_cores: CoreRange,
    is_spare: bool,
    backup_targets: Vec<Pnid>,
    max_name_len: usize,
}

impl NodeRecord {
    pub(crate) fn new(
        pnid: Pnid,
        name: impl Into<String>,
        excluded_cores: CoreRange,
        is_spare: bool,
        max_name_len: usize,
    ) -> Result<Self> {
        let name = name.into();
        validate_hostname(&name, max_name_len)?;
        Ok(Self {
            pnid,
            name,
            excluded_cores,
            is_spare,
            backup_targets: Vec::new(),
            max_name_len,
        })
    }

    #[inline]
    pub fn pnid(&self) -> Pnid {
        self.pnid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn excluded_cores(&self) -> CoreRange {
        self.excluded_cores
    }

    #[inline]
    pub fn is_spare(&self) -> bool {
        self.is_spare
    }

    /// Pnids this node can stand in for, in configured order.
    #[inline]
    pub fn backup_targets(&self) -> &[Pnid] {
        &self.backup_targets
    }

    #[inline]
    pub fn backup_count(&self) -> usize {
        self.backup_targets.len()
    }

    /// Copy backup targets into caller storage.
    ///
    /// Returns the number of ids written, bounded by `out.len()`. Zero when
    /// the node backs nothing or `out` is empty.
    pub fn copy_backup_targets(&self, out: &mut [Pnid]) -> usize {
        let n = self.backup_targets.len().min(out.len());
        out[..n].copy_from_slice(&self.backup_targets[..n]);
        n
    }

    /// Rename the node. The old name is kept if the new one is invalid.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_hostname(&name, self.max_name_len)?;
        self.name = name;
        Ok(())
    }

    pub fn set_excluded_cores(&mut self, range: CoreRange) {
        self.excluded_cores = range;
    }

    pub fn set_excluded_first_core(&mut self, first: i32) {
        self.excluded_cores.first = first;
    }

    pub fn set_excluded_last_core(&mut self, last: i32) {
        self.excluded_cores.last = last;
    }

    // Spare role mutators stay crate-private: the registry's reverse index
    // must change in the same call.

    pub(crate) fn set_backup_targets(&mut self, targets: &[Pnid]) {
        self.backup_targets = targets.to_vec();
        self.is_spare = true;
    }

    pub(crate) fn reset_spare_role(&mut self) {
        self.is_spare = false;
        self.backup_targets.clear();
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(pnid={}", self.name, self.pnid)?;
        if self.is_spare {
            write!(f, ", spare")?;
        }
        write!(f, ")")
    }
}
