//! The node registry.

use super::slots::{Iter, SlotTable};
use crate::config::{OverlapPolicy, RegistryConfig};
use crate::diag::{report, DiagCode};
use crate::error::{Error, Result};
use crate::node::{CoreRange, NodeRecord, Pnid};
use crate::snapshot::{NodeSnapshot, RegistrySnapshot};
use crate::spare::{set, SpareIndex, SpareSet};

/// Registry of physical nodes.
///
/// Owns every `NodeRecord`. Records are addressable by pnid in O(1), by name
/// with a linear scan, and iterate in the order they were added.
///
/// # Thread Safety
///
/// Not synchronised. Mutations take `&mut self`; hosts that share a registry
/// between threads wrap it in `SharedRegistry`.
///
/// # Example
///
/// ```rust
/// use corelib::{CoreRange, NodeRegistry, Pnid};
///
/// let mut registry = NodeRegistry::new(4);
/// registry.add_node(Pnid(0), "n000", CoreRange::NONE, false).unwrap();
/// registry.add_node(Pnid(1), "n001", CoreRange::NONE, true).unwrap();
/// registry.set_backup_targets(Pnid(1), &[Pnid(0)]).unwrap();
///
/// let set = registry.compute_spare_set("n000");
/// assert_eq!(set.names(), vec!["n000", "n001"]);
/// assert_eq!(registry.next_free_pnid(), Some(Pnid(2)));
/// ```
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    config: RegistryConfig,
    table: SlotTable,
    spares: SpareIndex,
}

impl NodeRegistry {
    /// Registry with `max_nodes` slots and default settings otherwise.
    ///
    /// Takes `u32` rather than the `usize` of `RegistryConfig::max_nodes`:
    /// every slot index must fit in a `Pnid`, and with the type enforcing that
    /// the resulting config always passes `RegistryConfig::validate`. Use
    /// `with_config` for a `usize` capacity or non-default settings.
    pub fn new(max_nodes: u32) -> Self {
        let config = RegistryConfig::with_max_nodes(max_nodes as usize);
        Self::build(config)
    }

    /// Registry from an explicit configuration.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            report(DiagCode::ConfigRejected, None, None, &err);
            return Err(err);
        }
        Ok(Self::build(config))
    }

    fn build(config: RegistryConfig) -> Self {
        let table = SlotTable::new(config.max_nodes);
        Self {
            config,
            table,
            spares: SpareIndex::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fixed slot count.
    #[inline]
    pub fn max_nodes(&self) -> usize {
        self.table.capacity()
    }

    /// Number of live records.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.table.len() == self.table.capacity()
    }

    /// Number of live records in a spare role.
    #[inline]
    pub fn spare_count(&self) -> usize {
        self.spares.len()
    }

    /// Lowest empty pnid, or `None` when every slot is taken.
    #[inline]
    pub fn next_free_pnid(&self) -> Option<Pnid> {
        self.table.next_free()
    }

    /// Register a node at `pnid`.
    ///
    /// # Errors
    ///
    /// - `InvalidPnid` if `pnid >= max_nodes`
    /// - `PnidInUse` if the slot already holds a node
    /// - `InvalidName` if `name` is empty or too long
    /// - `SpareConflict` if overlaps are rejected, `is_spare` is set and
    ///   another spare already lists `pnid`
    ///
    /// The registry is unchanged on error.
    pub fn add_node(
        &mut self,
        pnid: Pnid,
        name: impl Into<String>,
        excluded_cores: CoreRange,
        is_spare: bool,
    ) -> Result<&NodeRecord> {
        let name = name.into();

        if let Err(err) = self.table.check_vacant(pnid) {
            let code = match err {
                Error::PnidInUse(_) => DiagCode::AddPnidInUse,
                _ => DiagCode::AddInvalidPnid,
            };
            report(code, Some(pnid), Some(name.as_str()), &err);
            return Err(err);
        }

        if is_spare && self.config.overlap_policy == OverlapPolicy::Reject {
            if let Some(owner) = self.spares.listed_by_other(pnid, pnid) {
                let err = Error::SpareConflict { target: pnid, owner };
                report(DiagCode::SpareConflict, Some(pnid), Some(name.as_str()), &err);
                return Err(err);
            }
        }

        let record = match NodeRecord::new(
            pnid,
            name,
            excluded_cores,
            is_spare,
            self.config.max_name_len,
        ) {
            Ok(record) => record,
            Err(err) => {
                report(DiagCode::AddInvalidName, Some(pnid), None, &err);
                return Err(err);
            }
        };

        self.table.insert(record)?;
        if is_spare {
            self.spares.register(pnid);
        }

        tracing::debug!(
            pnid = %pnid,
            next_free = ?self.table.next_free(),
            live = self.table.len(),
            max = self.table.capacity(),
            "added physical node"
        );
        metrics::counter!("pnode_registry_adds_total").increment(1);
        self.publish_sizes();

        self.table.get(pnid).ok_or(Error::NodeNotFound(pnid))
    }

    /// Remove the node at `pnid` and return its record.
    ///
    /// A removed spare leaves the spare order and the reverse index with it.
    /// Other spares that list `pnid` keep the id; it simply stops resolving.
    pub fn remove_node(&mut self, pnid: Pnid) -> Result<NodeRecord> {
        let record = match self.table.remove(pnid) {
            Ok(record) => record,
            Err(err) => {
                let code = match err {
                    Error::NodeNotFound(_) => DiagCode::RemoveNotFound,
                    _ => DiagCode::RemoveInvalidPnid,
                };
                report(code, Some(pnid), None, &err);
                return Err(err);
            }
        };

        if self.spares.is_registered(pnid) {
            self.spares.unregister(pnid, record.backup_targets());
        }

        tracing::debug!(
            node = %record.name(),
            pnid = %pnid,
            next_free = ?self.table.next_free(),
            live = self.table.len(),
            "removed physical node"
        );
        metrics::counter!("pnode_registry_removes_total").increment(1);
        self.publish_sizes();

        Ok(record)
    }

    /// Remove every node. `max_nodes` and the configuration are kept.
    pub fn clear(&mut self) {
        let removed = self.table.len();
        self.table.clear();
        self.spares.clear();
        tracing::debug!(removed, "cleared physical node registry");
        self.publish_sizes();
    }

    pub fn find_by_pnid(&self, pnid: Pnid) -> Option<&NodeRecord> {
        self.table.get(pnid)
    }

    /// First node, in insertion order, named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&NodeRecord> {
        self.table.iter().find(|r| r.name() == name)
    }

    pub fn find_pnid_by_name(&self, name: &str) -> Option<Pnid> {
        self.find_by_name(name).map(NodeRecord::pnid)
    }

    /// Mutable access for renames and core-range edits.
    pub fn get_mut(&mut self, pnid: Pnid) -> Option<&mut NodeRecord> {
        self.table.get_mut(pnid)
    }

    /// Make the node at `pnid` a spare backing `targets`.
    ///
    /// Replaces any previous target list.
    ///
    /// # Errors
    ///
    /// - `InvalidPnid` / `NodeNotFound` if `pnid` holds no node
    /// - `InvariantViolation` if `targets` is empty (use `reset_spare_role`)
    ///   or longer than `max_nodes`
    /// - `InvalidPnid` if a target is out of range
    /// - `SpareConflict` if overlaps are rejected and the change would put a
    ///   node in two groups: a target already listed by another spare, a
    ///   target that is itself a spare, or `pnid` listed by another spare
    pub fn set_backup_targets(&mut self, pnid: Pnid, targets: &[Pnid]) -> Result<()> {
        if let Err(err) = self.table.check_occupied(pnid) {
            report(DiagCode::SpareNotFound, Some(pnid), None, &err);
            return Err(err);
        }
        if let Err(err) = self.validate_targets(pnid, targets) {
            let code = match err {
                Error::SpareConflict { .. } => DiagCode::SpareConflict,
                _ => DiagCode::SpareInvalidTargets,
            };
            report(code, Some(pnid), None, &err);
            return Err(err);
        }

        let record = self
            .table
            .get_mut(pnid)
            .ok_or(Error::NodeNotFound(pnid))?;
        let old = record.backup_targets().to_vec();
        record.set_backup_targets(targets);
        self.spares.set_targets(pnid, &old, targets);

        tracing::debug!(pnid = %pnid, targets = ?targets, "configured spare node");
        self.publish_sizes();
        Ok(())
    }

    fn validate_targets(&self, pnid: Pnid, targets: &[Pnid]) -> Result<()> {
        if targets.is_empty() {
            return Err(Error::invariant(format!(
                "empty backup target list for pnid {}",
                pnid
            )));
        }
        if targets.len() > self.max_nodes() {
            return Err(Error::invariant(format!(
                "{} backup targets for pnid {} exceed {} slots",
                targets.len(),
                pnid,
                self.max_nodes()
            )));
        }
        if let Some(&bad) = targets.iter().find(|t| t.index() >= self.max_nodes()) {
            return Err(Error::InvalidPnid {
                pnid: bad,
                max: self.max_nodes(),
            });
        }
        if self.config.overlap_policy == OverlapPolicy::Reject {
            if let Some((target, owner)) = self.spares.conflict(pnid, targets) {
                return Err(Error::SpareConflict { target, owner });
            }
        }
        Ok(())
    }

    /// Clear the spare role of the node at `pnid`. Idempotent.
    pub fn reset_spare_role(&mut self, pnid: Pnid) -> Result<()> {
        if let Err(err) = self.table.check_occupied(pnid) {
            report(DiagCode::SpareNotFound, Some(pnid), None, &err);
            return Err(err);
        }

        let record = self
            .table
            .get_mut(pnid)
            .ok_or(Error::NodeNotFound(pnid))?;
        let old = record.backup_targets().to_vec();
        record.reset_spare_role();
        self.spares.unregister(pnid, &old);
        self.publish_sizes();
        Ok(())
    }

    /// Failover group containing the node named `name`.
    ///
    /// Empty when no spare's group contains it. If several spares back the
    /// node, the one registered first wins.
    pub fn compute_spare_set(&self, name: &str) -> SpareSet<'_> {
        set::resolve(&self.table, &self.spares, name)
    }

    /// Live nodes in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        self.table.iter()
    }

    /// Spare nodes in registration order.
    pub fn spares(&self) -> impl Iterator<Item = &NodeRecord> + '_ {
        self.spares
            .ordered()
            .into_iter()
            .filter_map(move |p| self.table.get(p))
    }

    pub fn first(&self) -> Option<&NodeRecord> {
        self.table.head().and_then(|p| self.table.get(p))
    }

    pub fn last(&self) -> Option<&NodeRecord> {
        self.table.tail().and_then(|p| self.table.get(p))
    }

    /// Node added after `pnid`, if any.
    pub fn next_of(&self, pnid: Pnid) -> Option<&NodeRecord> {
        self.table.next_of(pnid).and_then(|p| self.table.get(p))
    }

    /// Node added before `pnid`, if any.
    pub fn prev_of(&self, pnid: Pnid) -> Option<&NodeRecord> {
        self.table.prev_of(pnid).and_then(|p| self.table.get(p))
    }

    /// Serialisable view of the current state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            config: self.config.clone(),
            next_free: self.next_free_pnid(),
            spare_order: self.spares.ordered(),
            nodes: self.iter().map(NodeSnapshot::from).collect(),
        }
    }

    fn publish_sizes(&self) {
        metrics::gauge!("pnode_registry_live_nodes").set(self.table.len() as f64);
        metrics::gauge!("pnode_registry_spare_nodes").set(self.spares.len() as f64);
    }
}

impl<'a> IntoIterator for &'a NodeRegistry {
    type Item = &'a NodeRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
