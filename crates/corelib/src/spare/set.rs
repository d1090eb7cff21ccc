//! Failover group ("spare set") resolution.
//!
//! # Definition
//!
//! The spare set containing node `name` is `{spare} ∪ backup_targets(spare)`
//! for the earliest-registered spare whose union, resolved against the live
//! registry, contains a record named `name`. Ids that no longer resolve are
//! dropped. When no spare's union contains `name` the set is empty.
//!
//! # Algorithm
//!
//! 1. Collect the pnids of live records named `name` (usually one)
//! 2. For each, ask the index for the earliest spare whose group holds it:
//!    the node itself if it is a spare, else the spares listing it
//! 3. Keep the overall earliest spare
//! 4. Resolve that spare's `targets ++ [spare]`, skipping dangling and
//!    duplicate ids
//!
//! # Performance
//!
//! - **Time**: O(n + k log s) where n = live nodes (name scan), k = owners of
//!   the matched pnids, s = spares
//! - **Space**: O(t) for the returned members, t = targets of the winner

use super::index::SpareIndex;
use crate::node::{NodeRecord, Pnid};
use crate::registry::SlotTable;

/// A resolved failover group.
///
/// Members are in the spare's configured target order followed by the spare.
#[derive(Debug, Clone, Default)]
pub struct SpareSet<'a> {
    spare: Option<Pnid>,
    members: Vec<&'a NodeRecord>,
}

impl<'a> SpareSet<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The spare that owns this group, `None` for the empty set.
    pub fn spare(&self) -> Option<Pnid> {
        self.spare
    }

    pub fn members(&self) -> &[&'a NodeRecord] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a NodeRecord> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|r| r.name() == name)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.members.iter().map(|&r| r.name()).collect()
    }

    pub fn pnids(&self) -> Vec<Pnid> {
        self.members.iter().map(|r| r.pnid()).collect()
    }
}

impl<'a> IntoIterator for SpareSet<'a> {
    type Item = &'a NodeRecord;
    type IntoIter = std::vec::IntoIter<&'a NodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

/// Resolve the spare set containing `name`.
pub(crate) fn resolve<'a>(table: &'a SlotTable, index: &SpareIndex, name: &str) -> SpareSet<'a> {
    let winner = table
        .iter()
        .filter(|r| r.name() == name)
        .filter_map(|r| index.earliest_group_owner(r.pnid()))
        .min();

    let Some((_, spare)) = winner else {
        tracing::trace!(node = name, "no spare set contains node");
        return SpareSet::empty();
    };
    let Some(spare_rec) = table.get(spare) else {
        return SpareSet::empty();
    };

    let mut members: Vec<&NodeRecord> = Vec::with_capacity(spare_rec.backup_count() + 1);
    let candidates = spare_rec
        .backup_targets()
        .iter()
        .copied()
        .chain(std::iter::once(spare));
    for pnid in candidates {
        // A target may have been decommissioned since it was configured
        let Some(rec) = table.get(pnid) else { continue };
        if !members.iter().any(|m| m.pnid() == pnid) {
            members.push(rec);
        }
    }

    tracing::debug!(
        node = name,
        spare = %spare_rec.name(),
        count = members.len(),
        "resolved spare set"
    );
    SpareSet {
        spare: Some(spare),
        members,
    }
}
