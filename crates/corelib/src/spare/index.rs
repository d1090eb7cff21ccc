//! Spare bookkeeping: registration order plus a target -> spares index.
//!
//! A spare only stores the pnids it backs; nothing on the target side points
//! back. The reverse map here lets a failover query go straight from a node to
//! the spares that list it instead of resolving every spare's targets.

use crate::node::Pnid;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct SpareIndex {
    next_rank: u64,
    /// spare -> registration rank (lower registered earlier)
    ranks: BTreeMap<Pnid, u64>,
    /// target -> spares listing it
    owners: BTreeMap<Pnid, BTreeSet<Pnid>>,
}

impl SpareIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered spares.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn is_registered(&self, spare: Pnid) -> bool {
        self.ranks.contains_key(&spare)
    }

    /// Register `spare` at the end of the order. No-op if already registered.
    pub fn register(&mut self, spare: Pnid) {
        if !self.ranks.contains_key(&spare) {
            self.ranks.insert(spare, self.next_rank);
            self.next_rank += 1;
        }
    }

    /// Drop `spare` and every index entry naming it as owner.
    pub fn unregister(&mut self, spare: Pnid, targets: &[Pnid]) {
        self.unlink(spare, targets);
        self.ranks.remove(&spare);
    }

    /// Replace the indexed targets of `spare`, registering it if needed.
    pub fn set_targets(&mut self, spare: Pnid, old: &[Pnid], new: &[Pnid]) {
        self.register(spare);
        self.unlink(spare, old);
        for &target in new {
            self.owners.entry(target).or_default().insert(spare);
        }
    }

    fn unlink(&mut self, spare: Pnid, targets: &[Pnid]) {
        for target in targets {
            if let Some(set) = self.owners.get_mut(target) {
                set.remove(&spare);
                if set.is_empty() {
                    self.owners.remove(target);
                }
            }
        }
    }

    /// First membership `spare` backing `targets` would share with another
    /// group, as `(pnid, owning spare)`.
    ///
    /// Every registered spare owns its own group, so besides targets already
    /// listed by another spare this also catches `spare` being listed by
    /// another spare and a target that is itself a registered spare.
    pub fn conflict(&self, spare: Pnid, targets: &[Pnid]) -> Option<(Pnid, Pnid)> {
        if let Some(owner) = self.listed_by_other(spare, spare) {
            return Some((spare, owner));
        }
        targets.iter().find_map(|&target| {
            if target != spare && self.is_registered(target) {
                return Some((target, target));
            }
            self.listed_by_other(target, spare).map(|owner| (target, owner))
        })
    }

    /// A spare other than `except` listing `target`.
    pub fn listed_by_other(&self, target: Pnid, except: Pnid) -> Option<Pnid> {
        self.owners_of(target).find(|&owner| owner != except)
    }

    /// Spares listing `target`, unordered.
    pub fn owners_of(&self, target: Pnid) -> impl Iterator<Item = Pnid> + '_ {
        self.owners.get(&target).into_iter().flatten().copied()
    }

    /// Earliest-registered spare whose group contains `pnid`: `pnid` itself if
    /// it is a spare, or any spare listing it.
    pub fn earliest_group_owner(&self, pnid: Pnid) -> Option<(u64, Pnid)> {
        let own = self.ranks.get(&pnid).map(|&rank| (rank, pnid));
        let listed = self
            .owners_of(pnid)
            .filter_map(|spare| self.ranks.get(&spare).map(|&rank| (rank, spare)));
        own.into_iter().chain(listed).min()
    }

    /// Spares in registration order.
    pub fn ordered(&self) -> Vec<Pnid> {
        let mut spares: Vec<(u64, Pnid)> = self.ranks.iter().map(|(&p, &r)| (r, p)).collect();
        spares.sort_unstable();
        spares.into_iter().map(|(_, p)| p).collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
