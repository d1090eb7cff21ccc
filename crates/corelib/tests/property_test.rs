//! Property-based tests for registry invariants.

use corelib::{CoreRange, NodeRecord, NodeRegistry, Pnid};
use proptest::prelude::*;
use std::collections::BTreeSet;

const CAPACITY: u32 = 12;

#[derive(Debug, Clone)]
enum Op {
    Add { pnid: u32, spare: bool },
    Remove { pnid: u32 },
    SetTargets { pnid: u32, targets: Vec<u32> },
    ResetSpare { pnid: u32 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..CAPACITY, any::<bool>()).prop_map(|(pnid, spare)| Op::Add { pnid, spare }),
        2 => (0..CAPACITY).prop_map(|pnid| Op::Remove { pnid }),
        2 => (0..CAPACITY, prop::collection::vec(0..CAPACITY, 1..4))
            .prop_map(|(pnid, targets)| Op::SetTargets { pnid, targets }),
        1 => (0..CAPACITY).prop_map(|pnid| Op::ResetSpare { pnid }),
    ]
}

fn name_of(pnid: u32) -> String {
    format!("n{:03}", pnid)
}

fn apply(registry: &mut NodeRegistry, op: &Op) {
    // Failures are expected (occupied slot, missing node); they must not
    // disturb the invariants checked afterwards.
    match op {
        Op::Add { pnid, spare } => {
            let _ = registry.add_node(Pnid(*pnid), name_of(*pnid), CoreRange::NONE, *spare);
        }
        Op::Remove { pnid } => {
            let _ = registry.remove_node(Pnid(*pnid));
        }
        Op::SetTargets { pnid, targets } => {
            let targets: Vec<Pnid> = targets.iter().copied().map(Pnid).collect();
            let _ = registry.set_backup_targets(Pnid(*pnid), &targets);
        }
        Op::ResetSpare { pnid } => {
            let _ = registry.reset_spare_role(Pnid(*pnid));
        }
    }
}

/// Spare set by walking every spare in registration order.
fn spare_set_by_scan(registry: &NodeRegistry, name: &str) -> Vec<Pnid> {
    for spare in registry.spares() {
        let mut members: Vec<&NodeRecord> = Vec::new();
        let candidates = spare
            .backup_targets()
            .iter()
            .copied()
            .chain(std::iter::once(spare.pnid()));
        for pnid in candidates {
            if let Some(rec) = registry.find_by_pnid(pnid) {
                if !members.iter().any(|m| m.pnid() == pnid) {
                    members.push(rec);
                }
            }
        }
        if members.iter().any(|m| m.name() == name) {
            return members.iter().map(|m| m.pnid()).collect();
        }
    }
    Vec::new()
}

proptest! {
    #[test]
    fn test_slots_match_records(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut registry = NodeRegistry::new(CAPACITY);
        for op in &ops {
            apply(&mut registry, op);

            let mut seen = BTreeSet::new();
            for rec in registry.iter() {
                // Every traversed record sits in the slot named by its pnid
                let slot = registry.find_by_pnid(rec.pnid());
                prop_assert_eq!(slot.map(|r| r.name()), Some(rec.name()));
                prop_assert!(seen.insert(rec.pnid()), "record visited twice");
            }
            prop_assert_eq!(seen.len(), registry.len());

            let occupied = (0..CAPACITY)
                .filter(|&p| registry.find_by_pnid(Pnid(p)).is_some())
                .count();
            prop_assert_eq!(occupied, registry.len());
        }
    }

    #[test]
    fn test_cursor_is_lowest_free(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut registry = NodeRegistry::new(CAPACITY);
        for op in &ops {
            apply(&mut registry, op);
            let lowest = (0..CAPACITY)
                .map(Pnid)
                .find(|&p| registry.find_by_pnid(p).is_none());
            prop_assert_eq!(registry.next_free_pnid(), lowest);
        }
    }

    #[test]
    fn test_traversal_is_add_order(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut registry = NodeRegistry::new(CAPACITY);
        let mut expected: Vec<Pnid> = Vec::new();
        for op in &ops {
            match op {
                Op::Add { pnid, .. } if registry.find_by_pnid(Pnid(*pnid)).is_none() => {
                    expected.push(Pnid(*pnid));
                }
                Op::Remove { pnid } => expected.retain(|p| *p != Pnid(*pnid)),
                _ => {}
            }
            apply(&mut registry, op);
        }
        let actual: Vec<Pnid> = registry.iter().map(|r| r.pnid()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_spare_count_matches_roles(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut registry = NodeRegistry::new(CAPACITY);
        for op in &ops {
            apply(&mut registry, op);
            let spares = registry.iter().filter(|r| r.is_spare()).count();
            prop_assert_eq!(registry.spare_count(), spares);
            prop_assert_eq!(registry.spares().count(), spares);
        }
    }

    #[test]
    fn test_indexed_spare_set_matches_scan(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut registry = NodeRegistry::new(CAPACITY);
        for op in &ops {
            apply(&mut registry, op);
        }
        for pnid in 0..CAPACITY {
            let name = name_of(pnid);
            let indexed = registry.compute_spare_set(&name).pnids();
            prop_assert_eq!(indexed, spare_set_by_scan(&registry, &name));
        }
    }
}
