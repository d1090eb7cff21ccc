//! Dense slot table with an insertion-ordered traversal list.
//!
//! Slot `i` owns the record whose pnid is `i`. Traversal order is kept as a
//! doubly-linked list threaded through the table by pnid, so appending and
//! splicing out are O(1) and no record ever holds a pointer to another.

use super::cursor::FreeCursor;
use crate::error::{Error, Result};
use crate::node::{NodeRecord, Pnid};

#[derive(Debug, Clone)]
struct Slot {
    record: NodeRecord,
    prev: Option<Pnid>,
    next: Option<Pnid>,
}

#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<Option<Slot>>,
    head: Option<Pnid>,
    tail: Option<Pnid>,
    live: usize,
    cursor: FreeCursor,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: None,
            tail: None,
            live: 0,
            cursor: FreeCursor::new(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub fn head(&self) -> Option<Pnid> {
        self.head
    }

    #[inline]
    pub fn tail(&self) -> Option<Pnid> {
        self.tail
    }

    #[inline]
    pub fn next_free(&self) -> Option<Pnid> {
        self.cursor.get()
    }

    fn slot(&self, pnid: Pnid) -> Option<&Slot> {
        self.slots.get(pnid.index()).and_then(Option::as_ref)
    }

    pub fn get(&self, pnid: Pnid) -> Option<&NodeRecord> {
        self.slot(pnid).map(|s| &s.record)
    }

    pub fn get_mut(&mut self, pnid: Pnid) -> Option<&mut NodeRecord> {
        self.slots
            .get_mut(pnid.index())
            .and_then(Option::as_mut)
            .map(|s| &mut s.record)
    }

    pub fn next_of(&self, pnid: Pnid) -> Option<Pnid> {
        self.slot(pnid).and_then(|s| s.next)
    }

    pub fn prev_of(&self, pnid: Pnid) -> Option<Pnid> {
        self.slot(pnid).and_then(|s| s.prev)
    }

    fn check_range(&self, pnid: Pnid) -> Result<()> {
        if pnid.index() < self.capacity() {
            Ok(())
        } else {
            Err(Error::InvalidPnid {
                pnid,
                max: self.capacity(),
            })
        }
    }

    /// Ok if `pnid` is in range and its slot is empty.
    pub fn check_vacant(&self, pnid: Pnid) -> Result<()> {
        self.check_range(pnid)?;
        match self.slot(pnid) {
            Some(_) => Err(Error::PnidInUse(pnid)),
            None => Ok(()),
        }
    }

    /// Ok if `pnid` is in range and its slot is occupied.
    pub fn check_occupied(&self, pnid: Pnid) -> Result<()> {
        self.check_range(pnid)?;
        match self.slot(pnid) {
            Some(_) => Ok(()),
            None => Err(Error::NodeNotFound(pnid)),
        }
    }

    /// Place `record` in its slot and append it to the traversal tail.
    pub fn insert(&mut self, record: NodeRecord) -> Result<&NodeRecord> {
        let pnid = record.pnid();
        self.check_vacant(pnid)?;

        let prev = self.tail;
        if let Some(tail) = prev.and_then(|t| self.slots[t.index()].as_mut()) {
            tail.next = Some(pnid);
        }
        if self.head.is_none() {
            self.head = Some(pnid);
        }
        self.tail = Some(pnid);
        self.live += 1;

        self.slots[pnid.index()] = Some(Slot {
            record,
            prev,
            next: None,
        });

        let slots = &self.slots;
        self.cursor
            .after_insert(pnid, slots.len(), |i| slots[i].is_none());

        self.get(pnid).ok_or(Error::NodeNotFound(pnid))
    }

    /// Splice the record at `pnid` out of traversal and hand it back.
    pub fn remove(&mut self, pnid: Pnid) -> Result<NodeRecord> {
        self.check_range(pnid)?;
        let Some(slot) = self.slots[pnid.index()].take() else {
            return Err(Error::NodeNotFound(pnid));
        };

        match slot.prev {
            Some(prev) => {
                if let Some(p) = self.slots[prev.index()].as_mut() {
                    p.next = slot.next;
                }
            }
            None => self.head = slot.next,
        }
        match slot.next {
            Some(next) => {
                if let Some(n) = self.slots[next.index()].as_mut() {
                    n.prev = slot.prev;
                }
            }
            None => self.tail = slot.prev,
        }

        self.live -= 1;
        self.cursor.after_remove(pnid);
        Ok(slot.record)
    }

    /// Drop every record and return to the just-constructed state.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.head = None;
        self.tail = None;
        self.live = 0;
        self.cursor.reset(self.slots.len());
    }

    /// Live records in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            next: self.head,
            remaining: self.live,
        }
    }

    /// Lowest empty slot found by a full scan. Used to cross-check the cursor.
    pub fn first_vacant_by_scan(&self) -> Option<Pnid> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(Pnid::from_index)
    }
}

/// Insertion-order iterator over a `SlotTable`.
pub struct Iter<'a> {
    table: &'a SlotTable,
    next: Option<Pnid>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a NodeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.table.slot(self.next?)?;
        self.next = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&slot.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
