//! Next-free-pnid cursor.
//!
//! The cursor caches the lowest empty slot so that the common case (nodes
//! configured in ascending pnid order) allocates in O(1). It is updated on
//! every insert and removal and falls back to a left-to-right scan when the
//! cached slot gets taken.
//!
//! # Invariant
//!
//! `Some(p)`: `p` is the lowest empty slot. `None`: every slot is occupied
//! (or nothing is cached, in which case the next insert rescans from 0).

use crate::node::Pnid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeCursor {
    next: Option<Pnid>,
}

impl FreeCursor {
    /// Cursor for an empty table of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            next: (capacity > 0).then_some(Pnid(0)),
        }
    }

    #[inline]
    pub fn get(&self) -> Option<Pnid> {
        self.next
    }

    /// Update after `pnid` was occupied.
    ///
    /// `is_free(i)` reports whether slot `i` is empty after the insert.
    pub fn after_insert<F>(&mut self, pnid: Pnid, capacity: usize, is_free: F)
    where
        F: Fn(usize) -> bool,
    {
        let Some(cached) = self.next else {
            self.next = scan(0, capacity, &is_free);
            return;
        };

        let mut next = cached.index();
        if next == pnid.index() {
            next += 1;
        }

        self.next = if next >= capacity {
            // Ran off the end, look for a hole from the beginning
            scan(0, capacity, &is_free)
        } else if !is_free(next) {
            let start = if next + 1 < capacity { next + 1 } else { 0 };
            scan(start, capacity, &is_free)
        } else {
            Some(Pnid::from_index(next))
        };
    }

    /// Update after `pnid` was vacated. The lower pnid always wins.
    pub fn after_remove(&mut self, pnid: Pnid) {
        match self.next {
            Some(next) if next <= pnid => {}
            _ => self.next = Some(pnid),
        }
    }

    pub fn reset(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }
}

fn scan<F>(start: usize, capacity: usize, is_free: &F) -> Option<Pnid>
where
    F: Fn(usize) -> bool,
{
    (start..capacity).find(|&i| is_free(i)).map(Pnid::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a cursor against a plain occupancy vector.
    struct Harness {
        used: Vec<bool>,
        cursor: FreeCursor,
    }

    impl Harness {
        fn new(capacity: usize) -> Self {
            Self {
                used: vec![false; capacity],
                cursor: FreeCursor::new(capacity),
            }
        }

        fn insert(&mut self, pnid: u32) {
            self.used[pnid as usize] = true;
            let used = &self.used;
            self.cursor
                .after_insert(Pnid(pnid), used.len(), |i| !used[i]);
        }

        fn remove(&mut self, pnid: u32) {
            self.used[pnid as usize] = false;
            self.cursor.after_remove(Pnid(pnid));
        }

        fn lowest_free(&self) -> Option<Pnid> {
            self.used.iter().position(|u| !u).map(Pnid::from_index)
        }
    }

    #[test]
    fn test_sequential_inserts_advance() {
        let mut h = Harness::new(4);
        assert_eq!(h.cursor.get(), Some(Pnid(0)));
        h.insert(0);
        assert_eq!(h.cursor.get(), Some(Pnid(1)));
        h.insert(1);
        assert_eq!(h.cursor.get(), Some(Pnid(2)));
    }

    #[test]
    fn test_out_of_order_insert_keeps_hole() {
        let mut h = Harness::new(4);
        h.insert(0);
        h.insert(2);
        h.insert(3);
        assert_eq!(h.cursor.get(), Some(Pnid(1)));
    }

    #[test]
    fn test_taken_cursor_rescans_forward() {
        let mut h = Harness::new(5);
        h.insert(2);
        h.insert(1);
        assert_eq!(h.cursor.get(), Some(Pnid(0)));
        // Cursor advances to 1, which is taken, so the scan starts at 2
        h.insert(0);
        assert_eq!(h.cursor.get(), Some(Pnid(3)));
    }

    #[test]
    fn test_full_then_reclaim() {
        let mut h = Harness::new(5);
        for p in 0..5 {
            h.insert(p);
        }
        assert_eq!(h.cursor.get(), None);

        h.remove(2);
        assert_eq!(h.cursor.get(), Some(Pnid(2)));

        h.remove(4);
        assert_eq!(h.cursor.get(), Some(Pnid(2)), "lower pnid wins");

        h.remove(0);
        assert_eq!(h.cursor.get(), Some(Pnid(0)));
    }

    #[test]
    fn test_wraparound_scan_from_start() {
        let mut h = Harness::new(3);
        h.insert(0);
        h.insert(1);
        h.remove(0);
        assert_eq!(h.cursor.get(), Some(Pnid(0)));
        h.insert(2);
        assert_eq!(h.cursor.get(), Some(Pnid(0)));
        h.insert(0);
        assert_eq!(h.cursor.get(), None);
    }

    #[test]
    fn test_zero_capacity() {
        let cursor = FreeCursor::new(0);
        assert_eq!(cursor.get(), None);
    }

    #[test]
    fn test_matches_scan_over_mixed_sequence() {
        let mut h = Harness::new(6);
        let ops: [(bool, u32); 12] = [
            (true, 3),
            (true, 0),
            (true, 1),
            (true, 2),
            (false, 1),
            (true, 5),
            (true, 1),
            (true, 4),
            (false, 3),
            (false, 0),
            (true, 0),
            (true, 3),
        ];
        for (insert, pnid) in ops {
            if insert {
                h.insert(pnid);
            } else {
                h.remove(pnid);
            }
            assert_eq!(h.cursor.get(), h.lowest_free(), "after {:?}", (insert, pnid));
        }
    }
}
