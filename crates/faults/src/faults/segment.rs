//! Segments on the corner lattice and the corner-indexed segment map.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

/// Corner-lattice index: `i + j * (nx + 1)`.
pub type Corner = usize;

new_key_type! {
    /// Stable key of a segment inside a `SegmentMap`.
    pub struct SegmentKey;
}

/// Undirected edge between two lattice corners, stored with an orientation.
///
/// Equality and hashing ignore the orientation.
#[derive(Clone, Copy, Debug)]
pub struct FaultSegment {
    c1: Corner,
    c2: Corner,
}

impl FaultSegment {
    pub fn new(c1: Corner, c2: Corner) -> Self {
        Self { c1, c2 }
    }

    #[inline]
    pub fn c1(&self) -> Corner {
        self.c1
    }

    #[inline]
    pub fn c2(&self) -> Corner {
        self.c2
    }

    /// Reverse the orientation in place.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.c1, &mut self.c2);
    }

    /// Copy with reversed orientation.
    pub fn swapped(mut self) -> Self {
        self.swap();
        self
    }

    #[inline]
    pub fn touches(&self, corner: Corner) -> bool {
        self.c1 == corner || self.c2 == corner
    }

    /// True if the two segments share at least one corner.
    pub fn joins(&self, other: &FaultSegment) -> bool {
        self.touches(other.c1) || self.touches(other.c2)
    }

    /// The distinct corners of the segment (one entry for a degenerate edge).
    pub fn corners(&self) -> SmallVec<[Corner; 2]> {
        let mut out = SmallVec::new();
        out.push(self.c1);
        if self.c2 != self.c1 {
            out.push(self.c2);
        }
        out
    }

    fn sorted(&self) -> (Corner, Corner) {
        if self.c1 <= self.c2 {
            (self.c1, self.c2)
        } else {
            (self.c2, self.c1)
        }
    }
}

impl PartialEq for FaultSegment {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for FaultSegment {}

impl Hash for FaultSegment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

/// Working set of one layer's unchained segments, indexed by corner.
///
/// Every stored segment is listed under each of its distinct corners; a
/// corner is present exactly while at least one segment touches it. Corners
/// touched by exactly one segment are kept sorted so chains can start from a
/// free end deterministically.
#[derive(Clone, Debug, Default)]
pub struct SegmentMap {
    segments: SlotMap<SegmentKey, FaultSegment>,
    by_corner: FxHashMap<Corner, SmallVec<[SegmentKey; 2]>>,
    free_ends: BTreeSet<Corner>,
}

impl SegmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `segment` under both of its corners.
    pub fn add(&mut self, segment: FaultSegment) -> SegmentKey {
        let key = self.segments.insert(segment);
        for corner in segment.corners() {
            self.by_corner.entry(corner).or_default().push(key);
            self.update_degree(corner);
        }
        key
    }

    /// Remove a segment from the map and from both corner lists.
    pub fn remove(&mut self, key: SegmentKey) -> Option<FaultSegment> {
        let segment = self.segments.remove(key)?;
        for corner in segment.corners() {
            if let Some(keys) = self.by_corner.get_mut(&corner) {
                keys.retain(|k| *k != key);
            }
            self.update_degree(corner);
        }
        Some(segment)
    }

    fn update_degree(&mut self, corner: Corner) {
        match self.by_corner.get(&corner).map(|keys| keys.len()) {
            None | Some(0) => {
                self.by_corner.remove(&corner);
                self.free_ends.remove(&corner);
            }
            Some(1) => {
                self.free_ends.insert(corner);
            }
            Some(_) => {
                self.free_ends.remove(&corner);
            }
        }
    }

    /// Number of distinct corners currently indexed.
    pub fn len(&self) -> usize {
        self.by_corner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Segments touching `corner`, in registration order.
    pub fn segments_at(&self, corner: Corner) -> impl Iterator<Item = FaultSegment> + '_ {
        self.by_corner
            .get(&corner)
            .into_iter()
            .flatten()
            .filter_map(|key| self.segments.get(*key).copied())
    }

    /// Remove and return a segment to start a new chain from.
    ///
    /// Prefers the segment at the smallest corner of degree one, oriented so
    /// that corner is `c1`. Without free ends (closed loops only) any segment
    /// is taken as stored. `None` when the map is empty.
    pub fn pop_start(&mut self) -> Option<FaultSegment> {
        if let Some(&corner) = self.free_ends.iter().next() {
            let key = self
                .by_corner
                .get(&corner)
                .and_then(|keys| keys.first().copied())?;
            let mut segment = self.remove(key)?;
            if segment.c1() != corner {
                segment.swap();
            }
            return Some(segment);
        }
        let key = self.segments.keys().next()?;
        self.remove(key)
    }

    /// Remove and return a segment touching `tail`, if any.
    ///
    /// The segment keeps its stored orientation; the caller orients it.
    pub fn pop_next(&mut self, tail: Corner) -> Option<FaultSegment> {
        let key = self
            .by_corner
            .get(&tail)
            .and_then(|keys| keys.first().copied())?;
        self.remove(key)
    }

    /// Panic if the corner index disagrees with the stored segments.
    pub fn verify(&self) {
        for (key, segment) in &self.segments {
            for corner in segment.corners() {
                assert!(
                    self.by_corner
                        .get(&corner)
                        .is_some_and(|keys| keys.contains(&key)),
                    "segment {}-{} missing under corner {corner}",
                    segment.c1(),
                    segment.c2()
                );
            }
        }
        for (corner, keys) in &self.by_corner {
            assert!(!keys.is_empty(), "empty corner list at {corner}");
            for key in keys {
                assert!(
                    self.segments
                        .get(*key)
                        .is_some_and(|segment| segment.touches(*corner)),
                    "corner {corner} lists a segment that does not touch it"
                );
            }
        }
        let free: BTreeSet<Corner> = self
            .by_corner
            .iter()
            .filter(|(_, keys)| keys.len() == 1)
            .map(|(corner, _)| *corner)
            .collect();
        assert_eq!(free, self.free_ends, "free end index out of date");
    }
}
