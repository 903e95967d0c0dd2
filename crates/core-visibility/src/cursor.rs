//! Memoized region lookup.
//!
//! Rendering walks the alignment left to right, so consecutive lookups land in
//! the same hidden region or the one next to it. `PositionCursor` remembers
//! the last resolved region and the number of hidden indices before it; a
//! lookup first tries that region and its two neighbours (O(1)) and only falls
//! back to a binary search over the region list (O(log n)) on a miss.
//!
//! Invariants:
//! * A cursor is trusted only while its `generation` equals the generation of
//!   the store that produced it. Every mutation bumps the store generation, so
//!   a cursor taken before a hide/reveal is never consulted afterwards.
//! * `RegionPosition::index` is in `0..=regions.len()`; `regions.len()` means
//!   "after the last region".
//! * `RegionPosition::hidden_before` is the number of hidden indices in
//!   `regions[..index]`.
//! * `visible_starts` is strictly increasing, since regions are never
//!   adjacent.

use crate::region::HiddenRegion;
use tracing::trace;

/// Region index plus the hidden count before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionPosition {
    pub index: usize,
    pub hidden_before: i64,
}

/// The last resolved lookup, stamped with the store generation it is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionCursor {
    pub position: RegionPosition,
    pub generation: u64,
}

impl PositionCursor {
    pub fn new(position: RegionPosition, generation: u64) -> Self {
        Self {
            position,
            generation,
        }
    }

    /// The cached region index, if the cursor belongs to `generation`.
    pub fn hint(&self, generation: u64) -> Option<usize> {
        (self.generation == generation).then_some(self.position.index)
    }
}

/// Borrowed view of the region list with its prefix hidden counts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RegionTable<'a> {
    pub regions: &'a [HiddenRegion],
    /// `prefix[i]` = hidden indices in `regions[..i]`.
    pub prefix: &'a [i64],
    /// `visible_starts[i]` = visible position region `i` collapses onto.
    pub visible_starts: &'a [i64],
    pub size: i64,
}

impl<'a> RegionTable<'a> {
    pub fn new(
        regions: &'a [HiddenRegion],
        prefix: &'a [i64],
        visible_starts: &'a [i64],
        size: i64,
    ) -> Self {
        debug_assert_eq!(regions.len(), prefix.len());
        debug_assert_eq!(regions.len(), visible_starts.len());
        Self {
            regions,
            prefix,
            visible_starts,
            size,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn hidden_before(&self, index: usize) -> i64 {
        self.prefix.get(index).copied().unwrap_or(self.size)
    }

    pub fn position(&self, index: usize) -> RegionPosition {
        RegionPosition {
            index,
            hidden_before: self.hidden_before(index),
        }
    }

    /// Visible position at which region `index` is collapsed.
    pub fn visible_start(&self, index: usize) -> i64 {
        self.visible_starts[index]
    }

    /// First region that contains `absolute` or lies to its right.
    pub fn locate_absolute(&self, absolute: i64, hint: Option<usize>) -> RegionPosition {
        // index i answers iff every region before i ends left of `absolute`
        // and region i (if any) ends at or after it.
        let is_answer = |i: usize| {
            (i == 0 || self.regions[i - 1].end < absolute)
                && (i == self.len() || self.regions[i].end >= absolute)
        };
        if let Some(i) = self.try_hint(hint, is_answer) {
            return self.position(i);
        }
        let i = self.regions.partition_point(|r| r.end < absolute);
        trace!(target: "visibility.cursor", absolute, index = i, "absolute_lookup_miss");
        self.position(i)
    }

    /// First region whose collapsed visible position is after `visible`.
    pub fn locate_visible(&self, visible: i64, hint: Option<usize>) -> RegionPosition {
        let is_answer = |i: usize| {
            (i == 0 || self.visible_start(i - 1) <= visible)
                && (i == self.len() || self.visible_start(i) > visible)
        };
        if let Some(i) = self.try_hint(hint, is_answer) {
            return self.position(i);
        }
        let i = self.visible_starts.partition_point(|&v| v <= visible);
        trace!(target: "visibility.cursor", visible, index = i, "visible_lookup_miss");
        self.position(i)
    }

    fn try_hint(&self, hint: Option<usize>, is_answer: impl Fn(usize) -> bool) -> Option<usize> {
        let h = hint?.min(self.len());
        [Some(h), h.checked_add(1), h.checked_sub(1)]
            .into_iter()
            .flatten()
            .filter(|&i| i <= self.len())
            .find(|&i| is_answer(i))
    }
}
