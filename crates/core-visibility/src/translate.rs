//! Absolute <-> visible coordinate translation.
//!
//! Arithmetic is permissive: inputs outside the addressable range are
//! translated as if the axis extended forever in both directions, and results
//! may be negative or past the width. Clamping is the caller's job. Results
//! that would leave the `i64` range saturate instead.

use crate::axis::Axis;
use crate::region::HiddenRegion;
use crate::store::HiddenRanges;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl<A: Axis> HiddenRanges<A> {
    /// True unless `index` falls inside a hidden region. Negative indices are
    /// visible.
    pub fn is_visible(&self, index: i64) -> bool {
        if !self.has_hidden() {
            return true;
        }
        let pos = self.locate_absolute(index);
        self.as_slice()
            .get(pos.index)
            .is_none_or(|r| index < r.start)
    }

    /// `absolute` minus the number of hidden indices strictly before it.
    ///
    /// A hidden index collapses onto the visible position of the next visible
    /// index at or after it, so the mapping is non-decreasing.
    pub fn absolute_to_visible(&self, absolute: i64) -> i64 {
        if !self.has_hidden() {
            return absolute;
        }
        let pos = self.locate_absolute(absolute);
        let inside = match self.as_slice().get(pos.index) {
            Some(r) if r.start <= absolute => absolute - r.start,
            _ => 0,
        };
        absolute.saturating_sub(pos.hidden_before).saturating_sub(inside)
    }

    /// The first absolute index whose visible position is `visible`.
    pub fn visible_to_absolute(&self, visible: i64) -> i64 {
        if !self.has_hidden() {
            return visible;
        }
        visible.saturating_add(self.locate_visible(visible).hidden_before)
    }

    /// Move `distance` visible steps from `from` (negative = left). Hidden
    /// regions cost nothing regardless of width. May overshoot the axis.
    pub fn offset_by_visible(&self, distance: i64, from: i64) -> i64 {
        let start = self.absolute_to_visible(from);
        self.visible_to_absolute(start.saturating_add(distance))
    }

    /// First and last visible absolute indices of an axis `width` long.
    pub fn visible_start_and_end(&self, width: i64) -> (i64, i64) {
        let first = self.visible_to_absolute(0);
        let mut last = width.saturating_sub(1);
        if self.has_hidden() {
            let pos = self.locate_absolute(last);
            if let Some(r) = self.as_slice().get(pos.index)
                && r.start <= last
            {
                last = r.start - 1;
            }
        }
        (first, last)
    }

    /// Nearest hidden-region boundary from `index`.
    ///
    /// `Left` gives the end of the closest region lying entirely before the
    /// region containing (or following) `index`; `Right` gives the start of
    /// the next region beginning after `index`. Returns `index` when there is
    /// no such region.
    pub fn next_hidden_boundary(&self, direction: Direction, index: i64) -> i64 {
        if !self.has_hidden() {
            return index;
        }
        let pos = self.locate_absolute(index);
        let regions = self.as_slice();
        match direction {
            Direction::Left if pos.index > 0 => regions[pos.index - 1].end,
            Direction::Left => index,
            Direction::Right => match regions.get(pos.index) {
                Some(r) if index < r.start => r.start,
                Some(_) => regions.get(pos.index + 1).map_or(index, |next| next.start),
                None => index,
            },
        }
    }

    /// The region ending immediately left of, or starting immediately right
    /// of, the index shown at visible position `visible`. The left region wins
    /// when both exist.
    pub fn region_with_edge_at(&self, visible: i64) -> Option<HiddenRegion> {
        if !self.has_hidden() {
            return None;
        }
        let absolute = self.visible_to_absolute(visible);
        let before = absolute.checked_sub(1)?;
        let pos = self.locate_absolute(before);
        let region = *self.as_slice().get(pos.index)?;
        (region.end == before || Some(region.start) == absolute.checked_add(1)).then_some(region)
    }
}
