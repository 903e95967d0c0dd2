//! Hidden-range store: mutation and bookkeeping.
//!
//! `HiddenRanges` owns the sorted list of hidden regions for one axis of one
//! view. All mutators funnel through `commit`, which rebuilds the prefix
//! hidden counts, bumps the generation (invalidating any cursor) and, in debug
//! builds, re-checks the invariants:
//! * regions sorted ascending by `start`;
//! * pairwise disjoint and never adjacent (`end_i + 1 < start_{i+1}`);
//! * `0 <= start <= end` for every region;
//! * `size` equals the sum of region lengths.
//!
//! Reads take `&self`; the cursor lives in a `Cell`, so a store is `Send`
//! but not `Sync`. Callers sharing one store across threads must wrap it in
//! their own lock.

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use bitvec::slice::BitSlice;
use tracing::debug;

use crate::axis::{Axis, Columns, Rows};
use crate::cursor::{PositionCursor, RegionPosition, RegionTable};
use crate::error::{VisibilityError, VisibilityResult, check_range};
use crate::region::{HiddenRegion, MAX_INDEX};

/// Receives each index that becomes visible through a reveal.
///
/// The selection model implements this so revealed columns end up selected.
pub trait RevealSink {
    fn revealed(&mut self, index: i64);

    /// Called once per revealed region. The default reports every index in
    /// ascending order; sinks with a bounded domain can clip first.
    fn revealed_region(&mut self, region: HiddenRegion) {
        for index in region.indices() {
            self.revealed(index);
        }
    }
}

impl RevealSink for Vec<i64> {
    fn revealed(&mut self, index: i64) {
        self.push(index);
    }
}

/// Discards revealed indices.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreRevealed;

impl RevealSink for IgnoreRevealed {
    fn revealed(&mut self, _index: i64) {}

    fn revealed_region(&mut self, _region: HiddenRegion) {}
}

pub struct HiddenRanges<A: Axis> {
    regions: Vec<HiddenRegion>,
    prefix: Vec<i64>,
    visible_starts: Vec<i64>,
    size: i64,
    generation: u64,
    cursor: Cell<PositionCursor>,
    _axis: PhantomData<A>,
}

pub type HiddenColumns = HiddenRanges<Columns>;
pub type HiddenRows = HiddenRanges<Rows>;

impl<A: Axis> Default for HiddenRanges<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Axis> HiddenRanges<A> {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            prefix: Vec::new(),
            visible_starts: Vec::new(),
            size: 0,
            // cursors default to generation 0, which never matches
            generation: 1,
            cursor: Cell::new(PositionCursor::default()),
            _axis: PhantomData,
        }
    }

    /// Build a store hiding each inclusive `(start, end)` range.
    pub fn from_ranges(
        ranges: impl IntoIterator<Item = (i64, i64)>,
    ) -> VisibilityResult<Self> {
        let mut store = Self::new();
        store.hide_list(ranges)?;
        Ok(store)
    }

    /// Total number of hidden indices.
    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn has_hidden(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn has_multiple_regions(&self) -> bool {
        self.regions.len() > 1
    }

    /// Monotonic counter bumped by every mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All hidden regions in ascending order.
    pub fn regions(&self) -> std::iter::Copied<std::slice::Iter<'_, HiddenRegion>> {
        self.regions.iter().copied()
    }

    pub fn as_slice(&self) -> &[HiddenRegion] {
        &self.regions
    }

    /// Render regions as `s<between>e<delimiter>s<between>e...`.
    pub fn format_regions(&self, delimiter: &str, between: &str) -> String {
        self.regions
            .iter()
            .map(|r| format!("{}{between}{}", r.start, r.end))
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    // ----- mutation -------------------------------------------------------

    /// Hide the inclusive range `[start, end]`, merging with every region it
    /// overlaps or touches.
    pub fn hide(&mut self, start: i64, end: i64) -> VisibilityResult<()> {
        check_range(start, end)?;
        if self.merge_in(start, end) {
            self.commit("hide");
        }
        debug!(
            target: "visibility.hide",
            axis = A::NAME,
            start,
            end,
            regions = self.regions.len(),
            size = self.size,
            "hide"
        );
        Ok(())
    }

    /// Hide each inclusive range. Every range is validated before any is
    /// applied, so a rejected batch changes nothing.
    pub fn hide_list(
        &mut self,
        ranges: impl IntoIterator<Item = (i64, i64)>,
    ) -> VisibilityResult<()> {
        let ranges: Vec<(i64, i64)> = ranges.into_iter().collect();
        for &(start, end) in &ranges {
            check_range(start, end)?;
        }
        let mut changed = false;
        for &(start, end) in &ranges {
            changed |= self.merge_in(start, end);
        }
        if changed {
            self.commit("hide_list");
        }
        debug!(
            target: "visibility.hide",
            axis = A::NAME,
            ranges = ranges.len(),
            regions = self.regions.len(),
            size = self.size,
            "hide_list"
        );
        Ok(())
    }

    /// Hide exactly the set bits, one region per maximal run. Bits past
    /// `MAX_INDEX` are ignored.
    pub fn hide_marked(&mut self, bits: &BitSlice) {
        let runs = marked_runs(bits, 0, bits.len());
        let mut changed = false;
        for &(start, end) in &runs {
            changed |= self.merge_in(start, end);
        }
        if changed {
            self.commit("hide_marked");
        }
        debug!(
            target: "visibility.hide",
            axis = A::NAME,
            runs = runs.len(),
            size = self.size,
            "hide_marked"
        );
    }

    /// Make visibility inside the half-open window `[start, end)` match
    /// `bits` exactly: hidden where set, visible where clear. Indices outside
    /// the window keep their state.
    pub fn clear_and_hide(
        &mut self,
        bits: &BitSlice,
        start: i64,
        end: i64,
    ) -> VisibilityResult<()> {
        check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        self.clear_within(start, end - 1);
        let lo = usize::try_from(start).unwrap_or(usize::MAX);
        let hi = usize::try_from(end).unwrap_or(usize::MAX);
        for (s, e) in marked_runs(bits, lo, hi) {
            self.merge_in(s, e);
        }
        self.commit("clear_and_hide");
        debug!(
            target: "visibility.hide",
            axis = A::NAME,
            start,
            end,
            regions = self.regions.len(),
            size = self.size,
            "clear_and_hide"
        );
        Ok(())
    }

    /// Reveal every hidden index whose bit is set.
    pub fn unhide_marked(&mut self, bits: &BitSlice) {
        let runs = marked_runs(bits, 0, bits.len());
        let before = self.size;
        for &(start, end) in &runs {
            self.clear_within(start, end);
        }
        self.commit("unhide_marked");
        debug!(
            target: "visibility.reveal",
            axis = A::NAME,
            revealed = before - self.size,
            "unhide_marked"
        );
    }

    /// Reveal the region starting exactly at `start`, reporting each of its
    /// indices to `sink`. Returns the removed region, or `None` (and reports
    /// nothing) when no region starts there.
    pub fn reveal(&mut self, start: i64, sink: &mut impl RevealSink) -> Option<HiddenRegion> {
        let Ok(index) = self.regions.binary_search_by_key(&start, |r| r.start) else {
            debug!(target: "visibility.reveal", axis = A::NAME, start, "reveal_no_region");
            return None;
        };
        let region = self.regions.remove(index);
        sink.revealed_region(region);
        self.commit("reveal");
        debug!(
            target: "visibility.reveal",
            axis = A::NAME,
            start = region.start,
            end = region.end,
            size = self.size,
            "reveal"
        );
        Some(region)
    }

    /// Reveal everything, reporting indices region by region in ascending
    /// order. Returns the number of indices revealed.
    pub fn reveal_all(&mut self, sink: &mut impl RevealSink) -> i64 {
        let revealed = self.size;
        for region in self.regions.drain(..) {
            sink.revealed_region(region);
        }
        self.commit("reveal_all");
        debug!(target: "visibility.reveal", axis = A::NAME, revealed, "reveal_all");
        revealed
    }

    /// Independent copy of the regions intersecting the half-open window
    /// `[start, end)`, clipped to it and shifted left by `offset`. Fails when
    /// a shifted region would leave `0..=MAX_INDEX`.
    pub fn restricted(&self, start: i64, end: i64, offset: i64) -> VisibilityResult<Self> {
        check_range(start, end)?;
        let mut out = Self::new();
        if start == end {
            return Ok(out);
        }
        for region in self.bounded_regions(start, end - 1) {
            let s = shift(region.start.max(start), offset)?;
            let e = shift(region.end.min(end - 1), offset)?;
            out.regions.push(HiddenRegion::new(s, e));
        }
        out.commit("restricted");
        Ok(out)
    }

    // ----- internals ------------------------------------------------------

    /// Union `[start, end]` into the region list without committing. Returns
    /// false when the range was already fully hidden.
    fn merge_in(&mut self, start: i64, end: i64) -> bool {
        // regions ending at or after start-1 may touch the new range on the left,
        // regions starting at or before end+1 may touch it on the right
        let first = self.regions.partition_point(|r| r.end < start.saturating_sub(1));
        let last = self.regions.partition_point(|r| r.start <= end.saturating_add(1));
        if first >= last {
            self.regions.insert(first, HiddenRegion::new(start, end));
            return true;
        }
        if last - first == 1 && self.regions[first].covers(start, end) {
            return false;
        }
        let merged = HiddenRegion::new(
            start.min(self.regions[first].start),
            end.max(self.regions[last - 1].end),
        );
        self.regions.splice(first..last, std::iter::once(merged));
        true
    }

    /// Make the inclusive range `[start, end]` visible without committing,
    /// trimming or splitting regions that straddle its edges.
    fn clear_within(&mut self, start: i64, end: i64) {
        let first = self.regions.partition_point(|r| r.end < start);
        let last = self.regions.partition_point(|r| r.start <= end);
        if first >= last {
            return;
        }
        let mut keep = Vec::with_capacity(2);
        let head = self.regions[first];
        if head.start < start {
            keep.push(HiddenRegion::new(head.start, start - 1));
        }
        let tail = self.regions[last - 1];
        if tail.end > end {
            keep.push(HiddenRegion::new(end + 1, tail.end));
        }
        self.regions.splice(first..last, keep);
    }

    fn commit(&mut self, op: &'static str) {
        self.prefix.clear();
        self.visible_starts.clear();
        let mut acc = 0;
        for r in &self.regions {
            self.prefix.push(acc);
            self.visible_starts.push(r.start - acc);
            acc += r.len();
        }
        self.size = acc;
        self.generation += 1;
        self.cursor.set(PositionCursor::default());
        debug_assert!(
            self.invariants_hold(),
            "hidden range invariants broken after {op}: {self:?}"
        );
    }

    fn invariants_hold(&self) -> bool {
        let sound = self.regions.iter().all(|r| 0 <= r.start && r.start <= r.end);
        let spaced = self.regions.windows(2).all(|w| w[0].end + 1 < w[1].start);
        let sound = sound && self.regions.last().is_none_or(|r| r.end <= MAX_INDEX);
        let counted = self.size == self.regions.iter().map(HiddenRegion::len).sum::<i64>();
        sound
            && spaced
            && counted
            && self.prefix.len() == self.regions.len()
            && self.visible_starts.len() == self.regions.len()
    }

    pub(crate) fn table(&self) -> RegionTable<'_> {
        RegionTable::new(&self.regions, &self.prefix, &self.visible_starts, self.size)
    }

    fn hint(&self) -> Option<usize> {
        self.cursor.get().hint(self.generation)
    }

    fn remember(&self, position: RegionPosition) -> RegionPosition {
        self.cursor.set(PositionCursor::new(position, self.generation));
        position
    }

    /// First region containing `absolute` or to its right, via the cursor.
    pub(crate) fn locate_absolute(&self, absolute: i64) -> RegionPosition {
        let position = self.table().locate_absolute(absolute, self.hint());
        self.remember(position)
    }

    /// First region collapsed after visible position `visible`, via the cursor.
    pub(crate) fn locate_visible(&self, visible: i64) -> RegionPosition {
        let position = self.table().locate_visible(visible, self.hint());
        self.remember(position)
    }

    /// Current cursor, for inspection in tests and diagnostics.
    pub fn cursor(&self) -> PositionCursor {
        self.cursor.get()
    }
}

/// `index - offset`, rejected when it leaves `0..=MAX_INDEX`. `index` is
/// never negative, so only a negative `offset` can overflow.
fn shift(index: i64, offset: i64) -> VisibilityResult<i64> {
    match index.checked_sub(offset) {
        Some(shifted) if shifted < 0 => Err(VisibilityError::NegativeIndex(shifted)),
        Some(shifted) if shifted <= MAX_INDEX => Ok(shifted),
        Some(shifted) => Err(VisibilityError::IndexTooLarge(shifted)),
        None => Err(VisibilityError::IndexTooLarge(i64::MAX)),
    }
}

/// Maximal runs of set bits inside `bits[start..end]`, as inclusive ranges.
/// Runs never extend past `MAX_INDEX`.
fn marked_runs(bits: &BitSlice, start: usize, end: usize) -> Vec<(i64, i64)> {
    let limit = usize::try_from(MAX_INDEX).map_or(usize::MAX, |max| max + 1);
    let end = end.min(bits.len()).min(limit);
    if start >= end {
        return Vec::new();
    }
    let mut runs: Vec<(i64, i64)> = Vec::new();
    for one in bits[start..end].iter_ones() {
        let index = (start + one) as i64;
        match runs.last_mut() {
            Some((_, last)) if *last + 1 == index => *last = index,
            _ => runs.push((index, index)),
        }
    }
    runs
}

impl<A: Axis> Clone for HiddenRanges<A> {
    fn clone(&self) -> Self {
        Self {
            regions: self.regions.clone(),
            prefix: self.prefix.clone(),
            visible_starts: self.visible_starts.clone(),
            size: self.size,
            generation: self.generation,
            cursor: Cell::new(self.cursor.get()),
            _axis: PhantomData,
        }
    }
}

impl<A: Axis> fmt::Debug for HiddenRanges<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HiddenRanges")
            .field("axis", &A::NAME)
            .field("regions", &self.regions)
            .field("size", &self.size)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<A: Axis> PartialEq for HiddenRanges<A> {
    fn eq(&self, other: &Self) -> bool {
        self.regions == other.regions
    }
}

impl<A: Axis> Eq for HiddenRanges<A> {}

impl<A: Axis> Hash for HiddenRanges<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.regions.hash(state);
    }
}
