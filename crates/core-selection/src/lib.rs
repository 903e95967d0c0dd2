//! Column selection.
//!
//! An ordered, duplicate-free set of selected absolute columns. Insertion
//! order is kept for callers that replay the selection; membership is a bit
//! per column. The selection is the usual recipient of columns revealed by a
//! `HiddenColumns` store, through its `RevealSink` impl.
//!
//! Selectable columns are `0..limit`. Columns outside that domain are refused
//! with a warning, which keeps the membership bits bounded however far a
//! caller reaches.

use bitvec::vec::BitVec;
use core_visibility::{HiddenColumns, HiddenRegion, MAX_INDEX, RevealSink, VisibilityResult};
use tracing::{debug, warn};

/// Column domain of [`ColumnSelection::new`].
pub const DEFAULT_LIMIT: i64 = 1 << 24;

#[derive(Debug, Clone)]
pub struct ColumnSelection {
    order: Vec<i64>,
    members: BitVec,
    limit: i64,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection accepting columns `0..limit`, usually the alignment width.
    /// `limit` is clamped to `0..=MAX_INDEX + 1`.
    pub fn with_limit(limit: i64) -> Self {
        Self {
            order: Vec::new(),
            members: BitVec::new(),
            limit: limit.clamp(0, MAX_INDEX + 1),
        }
    }

    /// Exclusive upper bound of selectable columns.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Select `col`. Returns false if it was already selected or lies outside
    /// `0..limit`.
    pub fn add(&mut self, col: i64) -> bool {
        let Ok(bit) = usize::try_from(col) else {
            warn!(target: "selection", col, "ignoring negative column");
            return false;
        };
        if col >= self.limit {
            warn!(target: "selection", col, limit = self.limit, "ignoring column past limit");
            return false;
        }
        if bit >= self.members.len() {
            self.members.resize(bit + 1, false);
        } else if self.members[bit] {
            return false;
        }
        self.members.set(bit, true);
        self.order.push(col);
        true
    }

    /// Deselect `col`. Returns whether it was selected.
    pub fn remove(&mut self, col: i64) -> bool {
        if !self.contains(col) {
            return false;
        }
        self.members.set(col as usize, false);
        self.order.retain(|&c| c != col);
        true
    }

    /// Deselect every column in `[start, end)`.
    pub fn remove_range(&mut self, start: i64, end: i64) {
        let before = self.order.len();
        self.order.retain(|&c| !(start..end).contains(&c));
        for c in start.max(0)..end.min(self.members.len() as i64) {
            self.members.set(c as usize, false);
        }
        debug!(
            target: "selection",
            start,
            end,
            removed = before - self.order.len(),
            "remove_range"
        );
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn contains(&self, col: i64) -> bool {
        usize::try_from(col)
            .ok()
            .and_then(|bit| self.members.get(bit).map(|b| *b))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Selected columns in the order they were added.
    pub fn selected(&self) -> &[i64] {
        &self.order
    }

    /// Maximal runs of selected columns, ascending.
    pub fn selected_ranges(&self) -> Vec<(i64, i64)> {
        let mut runs: Vec<(i64, i64)> = Vec::new();
        for one in self.members.iter_ones() {
            let col = one as i64;
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == col => *end = col,
                _ => runs.push((col, col)),
            }
        }
        runs
    }

    pub fn min(&self) -> Option<i64> {
        self.members.first_one().map(|i| i as i64)
    }

    pub fn max(&self) -> Option<i64> {
        self.members.last_one().map(|i| i as i64)
    }

    /// Deselect `col` and the selected run around it, then hide that run (or
    /// just `col` when no neighbour is selected).
    pub fn hide_selected_columns(
        &mut self,
        col: i64,
        hidden: &mut HiddenColumns,
    ) -> VisibilityResult<()> {
        self.remove(col);
        let mut min = col;
        while min > 0 && self.remove(min - 1) {
            min -= 1;
        }
        let mut max = col;
        while max < self.limit && self.remove(max + 1) {
            max += 1;
        }
        debug!(target: "selection", col, start = min, end = max, "hide_selected_columns");
        hidden.hide(min, max)
    }

    /// Hide every selected run and clear the selection.
    pub fn hide_all_selected(&mut self, hidden: &mut HiddenColumns) -> VisibilityResult<()> {
        let runs = self.selected_ranges();
        hidden.hide_list(runs.iter().copied())?;
        debug!(target: "selection", runs = runs.len(), "hide_all_selected");
        self.clear();
        Ok(())
    }

    /// Toggle selection over `[first, width)`, clipped to `0..limit`. Hidden
    /// columns are never selected by the inversion.
    pub fn invert(&mut self, first: i64, width: i64, hidden: &HiddenColumns) {
        for col in first.max(0)..width.min(self.limit) {
            if !self.remove(col) && hidden.is_visible(col) {
                self.add(col);
            }
        }
    }

    /// Replace this selection with the visible columns of `other`, keeping
    /// `other`'s order.
    pub fn set_from(&mut self, other: &ColumnSelection, hidden: &HiddenColumns) {
        self.clear();
        for &col in other.selected() {
            if hidden.is_visible(col) {
                self.add(col);
            }
        }
    }
}

impl RevealSink for ColumnSelection {
    fn revealed(&mut self, index: i64) {
        self.add(index);
    }

    fn revealed_region(&mut self, region: HiddenRegion) {
        let end = region.end.min(self.limit - 1);
        if end < region.end {
            warn!(
                target: "selection",
                start = region.start,
                end = region.end,
                limit = self.limit,
                "revealed columns past limit not selected"
            );
        }
        for col in region.start..=end {
            self.add(col);
        }
    }
}

/// Two selections are equal when they select the same columns, whatever the
/// order.
impl PartialEq for ColumnSelection {
    fn eq(&self, other: &Self) -> bool {
        self.members.iter_ones().eq(other.members.iter_ones())
    }
}

impl Eq for ColumnSelection {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with(cols: &[i64]) -> ColumnSelection {
        let mut s = ColumnSelection::new();
        for &c in cols {
            s.add(c);
        }
        s
    }

    #[test]
    fn add_keeps_order_and_drops_duplicates() {
        let mut s = ColumnSelection::new();
        assert!(s.add(9));
        assert!(s.add(2));
        assert!(!s.add(9));
        assert!(!s.add(-1));
        assert_eq!(s.selected(), &[9, 2]);
        assert_eq!(s.len(), 2);
        assert!(s.contains(2));
        assert!(!s.contains(-1));
        assert!(!s.contains(500));
    }

    #[test]
    fn columns_past_the_limit_are_refused() {
        let mut s = ColumnSelection::with_limit(10);
        assert!(s.add(9));
        assert!(!s.add(10));
        assert!(!s.add(1 << 40));
        assert!(!s.add(i64::MAX));
        assert_eq!(s.selected(), &[9]);
        assert!(!s.contains(1 << 40));

        let s = ColumnSelection::new();
        assert_eq!(s.limit(), DEFAULT_LIMIT);
        assert_eq!(ColumnSelection::with_limit(i64::MAX).limit(), MAX_INDEX + 1);
        assert_eq!(ColumnSelection::with_limit(-4).limit(), 0);
    }

    #[test]
    fn reveal_of_a_wide_region_selects_only_up_to_the_limit() {
        let mut hidden = HiddenColumns::from_ranges([(3, MAX_INDEX)]).unwrap();
        let mut s = ColumnSelection::with_limit(6);
        hidden.reveal_all(&mut s);
        assert_eq!(s.selected(), &[3, 4, 5]);
        assert!(!hidden.has_hidden());
    }

    #[test]
    fn hide_selected_at_the_ends_of_i64() {
        let mut hidden = HiddenColumns::new();
        let mut s = with(&[0, 1]);
        s.hide_selected_columns(0, &mut hidden).unwrap();
        assert_eq!(hidden.format_regions(",", "-"), "0-1");
        assert!(s.hide_selected_columns(i64::MIN, &mut hidden).is_err());
        assert!(s.hide_selected_columns(i64::MAX, &mut hidden).is_err());
        assert_eq!(hidden.size(), 2);
    }

    #[test]
    fn invert_clips_to_the_domain() {
        let mut s = ColumnSelection::with_limit(4);
        s.invert(i64::MIN, i64::MAX, &HiddenColumns::new());
        assert_eq!(s.selected(), &[0, 1, 2, 3]);
    }

    #[test]
    fn remove_and_remove_range() {
        let mut s = with(&[1, 2, 3, 7, 8, 12]);
        assert!(s.remove(7));
        assert!(!s.remove(7));
        s.remove_range(2, 8);
        assert_eq!(s.selected(), &[1, 12]);
        s.remove_range(-5, 100);
        assert!(s.is_empty());
    }

    #[test]
    fn ranges_min_and_max() {
        let s = with(&[8, 3, 4, 5, 10, 9]);
        assert_eq!(s.selected_ranges(), vec![(3, 5), (8, 10)]);
        assert_eq!(s.min(), Some(3));
        assert_eq!(s.max(), Some(10));
        let empty = ColumnSelection::new();
        assert_eq!(empty.min(), None);
        assert_eq!(empty.max(), None);
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(with(&[1, 5, 3]), with(&[3, 1, 5]));
        let mut grown = with(&[1, 40]);
        grown.remove(40);
        assert_eq!(grown, with(&[1]));
        assert_ne!(with(&[1]), with(&[2]));
    }

    #[test]
    fn hide_selected_takes_adjacent_run() {
        let mut s = with(&[4, 5, 6, 7, 10]);
        let mut hidden = HiddenColumns::new();
        s.hide_selected_columns(5, &mut hidden).unwrap();
        let regions: Vec<_> = hidden.regions().map(|r| (r.start, r.end)).collect();
        assert_eq!(regions, vec![(4, 7)]);
        assert_eq!(s.selected(), &[10]);

        // an unselected column is hidden on its own
        s.hide_selected_columns(20, &mut hidden).unwrap();
        assert_eq!(hidden.size(), 5);
        assert_eq!(s.selected(), &[10]);
    }

    #[test]
    fn hide_all_selected_clears() {
        let mut s = with(&[2, 3, 9]);
        let mut hidden = HiddenColumns::new();
        s.hide_all_selected(&mut hidden).unwrap();
        assert_eq!(hidden.format_regions(",", "-"), "2-3,9-9");
        assert!(s.is_empty());
    }

    #[test]
    fn invert_skips_hidden() {
        let mut s = with(&[0, 2]);
        let hidden = HiddenColumns::from_ranges([(4, 5)]).unwrap();
        s.invert(0, 8, &hidden);
        assert_eq!(s.selected(), &[1, 3, 6, 7]);
    }

    #[test]
    fn set_from_keeps_visible_only() {
        let other = with(&[6, 1, 4, 2]);
        let hidden = HiddenColumns::from_ranges([(2, 4)]).unwrap();
        let mut s = with(&[11]);
        s.set_from(&other, &hidden);
        assert_eq!(s.selected(), &[6, 1]);
    }
}
