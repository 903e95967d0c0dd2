//! Closed integer intervals used by the store and its iterators.

use std::fmt;

/// Largest index a store will hold. Mutations reaching past it are rejected
/// so region lengths and hidden counts always fit in an `i64`.
pub const MAX_INDEX: i64 = i32::MAX as i64;

/// A closed interval `[start, end]` of hidden absolute indices.
///
/// Regions handed out by a store always satisfy `0 <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HiddenRegion {
    pub start: i64,
    pub end: i64,
}

impl HiddenRegion {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Number of indices covered.
    pub const fn len(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    pub const fn contains(&self, index: i64) -> bool {
        self.start <= index && index <= self.end
    }

    /// True when `[start, end]` lies entirely inside this region.
    pub const fn covers(&self, start: i64, end: i64) -> bool {
        self.start <= start && end <= self.end
    }

    /// Absolute indices covered, ascending.
    pub fn indices(&self) -> std::ops::RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl fmt::Display for HiddenRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A maximal run `[start, end]` of consecutive visible indices, clipped to
/// the window it was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleBlock {
    pub start: i64,
    pub end: i64,
}

impl VisibleBlock {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }
}

impl fmt::Display for VisibleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
