//! Iteration over one axis of a store.
//!
//! Every flavour except region starts is an adapter over `SegmentWalk`, which
//! cuts a half-open window into alternating visible runs and hidden regions.
//! All iterators borrow the store, so it cannot change under them; they are
//! single pass and fused.

use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use crate::axis::Axis;
use crate::cursor::RegionTable;
use crate::region::{HiddenRegion, VisibleBlock};
use crate::store::HiddenRanges;

/// Coordinate frame of the window passed to [`HiddenRanges::visible_blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    /// Window bounds are absolute indices.
    #[default]
    Absolute,
    /// Window bounds are visible positions; they are mapped to absolute
    /// indices before walking, so the window covers exactly `end - start`
    /// visible indices. Yielded blocks are still absolute.
    Visible,
}

/// One index of an [`AllIndices`] walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexState {
    pub index: i64,
    pub visible: bool,
}

/// A piece of the walked window, clipped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    Visible {
        start: i64,
        end: i64,
        /// `end + 1` is the start of a hidden region.
        abuts_hidden: bool,
    },
    Hidden {
        region: HiddenRegion,
        start: i64,
        end: i64,
    },
}

impl Segment {
    fn span(&self) -> RangeInclusive<i64> {
        match *self {
            Segment::Visible { start, end, .. } | Segment::Hidden { start, end, .. } => start..=end,
        }
    }

    fn is_visible(&self) -> bool {
        matches!(self, Segment::Visible { .. })
    }
}

/// Walks `[start, end)` region by region.
#[derive(Debug, Clone)]
pub(crate) struct SegmentWalk<'a> {
    regions: &'a [HiddenRegion],
    index: usize,
    next: i64,
    end: i64,
}

impl<'a> SegmentWalk<'a> {
    pub(crate) fn new<A: Axis>(store: &'a HiddenRanges<A>, start: i64, end: i64) -> Self {
        let index = if start < end && store.has_hidden() {
            store.locate_absolute(start).index
        } else {
            0
        };
        Self {
            regions: store.as_slice(),
            index,
            next: start,
            end,
        }
    }
}

impl Iterator for SegmentWalk<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.next >= self.end {
            return None;
        }
        let start = self.next;
        let last = self.end - 1;
        let segment = match self.regions.get(self.index) {
            Some(&region) if region.start <= start => {
                self.index += 1;
                self.next = region.end + 1;
                Segment::Hidden {
                    region,
                    start,
                    end: region.end.min(last),
                }
            }
            Some(region) => {
                let end = (region.start - 1).min(last);
                self.next = end + 1;
                Segment::Visible {
                    start,
                    end,
                    abuts_hidden: end + 1 == region.start,
                }
            }
            None => {
                self.next = self.end;
                Segment::Visible {
                    start,
                    end: last,
                    abuts_hidden: false,
                }
            }
        };
        Some(segment)
    }
}

impl FusedIterator for SegmentWalk<'_> {}

/// Every index of a window, hidden or not.
#[derive(Debug, Clone)]
pub struct AllIndices<'a> {
    walk: SegmentWalk<'a>,
    run: Option<(RangeInclusive<i64>, bool)>,
}

impl Iterator for AllIndices<'_> {
    type Item = IndexState;

    fn next(&mut self) -> Option<IndexState> {
        loop {
            if let Some((run, visible)) = &mut self.run
                && let Some(index) = run.next()
            {
                return Some(IndexState {
                    index,
                    visible: *visible,
                });
            }
            let segment = self.walk.next()?;
            self.run = Some((segment.span(), segment.is_visible()));
        }
    }
}

impl FusedIterator for AllIndices<'_> {}

/// Visible indices of a window, ascending.
#[derive(Debug, Clone)]
pub struct VisibleIndices<'a> {
    walk: SegmentWalk<'a>,
    run: Option<RangeInclusive<i64>>,
}

impl Iterator for VisibleIndices<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            if let Some(index) = self.run.as_mut().and_then(Iterator::next) {
                return Some(index);
            }
            if let Segment::Visible { start, end, .. } = self.walk.next()? {
                self.run = Some(start..=end);
            }
        }
    }
}

impl FusedIterator for VisibleIndices<'_> {}

/// Maximal visible runs of a window.
#[derive(Debug, Clone)]
pub struct VisibleBlocks<'a> {
    walk: SegmentWalk<'a>,
    ends_at_hidden: bool,
}

impl VisibleBlocks<'_> {
    /// Whether the block last yielded ends immediately before a hidden
    /// region. False before the first block.
    pub fn ends_at_hidden(&self) -> bool {
        self.ends_at_hidden
    }
}

impl Iterator for VisibleBlocks<'_> {
    type Item = VisibleBlock;

    fn next(&mut self) -> Option<VisibleBlock> {
        loop {
            if let Segment::Visible {
                start,
                end,
                abuts_hidden,
            } = self.walk.next()?
            {
                self.ends_at_hidden = abuts_hidden;
                return Some(VisibleBlock::new(start, end));
            }
        }
    }
}

impl FusedIterator for VisibleBlocks<'_> {}

/// Whole hidden regions overlapping an inclusive window.
#[derive(Debug, Clone)]
pub struct BoundedRegions<'a> {
    walk: SegmentWalk<'a>,
}

impl Iterator for BoundedRegions<'_> {
    type Item = HiddenRegion;

    fn next(&mut self) -> Option<HiddenRegion> {
        loop {
            if let Segment::Hidden { region, .. } = self.walk.next()? {
                return Some(region);
            }
        }
    }
}

impl FusedIterator for BoundedRegions<'_> {}

/// Visible positions at which regions collapse, inside an inclusive visible
/// window.
#[derive(Debug, Clone)]
pub struct RegionStarts<'a> {
    table: RegionTable<'a>,
    index: usize,
    end: i64,
}

impl Iterator for RegionStarts<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.index >= self.table.len() {
            return None;
        }
        let start = self.table.visible_start(self.index);
        if start > self.end {
            self.index = self.table.len();
            return None;
        }
        self.index += 1;
        Some(start)
    }
}

impl FusedIterator for RegionStarts<'_> {}

impl<A: Axis> HiddenRanges<A> {
    /// Every absolute index in `[start, end)` with its visibility.
    pub fn all_indices(&self, start: i64, end: i64) -> AllIndices<'_> {
        AllIndices {
            walk: SegmentWalk::new(self, start, end),
            run: None,
        }
    }

    /// Visible absolute indices in `[start, end)`.
    pub fn visible_indices(&self, start: i64, end: i64) -> VisibleIndices<'_> {
        VisibleIndices {
            walk: SegmentWalk::new(self, start, end),
            run: None,
        }
    }

    /// Maximal visible runs intersecting `[start, end)`, in absolute
    /// coordinates. With [`Frame::Visible`] the bounds are visible positions.
    pub fn visible_blocks(&self, start: i64, end: i64, frame: Frame) -> VisibleBlocks<'_> {
        let (start, end) = match frame {
            Frame::Absolute => (start, end),
            Frame::Visible => (self.visible_to_absolute(start), self.visible_to_absolute(end)),
        };
        VisibleBlocks {
            walk: SegmentWalk::new(self, start, end),
            ends_at_hidden: false,
        }
    }

    /// Regions overlapping the inclusive window `[start, end]`, unclipped.
    pub fn bounded_regions(&self, start: i64, end: i64) -> BoundedRegions<'_> {
        BoundedRegions {
            walk: SegmentWalk::new(self, start, end.saturating_add(1)),
        }
    }

    /// Visible positions of region starts inside the inclusive visible window
    /// `[start, end]`.
    pub fn region_starts(&self, start: i64, end: i64) -> RegionStarts<'_> {
        let index = if self.has_hidden() && start <= end {
            self.locate_visible(start.saturating_sub(1)).index
        } else {
            self.region_count()
        };
        RegionStarts {
            table: self.table(),
            index,
            end,
        }
    }
}
