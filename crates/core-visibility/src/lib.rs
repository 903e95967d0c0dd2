//! Hidden-range visibility engine.
//!
//! Tracks which indices of an axis (alignment columns, or rows) are hidden and
//! maps between absolute indices (positions in the full data) and visible
//! positions (positions as rendered). Hidden indices are stored as sorted,
//! disjoint, non-adjacent closed intervals; lookups are memoized through a
//! position cursor so left-to-right rendering resolves each index in O(1).

pub mod axis;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod region;
pub mod store;
pub mod translate;

pub use axis::{Axis, Columns, Rows};
pub use cursor::{PositionCursor, RegionPosition};
pub use error::{VisibilityError, VisibilityResult};
pub use iter::{
    AllIndices, BoundedRegions, Frame, IndexState, RegionStarts, VisibleBlocks, VisibleIndices,
};
pub use region::{HiddenRegion, MAX_INDEX, VisibleBlock};
pub use store::{HiddenColumns, HiddenRanges, HiddenRows, IgnoreRevealed, RevealSink};
pub use translate::Direction;
