//! Index axes.
//!
//! The same interval engine hides alignment columns and alignment rows
//! (sequences). The axis is a zero-sized marker carried as a type parameter so
//! a column store can never be handed to code expecting a row store; it only
//! contributes a name for log output.

use std::fmt::Debug;
use std::hash::Hash;

pub trait Axis: Copy + Default + Debug + Eq + Hash + 'static {
    /// Short name used as a structured log field.
    const NAME: &'static str;
}

/// Alignment columns (residue positions).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Columns;

impl Axis for Columns {
    const NAME: &'static str = "columns";
}

/// Alignment rows (sequences).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rows;

impl Axis for Rows {
    const NAME: &'static str = "rows";
}
