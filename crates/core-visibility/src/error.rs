use thiserror::Error;

use crate::region::MAX_INDEX;

/// Rejections at the mutation boundary. A rejected call leaves the store
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VisibilityError {
    #[error("invalid range [{start}, {end}]: start is after end")]
    InvalidRange { start: i64, end: i64 },
    #[error("negative index {0}")]
    NegativeIndex(i64),
    #[error("index {0} is past the largest supported index {max}", max = MAX_INDEX)]
    IndexTooLarge(i64),
}

pub type VisibilityResult<T> = Result<T, VisibilityError>;

/// Validate an inclusive `[start, end]` range supplied by a caller.
pub(crate) fn check_range(start: i64, end: i64) -> VisibilityResult<()> {
    if start < 0 {
        return Err(VisibilityError::NegativeIndex(start));
    }
    if start > end {
        return Err(VisibilityError::InvalidRange { start, end });
    }
    if end > MAX_INDEX {
        return Err(VisibilityError::IndexTooLarge(end));
    }
    Ok(())
}
