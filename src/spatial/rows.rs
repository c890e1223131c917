//! Fixed-width row words used to store grid occupancy
//!
//! Every grid row is a single unsigned integer. Column `c` of a row of width
//! `w` lives in bit `w - 1 - c`, so the leftmost cell is the most significant
//! bit of the row's declared width.

use num_traits::PrimInt;
use std::fmt::Debug;

/// Unsigned integer usable as one grid row
///
/// Implemented for `u64` and `u128`. Orientation rows are always stored as
/// `u64` masks and widened with [`RowBits::from_mask`] at placement time.
pub trait RowBits: PrimInt + Debug + Send + Sync + 'static {
    /// Number of columns a single row can hold
    const BITS: usize;

    /// Widen an orientation row mask into this row type
    fn from_mask(mask: u64) -> Self;

    /// Number of occupied cells in the row
    fn occupied(self) -> usize {
        self.count_ones() as usize
    }
}

impl RowBits for u64 {
    const BITS: usize = 64;

    fn from_mask(mask: u64) -> Self {
        mask
    }
}

impl RowBits for u128 {
    const BITS: usize = 128;

    fn from_mask(mask: u64) -> Self {
        Self::from(mask)
    }
}
