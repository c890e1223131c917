//! Packing grid stored as one bitmask per row
//!
//! The grid is the only mutable state of a search. Placing and removing an
//! orientation touch exactly `orientation.height()` rows, and [`Grid::remove`]
//! is the exact inverse of [`Grid::place`] for any placement accepted by
//! [`Grid::fits`].

use std::fmt;

use crate::algorithm::canonical::Orientation;
use crate::io::configuration::{EMPTY_CELL, OCCUPIED_CELL};
use crate::io::error::{PackingError, Result};
use crate::spatial::rows::RowBits;

/// Rectangular occupancy grid with `height` rows of `width` bits each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<R: RowBits> {
    rows: Vec<R>,
    width: usize,
    height: usize,
}

impl<R: RowBits> Grid<R> {
    /// Create an empty grid
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `width` exceeds the row type's bit count
    /// - The cell count `width * height` overflows `usize`
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width > R::BITS {
            return Err(PackingError::GridTooWide {
                width,
                max: R::BITS,
            });
        }
        if width.checked_mul(height).is_none() {
            return Err(PackingError::GridTooLarge { width, height });
        }

        Ok(Self {
            rows: vec![R::zero(); height],
            width,
            height,
        })
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Raw row masks, top row first
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.rows.iter().map(|row| row.occupied()).sum()
    }

    /// Number of free cells
    pub fn free(&self) -> usize {
        self.area() - self.occupied()
    }

    /// Test a single cell; cells outside the grid read as unoccupied
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        if col >= self.width {
            return false;
        }
        self.rows
            .get(row)
            .is_some_and(|&bits| (bits >> (self.width - 1 - col)) & R::one() == R::one())
    }

    /// Left shift that moves an orientation's rows to start at `col`
    ///
    /// Returns `None` when the orientation would stick out past either edge.
    const fn shift_for(&self, orientation: &Orientation, row: usize, col: usize) -> Option<usize> {
        if col + orientation.width() > self.width || row + orientation.height() > self.height {
            None
        } else {
            Some(self.width - col - orientation.width())
        }
    }

    /// Whether `orientation` can be placed with its top-left corner at (`row`, `col`)
    ///
    /// Out-of-bounds positions never fit.
    pub fn fits(&self, orientation: &Orientation, row: usize, col: usize) -> bool {
        let Some(shift) = self.shift_for(orientation, row, col) else {
            return false;
        };

        orientation.rows().iter().enumerate().all(|(offset, &mask)| {
            self.rows
                .get(row + offset)
                .is_some_and(|&bits| bits & (R::from_mask(mask) << shift) == R::zero())
        })
    }

    /// Set the cells covered by `orientation` at (`row`, `col`)
    ///
    /// Callers check [`Grid::fits`] first; positions outside the grid are ignored.
    pub fn place(&mut self, orientation: &Orientation, row: usize, col: usize) {
        let Some(shift) = self.shift_for(orientation, row, col) else {
            return;
        };

        for (offset, &mask) in orientation.rows().iter().enumerate() {
            if let Some(bits) = self.rows.get_mut(row + offset) {
                *bits = *bits | (R::from_mask(mask) << shift);
            }
        }
    }

    /// Clear the cells covered by `orientation` at (`row`, `col`)
    pub fn remove(&mut self, orientation: &Orientation, row: usize, col: usize) {
        let Some(shift) = self.shift_for(orientation, row, col) else {
            return;
        };

        for (offset, &mask) in orientation.rows().iter().enumerate() {
            if let Some(bits) = self.rows.get_mut(row + offset) {
                *bits = *bits & !(R::from_mask(mask) << shift);
            }
        }
    }
}

impl<R: RowBits> fmt::Display for Grid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = if self.is_occupied(row, col) {
                    OCCUPIED_CELL
                } else {
                    EMPTY_CELL
                };
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
