//! Shape canonicalization into deduplicated, bit-encoded orientations
//!
//! A raw shape is turned into every distinct placement under the eight
//! symmetries of the square (four rotations, each optionally mirrored). Each
//! placement is trimmed to its bounding box and stored as one `u64` mask per
//! row, leftmost cell in the highest bit of the orientation's width.

use ndarray::{Array2, ArrayView2, Axis, Slice};
use std::collections::HashSet;
use std::fmt;

use crate::io::configuration::{EMPTY_CELL, MAX_SHAPE_WIDTH, OCCUPIED_CELL};
use crate::io::error::{PackingError, Result};

/// Shape identifier, dense from zero in definition order
pub type ShapeId = usize;

/// Shape as written in the puzzle input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawShape {
    /// Identifier from the shape header
    pub id: ShapeId,
    /// Cell rows, `true` for occupied; rows may differ in length
    pub rows: Vec<Vec<bool>>,
}

impl RawShape {
    /// Build a shape from text rows using the configured cell symbols
    ///
    /// Any character other than the occupied symbol reads as empty.
    pub fn from_text<S: AsRef<str>>(id: ShapeId, rows: &[S]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.as_ref().chars().map(|c| c == OCCUPIED_CELL).collect())
            .collect();
        Self { id, rows }
    }

    /// Number of occupied cells
    pub fn area(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell).count())
            .sum()
    }

    fn to_matrix(&self) -> Array2<bool> {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut matrix = Array2::from_elem((self.rows.len(), width), false);
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                if let Some(slot) = matrix.get_mut([r, c]) {
                    *slot = cell;
                }
            }
        }
        matrix
    }
}

/// One distinct rotation/reflection of a shape, trimmed and bit-encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Orientation {
    height: usize,
    width: usize,
    rows: Vec<u64>,
}

impl Orientation {
    /// Create an orientation from row masks of the given width
    pub fn new(width: usize, rows: Vec<u64>) -> Self {
        Self {
            height: rows.len(),
            width,
            rows,
        }
    }

    /// Bounding box height
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Bounding box width
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Row masks, top row first
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Number of occupied cells
    pub fn area(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Whether the cell at (`row`, `col`) inside the bounding box is occupied
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        col < self.width
            && self
                .rows
                .get(row)
                .is_some_and(|mask| (mask >> (self.width - 1 - col)) & 1 == 1)
    }

    /// Occupied cells as (`row`, `col`) offsets from the top-left corner
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width)
                .filter(move |&col| self.is_occupied(row, col))
                .map(move |col| (row, col))
        })
    }
}

impl fmt::Display for Orientation {
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

/// Rotate a cell matrix 90 degrees clockwise
fn rotate_clockwise(matrix: ArrayView2<'_, bool>) -> Array2<bool> {
    let mut rotated = matrix.reversed_axes();
    rotated.invert_axis(Axis(1));
    rotated.to_owned()
}

/// Mirror a cell matrix top to bottom
fn flip_vertical(mut matrix: ArrayView2<'_, bool>) -> Array2<bool> {
    matrix.invert_axis(Axis(0));
    matrix.to_owned()
}

/// Trim a matrix to the bounding box of its occupied cells and encode each row
///
/// Returns `None` for a matrix without occupied cells.
fn trim_and_encode(matrix: ArrayView2<'_, bool>) -> Option<Orientation> {
    let occupied: Vec<(usize, usize)> = matrix
        .indexed_iter()
        .filter(|&(_, &cell)| cell)
        .map(|(index, _)| index)
        .collect();

    let min_row = occupied.iter().map(|&(r, _)| r).min()?;
    let max_row = occupied.iter().map(|&(r, _)| r).max()?;
    let min_col = occupied.iter().map(|&(_, c)| c).min()?;
    let max_col = occupied.iter().map(|&(_, c)| c).max()?;

    let mut bounds = matrix;
    bounds.slice_axis_inplace(Axis(0), Slice::from(min_row..=max_row));
    bounds.slice_axis_inplace(Axis(1), Slice::from(min_col..=max_col));

    let rows = bounds
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .fold(0_u64, |mask, &cell| (mask << 1) | u64::from(cell))
        })
        .collect();

    Some(Orientation::new(max_col - min_col + 1, rows))
}

/// Compute the distinct orientations of a shape, tallest first
///
/// Walks four clockwise rotations, mirrors vertically, then walks four more,
/// keeping the first occurrence of every trimmed bit pattern. The sort by
/// height is stable, so orientations of equal height keep discovery order.
///
/// The shape must have at least one occupied cell and fit within
/// [`MAX_SHAPE_WIDTH`] in both directions; an empty shape yields no
/// orientations.
pub fn canonicalize(shape: &RawShape) -> Vec<Orientation> {
    let mut current = shape.to_matrix();
    let mut seen = HashSet::new();
    let mut orientations = Vec::new();

    for _ in 0..2 {
        for _ in 0..4 {
            if let Some(orientation) = trim_and_encode(current.view()) {
                if seen.insert(orientation.clone()) {
                    orientations.push(orientation);
                }
            }
            current = rotate_clockwise(current.view());
        }
        current = flip_vertical(current.view());
    }

    orientations.sort_by(|a, b| b.height.cmp(&a.height));
    orientations
}

/// Orientations and area of one shape
#[derive(Debug, Clone)]
struct ShapeEntry {
    orientations: Vec<Orientation>,
    area: usize,
}

/// Read-only orientation lookup shared by every query
///
/// Built once per puzzle and indexed by [`ShapeId`].
#[derive(Debug, Clone, Default)]
pub struct OrientationTable {
    shapes: Vec<ShapeEntry>,
}

impl OrientationTable {
    /// Canonicalize every shape
    ///
    /// Shapes must be given with identifiers `0..n` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A shape identifier is missing from the dense `0..n` sequence
    /// - A shape has no occupied cells
    /// - A shape's bounding box is wider or taller than [`MAX_SHAPE_WIDTH`]
    pub fn build(shapes: &[RawShape]) -> Result<Self> {
        let mut entries = Vec::with_capacity(shapes.len());

        for (expected, shape) in shapes.iter().enumerate() {
            if shape.id != expected {
                return Err(PackingError::UnknownShape {
                    shape: expected,
                    defined: shapes.len(),
                });
            }

            let area = shape.area();
            if area == 0 {
                return Err(PackingError::EmptyShape { shape: shape.id });
            }

            let orientations = canonicalize(shape);
            let extent = orientations
                .iter()
                .map(|o| o.width().max(o.height()))
                .max()
                .unwrap_or(0);
            if extent > MAX_SHAPE_WIDTH {
                return Err(PackingError::ShapeTooWide {
                    shape: shape.id,
                    width: extent,
                    max: MAX_SHAPE_WIDTH,
                });
            }

            entries.push(ShapeEntry { orientations, area });
        }

        Ok(Self { shapes: entries })
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether no shapes are defined
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Orientations of a shape, tallest first
    pub fn orientations(&self, shape: ShapeId) -> Option<&[Orientation]> {
        self.shapes
            .get(shape)
            .map(|entry| entry.orientations.as_slice())
    }

    /// Occupied cell count of a shape
    pub fn area(&self, shape: ShapeId) -> Option<usize> {
        self.shapes.get(shape).map(|entry| entry.area)
    }
}
