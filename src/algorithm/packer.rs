//! Branch-and-bound placement search over bitmask grids
//!
//! The search walks items in list order. For each item it tries every
//! orientation of the item's shape at every top-left position in row-major
//! order, keeps the first one that does not collide, and moves on to the next
//! item. Dead ends undo the latest placement and resume scanning right after
//! it.
//!
//! Two prunings keep the tree small:
//! - Before an item is tried, [`FeasibilityEstimator`] must agree that the
//!   remaining area could still fit.
//! - An item with the same shape as its predecessor only scans positions at
//!   or after the predecessor's placement, so interchangeable copies are
//!   never tried in more than one order.
//!
//! The walk keeps one [`Cursor`] per open item on an explicit stack instead
//! of recursing, so its depth is bounded only by memory.

use crate::algorithm::canonical::{Orientation, OrientationTable, ShapeId};
use crate::algorithm::feasibility::FeasibilityEstimator;
use crate::algorithm::ordering::Item;
use crate::io::error::{PackingError, Result};
use crate::spatial::{Grid, RowBits};

/// Where one item ended up in a successful packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Shape of the placed item
    pub shape: ShapeId,
    /// Index into the shape's orientation list
    pub orientation: usize,
    /// Top row of the orientation's bounding box
    pub row: usize,
    /// Left column of the orientation's bounding box
    pub col: usize,
}

/// Scan position for one item
#[derive(Debug, Clone, Copy)]
struct Cursor {
    index: usize,
    orientation: usize,
    row: usize,
    col: usize,
    start_row: usize,
    start_col: usize,
    /// Orientation, row and column currently set in the grid for this item
    placed: Option<(usize, usize, usize)>,
}

enum Step {
    Complete,
    Pruned,
    Descend(Cursor),
}

/// Backtracking packer for the items of one query
pub struct Packer<'a> {
    table: &'a OrientationTable,
    items: Vec<Item>,
    /// `remaining_area[i]` is the total area of `items[i..]`
    remaining_area: Vec<usize>,
    estimator: FeasibilityEstimator,
    node_limit: Option<u64>,
    nodes: u64,
}

impl<'a> Packer<'a> {
    /// Create a packer for `items`, which must already be in search order
    ///
    /// The estimator's minimum item area is the smallest area over all items.
    pub fn new(table: &'a OrientationTable, items: Vec<Item>, slack: usize) -> Self {
        let mut remaining_area = vec![0; items.len() + 1];
        for (index, item) in items.iter().enumerate().rev() {
            let after = remaining_area.get(index + 1).copied().unwrap_or(0);
            if let Some(slot) = remaining_area.get_mut(index) {
                *slot = after + item.area;
            }
        }

        let min_item_area = items.iter().map(|item| item.area).min().unwrap_or(0);

        Self {
            table,
            items,
            remaining_area,
            estimator: FeasibilityEstimator::new(min_item_area, slack),
            node_limit: None,
            nodes: 0,
        }
    }

    /// Abandon the search once more than `limit` placements have been made
    #[must_use]
    pub const fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Items in search order, with their latest placements
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Total area of all items
    pub fn total_area(&self) -> usize {
        self.remaining_area.first().copied().unwrap_or(0)
    }

    /// Placements made so far, across all calls to [`Packer::pack`]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Final position of every item
    ///
    /// Meaningful only after [`Packer::pack`] returned `Ok(true)`.
    pub fn layout(&self) -> Vec<Placement> {
        self.items
            .iter()
            .map(|item| Placement {
                shape: item.shape,
                orientation: item.placed_orientation,
                row: item.placed_row,
                col: item.placed_col,
            })
            .collect()
    }

    /// Place `items[index..]` into `grid` without overlap
    ///
    /// On `Ok(true)` the grid holds the placement. On `Ok(false)` and on error
    /// the grid is restored bit-for-bit to its state at entry.
    ///
    /// # Errors
    ///
    /// Returns [`PackingError::NodeLimitExceeded`] when a node limit is set and
    /// the search makes more placements than it allows
    pub fn pack<R: RowBits>(&mut self, grid: &mut Grid<R>, index: usize) -> Result<bool> {
        let mut stack = match self.open(grid, index) {
            Step::Complete => return Ok(true),
            Step::Pruned => return Ok(false),
            Step::Descend(cursor) => vec![cursor],
        };

        while let Some(cursor) = stack.last_mut() {
            if let Some((orientation, row, col)) = cursor.placed.take() {
                if let Some(orientation) = self.orientation(cursor.index, orientation) {
                    grid.remove(orientation, row, col);
                }
            }

            let Some((orientation_index, orientation, row, col)) = self.advance(grid, cursor)
            else {
                stack.pop();
                continue;
            };

            grid.place(orientation, row, col);
            cursor.placed = Some((orientation_index, row, col));
            let index = cursor.index;
            if let Some(item) = self.items.get_mut(index) {
                item.placed_orientation = orientation_index;
                item.placed_row = row;
                item.placed_col = col;
            }

            self.nodes += 1;
            if self.node_limit.is_some_and(|limit| self.nodes > limit) {
                self.unwind(grid, &mut stack);
                return Err(PackingError::NodeLimitExceeded { nodes: self.nodes });
            }

            match self.open(grid, index + 1) {
                Step::Complete => return Ok(true),
                Step::Pruned => {}
                Step::Descend(next) => stack.push(next),
            }
        }

        Ok(false)
    }

    fn orientations(&self, index: usize) -> &'a [Orientation] {
        let table = self.table;
        self.items
            .get(index)
            .and_then(|item| table.orientations(item.shape))
            .unwrap_or(&[])
    }

    fn orientation(&self, index: usize, orientation: usize) -> Option<&'a Orientation> {
        self.orientations(index).get(orientation)
    }

    /// Start work on `items[index]`, or report that the branch is finished
    fn open<R: RowBits>(&self, grid: &Grid<R>, index: usize) -> Step {
        let Some(item) = self.items.get(index) else {
            return Step::Complete;
        };

        let required = self.remaining_area.get(index).copied().unwrap_or(0);
        if !self.estimator.has_enough_space(grid, required) {
            return Step::Pruned;
        }

        // Copies of the same shape are placed in row-major order
        let (start_row, start_col) = index
            .checked_sub(1)
            .and_then(|previous| self.items.get(previous))
            .filter(|previous| previous.shape == item.shape)
            .map_or((0, 0), |previous| (previous.placed_row, previous.placed_col));

        Step::Descend(Cursor {
            index,
            orientation: 0,
            row: start_row,
            col: start_col,
            start_row,
            start_col,
            placed: None,
        })
    }

    /// Move `cursor` to the next collision-free position and return it
    ///
    /// The cursor is left just past the returned position, so the next call
    /// resumes the scan there.
    fn advance<R: RowBits>(
        &self,
        grid: &Grid<R>,
        cursor: &mut Cursor,
    ) -> Option<(usize, &'a Orientation, usize, usize)> {
        let orientations = self.orientations(cursor.index);

        while let Some(orientation) = orientations.get(cursor.orientation) {
            let last_row = grid.height().checked_sub(orientation.height());
            let last_col = grid.width().checked_sub(orientation.width());

            if let (Some(last_row), Some(last_col)) = (last_row, last_col) {
                while cursor.row <= last_row {
                    while cursor.col <= last_col {
                        let col = cursor.col;
                        cursor.col += 1;
                        if grid.fits(orientation, cursor.row, col) {
                            return Some((cursor.orientation, orientation, cursor.row, col));
                        }
                    }
                    cursor.row += 1;
                    cursor.col = 0;
                }
            }

            cursor.orientation += 1;
            cursor.row = cursor.start_row;
            cursor.col = cursor.start_col;
        }

        None
    }

    /// Remove every placement still held by the stack
    fn unwind<R: RowBits>(&self, grid: &mut Grid<R>, stack: &mut Vec<Cursor>) {
        while let Some(cursor) = stack.pop() {
            if let Some((orientation, row, col)) = cursor.placed {
                if let Some(orientation) = self.orientation(cursor.index, orientation) {
                    grid.remove(orientation, row, col);
                }
            }
        }
    }
}
