use bitvec::prelude::*;
use std::collections::VecDeque;

use crate::spatial::{Grid, RowBits};

/// Conservative check that the remaining items could still fit
///
/// Answers in three tiers:
/// 1. Fewer free cells than `required_area` is an exact "no".
/// 2. More than `required_area + slack` free cells is an optimistic "yes".
/// 3. Otherwise free cells are flood-filled into 4-connected islands and only
///    islands of at least `min_item_area` cells count towards the total.
///
/// A `false` result proves no completion exists; `true` only means one might.
pub fn has_enough_space<R: RowBits>(
    grid: &Grid<R>,
    required_area: usize,
    min_item_area: usize,
    slack: usize,
) -> bool {
    let free_area = grid.free();
    if free_area < required_area {
        return false;
    }
    if free_area > required_area.saturating_add(slack) {
        return true;
    }

    let mut usable_area = 0;
    for island in Islands::new(grid) {
        if island >= min_item_area {
            usable_area += island;
        }
        if usable_area >= required_area {
            return true;
        }
    }
    usable_area >= required_area
}

/// Pruning gate configured once per query
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityEstimator {
    /// Smallest area among all items of the query
    pub min_item_area: usize,
    /// Free-area margin above which the flood fill is skipped
    pub slack: usize,
}

impl FeasibilityEstimator {
    /// Create an estimator for a query
    pub const fn new(min_item_area: usize, slack: usize) -> Self {
        Self {
            min_item_area,
            slack,
        }
    }

    /// See [`has_enough_space`]
    pub fn has_enough_space<R: RowBits>(&self, grid: &Grid<R>, required_area: usize) -> bool {
        has_enough_space(grid, required_area, self.min_item_area, self.slack)
    }
}

/// Sizes of the 4-connected islands of free cells, in row-major discovery order
///
/// Breadth-first over an explicit queue. Cells are numbered `row * width + col`
/// and the visited set is a flat bit vector of the same size.
pub struct Islands<'a, R: RowBits> {
    grid: &'a Grid<R>,
    visited: BitVec,
    queue: VecDeque<usize>,
    cursor: usize,
}

impl<'a, R: RowBits> Islands<'a, R> {
    /// Start enumerating the islands of `grid`
    pub fn new(grid: &'a Grid<R>) -> Self {
        Self {
            grid,
            visited: bitvec![0; grid.area()],
            queue: VecDeque::new(),
            cursor: 0,
        }
    }

    /// Mark a free, unvisited cell and report whether it was newly reached
    fn visit(&mut self, cell: usize) -> bool {
        let width = self.grid.width();
        if self.grid.is_occupied(cell / width, cell % width) {
            return false;
        }
        match self.visited.get_mut(cell) {
            Some(mut bit) if !*bit => {
                bit.set(true);
                true
            }
            _ => false,
        }
    }

    fn flood(&mut self, start: usize) -> usize {
        let width = self.grid.width();
        let height = self.grid.height();
        let mut size = 0;

        self.queue.push_back(start);
        while let Some(cell) = self.queue.pop_front() {
            size += 1;
            let (row, col) = (cell / width, cell % width);

            let neighbours = [
                (row > 0).then(|| cell - width),
                (row + 1 < height).then(|| cell + width),
                (col > 0).then(|| cell - 1),
                (col + 1 < width).then(|| cell + 1),
            ];
            for next in neighbours.into_iter().flatten() {
                if self.visit(next) {
                    self.queue.push_back(next);
                }
            }
        }

        size
    }
}

impl<R: RowBits> Iterator for Islands<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.cursor < self.grid.area() {
            let cell = self.cursor;
            self.cursor += 1;
            if self.visit(cell) {
                return Some(self.flood(cell));
            }
        }
        None
    }
}
