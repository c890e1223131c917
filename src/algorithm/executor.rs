use log::{debug, info, warn};
use rayon::prelude::*;

use crate::algorithm::canonical::{Orientation, OrientationTable, RawShape};
use crate::algorithm::ordering::{Item, ItemOrder, build_items};
use crate::algorithm::packer::{Packer, Placement};
use crate::io::configuration::{DEFAULT_SLACK, MAX_GRID_WIDTH};
use crate::io::error::{PackingError, Result};
use crate::spatial::{Grid, RowBits};

/// One grid to fill: `counts[i]` copies of shape `i` into a `width` x `height` rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Required copies per shape id
    pub counts: Vec<usize>,
}

impl Query {
    /// Create a query
    pub const fn new(width: usize, height: usize, counts: Vec<usize>) -> Self {
        Self {
            width,
            height,
            counts,
        }
    }
}

/// Outcome of one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every item was placed
    Feasible,
    /// No placement exists
    Infeasible,
    /// The node limit stopped the search before an answer was found
    Undecided,
}

/// Verdict plus search statistics for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    /// Outcome of the search
    pub verdict: Verdict,
    /// Placements made during the search
    pub nodes: u64,
    /// Item positions when feasible, empty otherwise
    pub layout: Vec<Placement>,
}

impl QueryReport {
    const fn without_search(verdict: Verdict) -> Self {
        Self {
            verdict,
            nodes: 0,
            layout: Vec::new(),
        }
    }

    /// Whether the query was shown feasible
    pub fn is_feasible(&self) -> bool {
        self.verdict == Verdict::Feasible
    }
}

/// Runtime knobs for the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Free-area margin above which the flood fill is skipped
    pub slack: usize,
    /// Item ordering heuristic
    pub order: ItemOrder,
    /// Maximum placements per query before giving up
    pub node_limit: Option<u64>,
    /// Evaluate queries on the rayon thread pool
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            slack: DEFAULT_SLACK,
            order: ItemOrder::default(),
            node_limit: None,
            parallel: true,
        }
    }
}

/// Query driver sharing one orientation table across all queries
///
/// Each query owns its grid and item list, so queries can run on any thread.
pub struct Solver {
    table: OrientationTable,
    config: SolverConfig,
}

impl Solver {
    /// Create a solver over a prebuilt orientation table
    pub const fn new(table: OrientationTable, config: SolverConfig) -> Self {
        Self { table, config }
    }

    /// Canonicalize `shapes` and create a solver
    ///
    /// # Errors
    ///
    /// Returns an error if the orientation table cannot be built
    pub fn from_shapes(shapes: &[RawShape], config: SolverConfig) -> Result<Self> {
        Ok(Self::new(OrientationTable::build(shapes)?, config))
    }

    /// Shared orientation table
    pub const fn table(&self) -> &OrientationTable {
        &self.table
    }

    /// Active configuration
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Decide whether a single query is feasible
    ///
    /// A query without items is feasible. A query whose total item area
    /// exceeds the grid is infeasible without searching. Grids taller than
    /// the items stacked on top of each other are searched at that height.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The query counts an undefined shape
    /// - The grid is wider than [`MAX_GRID_WIDTH`]
    pub fn solve(&self, query: &Query) -> Result<QueryReport> {
        if query.width > MAX_GRID_WIDTH {
            return Err(PackingError::GridTooWide {
                width: query.width,
                max: MAX_GRID_WIDTH,
            });
        }

        let items = build_items(&self.table, &query.counts, self.config.order)?;
        if items.is_empty() {
            return Ok(QueryReport::without_search(Verdict::Feasible));
        }

        let total_area: usize = items.iter().map(|item| item.area).sum();
        if let Some(grid_area) = query
            .width
            .checked_mul(query.height)
            .filter(|&grid_area| total_area > grid_area)
        {
            debug!(
                "{}x{}: items need {total_area} cells, grid has {grid_area}",
                query.width, query.height
            );
            return Ok(QueryReport::without_search(Verdict::Infeasible));
        }

        // Rows below the stacked items can never be reached
        let height = query.height.min(self.stacked_height(&items));

        if query.width <= <u64 as RowBits>::BITS {
            self.search::<u64>(query, height, items)
        } else {
            self.search::<u128>(query, height, items)
        }
    }

    /// Rows needed to stack every item in its tallest orientation
    ///
    /// Any layout can drop the rows no item's bounding box touches, so a
    /// query never needs a taller grid than this.
    fn stacked_height(&self, items: &[Item]) -> usize {
        items
            .iter()
            .filter_map(|item| {
                self.table
                    .orientations(item.shape)
                    .and_then(|orientations| orientations.iter().map(Orientation::height).max())
            })
            .fold(0, usize::saturating_add)
    }

    fn search<R: RowBits>(
        &self,
        query: &Query,
        height: usize,
        items: Vec<Item>,
    ) -> Result<QueryReport> {
        let mut grid = Grid::<R>::new(query.width, height)?;
        let mut packer =
            Packer::new(&self.table, items, self.config.slack).with_node_limit(self.config.node_limit);

        let verdict = match packer.pack(&mut grid, 0) {
            Ok(true) => Verdict::Feasible,
            Ok(false) => Verdict::Infeasible,
            Err(PackingError::NodeLimitExceeded { nodes }) => {
                warn!(
                    "{}x{}: gave up after {nodes} placements",
                    query.width, query.height
                );
                Verdict::Undecided
            }
            Err(error) => return Err(error),
        };

        debug!(
            "{}x{}: {verdict:?} after {} placements",
            query.width,
            query.height,
            packer.nodes()
        );

        let layout = if verdict == Verdict::Feasible {
            packer.layout()
        } else {
            Vec::new()
        };

        Ok(QueryReport {
            verdict,
            nodes: packer.nodes(),
            layout,
        })
    }

    /// Solve every query, reporting each finished one to `on_done`
    ///
    /// Reports come back in query order regardless of evaluation order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Solver::solve`]
    pub fn solve_all_with<F>(&self, queries: &[Query], on_done: F) -> Result<Vec<QueryReport>>
    where
        F: Fn(&QueryReport) + Sync,
    {
        let run = |query: &Query| -> Result<QueryReport> {
            let report = self.solve(query)?;
            on_done(&report);
            Ok(report)
        };

        if self.config.parallel {
            queries.par_iter().map(run).collect()
        } else {
            queries.iter().map(run).collect()
        }
    }

    /// Solve every query
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Solver::solve`]
    pub fn solve_all(&self, queries: &[Query]) -> Result<Vec<QueryReport>> {
        self.solve_all_with(queries, |_| {})
    }

    /// Number of queries shown feasible; undecided queries do not count
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Solver::solve`]
    pub fn count_feasible(&self, queries: &[Query]) -> Result<usize> {
        let feasible = self
            .solve_all(queries)?
            .iter()
            .filter(|report| report.is_feasible())
            .count();
        info!("{feasible} of {} queries feasible", queries.len());
        Ok(feasible)
    }
}
