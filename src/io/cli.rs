//! Command-line interface for counting feasible queries in a puzzle file

use crate::algorithm::executor::{QueryReport, Solver, SolverConfig};
use crate::algorithm::ordering::ItemOrder;
use crate::io::configuration::{DEFAULT_CELL_PIXELS, DEFAULT_SEED, DEFAULT_SLACK, RENDER_PREFIX};
use crate::io::error::{PackingError, Result, invalid_parameter};
use crate::io::image::export_layout_as_png;
use crate::io::parser::{Puzzle, parse_puzzle};
use crate::io::progress::ProgressManager;
use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Item ordering selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Largest shapes first
    LargestFirst,
    /// Shapes in definition order
    Definition,
    /// Shape groups in a seeded random order
    Shuffled,
}

#[derive(Parser)]
#[command(name = "shapefit")]
#[command(
    author,
    version,
    about = "Count the grids that can hold their required polyomino shapes"
)]
/// Command-line arguments for the packing solver
pub struct Cli {
    /// Puzzle file with shape definitions and grid queries
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Free-area margin above which connectivity pruning is skipped
    #[arg(short, long, default_value_t = DEFAULT_SLACK)]
    pub slack: usize,

    /// Order in which items are placed
    #[arg(short, long, value_enum, default_value_t = OrderArg::LargestFirst)]
    pub order: OrderArg,

    /// Seed for the shuffled order
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Give up on a query after this many placements
    #[arg(short, long)]
    pub node_limit: Option<u64>,

    /// Evaluate queries one at a time on the main thread
    #[arg(long)]
    pub sequential: bool,

    /// Write a PNG of every feasible layout into this directory
    #[arg(short, long, value_name = "DIR")]
    pub render: Option<PathBuf>,

    /// Pixel size of one grid cell in rendered layouts
    #[arg(long, default_value_t = DEFAULT_CELL_PIXELS)]
    pub cell_pixels: u32,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by `--quiet` and `--verbose`
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// Item order selected by `--order` and `--seed`
    pub const fn item_order(&self) -> ItemOrder {
        match self.order {
            OrderArg::LargestFirst => ItemOrder::LargestFirst,
            OrderArg::Definition => ItemOrder::DefinitionOrder,
            OrderArg::Shuffled => ItemOrder::Shuffled { seed: self.seed },
        }
    }

    /// Solver configuration assembled from the arguments
    pub const fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            slack: self.slack,
            order: self.item_order(),
            node_limit: self.node_limit,
            parallel: !self.sequential,
        }
    }
}

/// Reads a puzzle file, solves its queries and renders the results
pub struct Runner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl Runner {
    /// Create a runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Progress display, if enabled
    pub const fn progress_manager(&self) -> Option<&ProgressManager> {
        self.progress_manager.as_ref()
    }

    /// Solve every query in the input file and return the feasible count
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be read or parsed
    /// - A shape or query is outside the supported limits
    /// - A rendered layout cannot be written
    pub fn run(&mut self) -> Result<usize> {
        if self.cli.cell_pixels == 0 {
            return Err(invalid_parameter(
                "cell_pixels",
                &self.cli.cell_pixels,
                &"must be positive",
            ));
        }

        let start_time = Instant::now();
        let puzzle = self.load_puzzle()?;
        let solver = Solver::from_shapes(&puzzle.shapes, self.cli.solver_config())?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(puzzle.queries.len());
        }

        let progress = self.progress_manager.as_ref();
        let reports = solver.solve_all_with(&puzzle.queries, |report| {
            if let Some(pm) = progress {
                pm.complete_query(report);
            }
        })?;

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        if let Some(ref dir) = self.cli.render {
            self.render_layouts(&solver, &puzzle, &reports, dir)?;
        }

        let feasible = reports.iter().filter(|report| report.is_feasible()).count();
        info!(
            "{feasible} of {} queries feasible in {:.2?}",
            reports.len(),
            start_time.elapsed()
        );
        Ok(feasible)
    }

    fn load_puzzle(&self) -> Result<Puzzle> {
        let text =
            std::fs::read_to_string(&self.cli.input).map_err(|e| PackingError::FileSystem {
                path: self.cli.input.clone(),
                operation: "read",
                source: e,
            })?;
        parse_puzzle(&text)
    }

    fn render_layouts(
        &self,
        solver: &Solver,
        puzzle: &Puzzle,
        reports: &[QueryReport],
        dir: &Path,
    ) -> Result<()> {
        for (index, (query, report)) in puzzle.queries.iter().zip(reports).enumerate() {
            if !report.is_feasible() {
                continue;
            }
            let path = Self::get_render_path(dir, index);
            export_layout_as_png(
                &report.layout,
                solver.table(),
                (query.width, query.height),
                self.cli.cell_pixels,
                &path,
            )?;
        }
        Ok(())
    }

    /// Output path of the rendered layout for query `index`
    pub fn get_render_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("{RENDER_PREFIX}{index}.png"))
    }
}
