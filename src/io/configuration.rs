//! Solver constants and runtime configuration defaults

// Input symbols
/// Character marking an occupied shape cell
pub const OCCUPIED_CELL: char = '#';
/// Character marking an empty shape cell
pub const EMPTY_CELL: char = '.';

// Row masks are u64 for shapes and at most u128 for grids
/// Widest or tallest shape bounding box accepted
pub const MAX_SHAPE_WIDTH: usize = 64;
/// Widest grid accepted
pub const MAX_GRID_WIDTH: usize = 128;

/// Free-area margin above which the connectivity flood fill is skipped
pub const DEFAULT_SLACK: usize = 20;

/// Seed for shuffled item ordering
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Edge length of one grid cell in rendered layouts (pixels)
pub const DEFAULT_CELL_PIXELS: u32 = 16;
/// Largest rendered layout accepted (pixels)
pub const MAX_RENDER_PIXELS: u64 = 1 << 28;
/// Filename prefix for rendered layouts
pub const RENDER_PREFIX: &str = "query_";

// Progress bar display settings
/// Width of the query progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
