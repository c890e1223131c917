//! Exact packing of polyomino shapes into rectangular grids
//!
//! Shapes are canonicalized into every distinct rotation and reflection,
//! encoded as per-row bitmasks, and placed by a backtracking search that
//! prunes on reachable free area and breaks symmetry between identical
//! copies. Each query asks whether a multiset of shapes fits in one grid.

#![forbid(unsafe_code)]

/// Canonicalization, pruning, ordering and the backtracking search
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Bit-packed grid storage
pub mod spatial;

pub use algorithm::executor::{Query, QueryReport, Solver, SolverConfig, Verdict};
pub use io::error::{PackingError, Result};
