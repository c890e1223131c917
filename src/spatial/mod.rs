//! Bit-packed grid storage
//!
//! This module contains the occupancy representation shared by the search:
//! - Fixed-width row words
//! - The per-query packing grid

/// Per-query occupancy grid with reversible placement
pub mod grid;
/// Row word abstraction over `u64` and `u128`
pub mod rows;

pub use grid::Grid;
pub use rows::RowBits;
