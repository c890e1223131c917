//! Input/output operations and error handling

/// Command-line front end
pub mod cli;
/// Solver constants and defaults
pub mod configuration;
/// Error types for every solver operation
pub mod error;
/// PNG rendering of packed layouts
pub mod image;
/// Log backend cooperating with the progress display
pub mod logging;
/// Puzzle text parsing
pub mod parser;
/// Query progress tracking
pub mod progress;
