//! Error types and context management for solver operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all solver operations
///
/// An infeasible query is not an error; it is reported through
/// [`crate::algorithm::executor::Verdict::Infeasible`].
#[derive(Debug)]
pub enum PackingError {
    /// Puzzle text could not be parsed
    Parse {
        /// 1-based input line, 0 when not yet known
        line: usize,
        /// Description of what's wrong with the line
        reason: String,
    },

    /// Shape without any occupied cell
    EmptyShape {
        /// Identifier of the empty shape
        shape: usize,
    },

    /// Shape identifier with no definition
    UnknownShape {
        /// The undefined shape identifier
        shape: usize,
        /// Number of shapes that are defined
        defined: usize,
    },

    /// Grid wider than the widest supported row word
    GridTooWide {
        /// Requested grid width
        width: usize,
        /// Maximum supported width
        max: usize,
    },

    /// Grid whose cell count does not fit in `usize`
    GridTooLarge {
        /// Requested grid width
        width: usize,
        /// Requested grid height
        height: usize,
    },

    /// Shape bounding box too large to encode as row masks
    ShapeTooWide {
        /// Identifier of the shape
        shape: usize,
        /// Largest bounding box side over all orientations
        width: usize,
        /// Maximum supported side length
        max: usize,
    },

    /// Search placed more pieces than the configured node limit allows
    NodeLimitExceeded {
        /// Placements attempted before giving up
        nodes: u64,
    },

    /// Solver parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save a rendered layout to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for PackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { line, reason } => {
                write!(f, "Parse error on line {line}: {reason}")
            }
            Self::EmptyShape { shape } => {
                write!(f, "Shape {shape} has no occupied cells")
            }
            Self::UnknownShape { shape, defined } => {
                write!(
                    f,
                    "Shape {shape} is not defined ({defined} shapes are defined)"
                )
            }
            Self::GridTooWide { width, max } => {
                write!(f, "Grid width {width} exceeds the supported maximum of {max}")
            }
            Self::GridTooLarge { width, height } => {
                write!(f, "Grid of {width}x{height} cells is too large to represent")
            }
            Self::ShapeTooWide { shape, width, max } => {
                write!(
                    f,
                    "Shape {shape} spans {width} cells, more than the supported {max}"
                )
            }
            Self::NodeLimitExceeded { nodes } => {
                write!(f, "Search abandoned after {nodes} placements")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PackingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, PackingError>;

/// Attaches the input line number to parse errors
pub trait WithLine<T> {
    /// Set the line of a [`PackingError::Parse`] error
    ///
    /// # Errors
    ///
    /// Propagates the original error, with the line applied to parse errors
    fn at_line(self, line: usize) -> Result<T>;
}

impl<T> WithLine<T> for Result<T> {
    fn at_line(self, line: usize) -> Self {
        self.map_err(|mut error| {
            // Only parse errors carry a line
            if let PackingError::Parse { line: slot, .. } = &mut error {
                *slot = line;
            }
            error
        })
    }
}

/// Create a parse error whose line is filled in later with [`WithLine::at_line`]
pub fn parse_error(reason: &impl ToString) -> PackingError {
    PackingError::Parse {
        line: 0,
        reason: reason.to_string(),
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PackingError {
    PackingError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
