// ---------------------------------------------------------------------------
// GridError: configuration failures for the build area
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised while building a grid or loading its settings.
///
/// Interactive outcomes (out of bounds, collision, nothing selected) are not
/// errors and never show up here; they are reported as `false` / `None`.
#[derive(Debug)]
pub enum GridError {
    /// Cell edge length is zero, negative or not finite.
    InvalidCellSize(f32),
    /// Width or height is zero, or the cell count does not fit in memory.
    InvalidDimensions { width: usize, height: usize },
    /// A starting placeable could never be placed.
    InvalidPlaceable { id: String, reason: &'static str },
    /// Settings file could not be read.
    Io(std::io::Error),
    /// Settings file is not valid JSON for `GridSettings`.
    Parse(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidCellSize(size) => {
                write!(f, "Invalid cell size {size}: must be a positive number")
            }
            GridError::InvalidDimensions { width, height } => {
                write!(f, "Invalid grid dimensions {width}x{height}")
            }
            GridError::InvalidPlaceable { id, reason } => {
                write!(f, "Invalid placeable '{id}': {reason}")
            }
            GridError::Io(e) => write!(f, "I/O error: {e}"),
            GridError::Parse(msg) => write!(f, "Settings parse error: {msg}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GridError {
    fn from(e: std::io::Error) -> Self {
        GridError::Io(e)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        GridError::Parse(e.to_string())
    }
}
