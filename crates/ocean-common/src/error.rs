//! Error types for grid alignment and merging.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised while slicing, relabeling and merging grids.
///
/// None of these are recoverable inside the core: a run either aligns and
/// merges every source or fails without producing output.
#[derive(Debug, Error)]
pub enum GridError {
    /// A source's dimension length after slicing does not match the reference.
    #[error("shape mismatch for '{variable}' along {dimension}: expected {expected}, got {actual}")]
    ShapeMismatch {
        variable: String,
        dimension: String,
        expected: usize,
        actual: usize,
    },

    /// A requested index or index range lies outside a source's extent.
    #[error("index {index} out of range for '{variable}' along {dimension} (length {len})")]
    IndexOutOfRange {
        variable: String,
        dimension: String,
        index: usize,
        len: usize,
    },

    /// Two merge inputs disagree on a coordinate that must be shared.
    #[error(
        "coordinate conflict for '{variable}' on {coordinate}[{index}]: expected {expected}, got {actual}"
    )]
    CoordinateConflict {
        variable: String,
        coordinate: String,
        index: usize,
        expected: f64,
        actual: f64,
    },

    /// Native coordinates drifted further from the reference than allowed.
    #[error(
        "'{variable}' {coordinate}[{index}] = {actual} differs from reference {expected} by more than {tolerance}"
    )]
    CoordinateDrift {
        variable: String,
        coordinate: String,
        index: usize,
        expected: f64,
        actual: f64,
        tolerance: f64,
    },

    /// The resolved bounding box selects no grid points.
    #[error("bounding box selects no points along {dimension} (range {start}..{end})")]
    EmptySelection {
        dimension: String,
        start: usize,
        end: usize,
    },

    /// Two inputs to a merge carry a variable with the same name.
    #[error("duplicate variable '{0}' in merge inputs")]
    DuplicateVariable(String),

    /// A variable lacks a dimension the operation requires.
    #[error("variable '{variable}' has no {dimension} dimension")]
    MissingDimension { variable: String, dimension: String },

    /// A data buffer disagrees with the shape implied by its coordinates.
    #[error("invalid data for '{variable}': {message}")]
    InvalidData { variable: String, message: String },
}

impl GridError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(
        variable: impl Into<String>,
        dimension: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::ShapeMismatch {
            variable: variable.into(),
            dimension: dimension.into(),
            expected,
            actual,
        }
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(
        variable: impl Into<String>,
        dimension: impl Into<String>,
        index: usize,
        len: usize,
    ) -> Self {
        Self::IndexOutOfRange {
            variable: variable.into(),
            dimension: dimension.into(),
            index,
            len,
        }
    }

    /// Create a MissingDimension error.
    pub fn missing_dimension(variable: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self::MissingDimension {
            variable: variable.into(),
            dimension: dimension.into(),
        }
    }

    /// Create an InvalidData error.
    pub fn invalid_data(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidData {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GridError::ShapeMismatch { .. } => "ShapeMismatch",
            GridError::IndexOutOfRange { .. } => "IndexOutOfRange",
            GridError::CoordinateConflict { .. } => "CoordinateConflict",
            GridError::CoordinateDrift { .. } => "CoordinateDrift",
            GridError::EmptySelection { .. } => "EmptySelection",
            GridError::DuplicateVariable(_) => "DuplicateVariable",
            GridError::MissingDimension { .. } => "MissingDimension",
            GridError::InvalidData { .. } => "InvalidData",
        }
    }
}
