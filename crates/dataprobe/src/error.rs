//! Error types for the dataprobe library.
//!
//! Extraction errors never escape a crawl: strategies catch them locally and
//! convert them into [`crate::ProbeWarning`] entries on the output.

use thiserror::Error;

/// Failures that can occur inside an extraction strategy.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A target-column index points past the available columns.
    #[error("target column {index} is out of bounds for {columns} columns")]
    SelectorOutOfBounds { index: usize, columns: usize },

    /// A named target column does not exist in the frame.
    #[error("target column '{0}' not found")]
    ColumnNotFound(String),

    /// The selector value could not be interpreted for this data shape.
    #[error("unusable target selector: {0}")]
    InvalidSelector(String),

    /// A strategy received a data object of the wrong representation.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: String,
    },

    /// Block concatenation failed on incompatible dimensions.
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Error from the frame library.
    #[error("frame error: {0}")]
    Frame(#[from] polars::error::PolarsError),
}

/// Result alias for fallible steps inside strategies.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
