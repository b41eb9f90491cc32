//! Columnar data structures for FitLab
//!
//! A [`Dataset`] is an insertion-ordered collection of equal-length numeric
//! [`Column`]s keyed by unique names. Missing entries are representable and
//! are filtered out when a design matrix is built.

mod builder;
mod column;
mod dataset;

#[cfg(test)]
mod tests;

// Re-exports
pub use builder::DatasetBuilder;
pub use column::{Column, ColumnStats};
pub use dataset::Dataset;

// Type aliases for common use cases
pub type FloatArray = ndarray::Array1<f64>;
pub type Vector = ndarray::Array1<f64>;
pub type Matrix = ndarray::Array2<f64>;

/// Error types specific to data operations
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Index out of bounds: index {index}, length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
