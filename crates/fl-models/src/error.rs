//! Model-related error types

use thiserror::Error;

use fl_core::data::DataError;

/// Errors surfaced by the regression engine
#[derive(Debug, Error)]
pub enum ModelError {
    /// Data-related error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Not enough rows for the number of parameters
    #[error("Not enough data: {n_samples} samples for {n_predictors} parameters")]
    InsufficientData {
        /// Number of design rows
        n_samples: usize,
        /// Number of parameters, intercept included
        n_predictors: usize,
    },

    /// Singular X'X: perfectly collinear predictors
    #[error("Degenerate design: predictors are perfectly collinear")]
    DegenerateDesign,

    /// Zero variance in the response
    #[error("Degenerate response: '{variable}' has zero variance")]
    DegenerateResponse {
        /// Response column name
        variable: String,
    },

    /// No response or no predictors chosen, or the selection repeats a column
    #[error("Invalid selection: {message}")]
    InvalidSelection {
        /// What was wrong with the selection
        message: String,
    },

    /// No dataset attached to the model
    #[error("No dataset attached to the model")]
    NoData,

    /// Model not fitted yet
    #[error("Model not fitted yet")]
    NotFitted,
}
