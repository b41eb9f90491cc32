//! Statistical structures for model results

use serde::{Deserialize, Serialize};

/// Whole-model fit statistics, produced atomically with a successful fit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelStatistics {
    /// R-squared
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Mean squared error of the residuals
    pub mse: f64,
    /// Residual standard error, `sqrt(MSE)`
    pub residual_std_error: f64,
    /// F-statistic for the overall regression
    pub f_statistic: f64,
    /// Residual degrees of freedom, `n − p`
    pub df_residual: usize,
    /// Model degrees of freedom, `p − 1`
    pub df_model: usize,
}

/// Residual distribution summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResidualStatistics {
    /// Minimum residual
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum residual
    pub max: f64,
    /// Mean residual
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
}
