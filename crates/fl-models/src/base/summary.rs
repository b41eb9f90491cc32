//! Model summary structures

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coefficient::Coefficient;
use super::statistics::{ModelStatistics, ResidualStatistics};

/// Comprehensive model summary structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Response variable name
    pub response: String,
    /// Number of observations used in the fit
    pub n_obs: usize,
    /// Number of parameters (including intercept)
    pub n_predictors: usize,
    /// Coefficients table
    pub coefficients: Vec<Coefficient>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Residual statistics
    pub residual_statistics: ResidualStatistics,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Summary")?;
        writeln!(f, "=============")?;
        writeln!(f, "Response: {}", self.response)?;
        writeln!(f, "Observations: {}", self.n_obs)?;
        writeln!(f, "Predictors: {}", self.n_predictors)?;
        writeln!(f)?;

        // Residuals
        let r = &self.residual_statistics;
        writeln!(f, "Residuals:")?;
        writeln!(
            f,
            "{:>12} {:>12} {:>12} {:>12} {:>12}",
            "Min", "1Q", "Median", "3Q", "Max"
        )?;
        writeln!(
            f,
            "{:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            r.min, r.q1, r.median, r.q3, r.max
        )?;
        writeln!(f)?;

        // Coefficients
        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<20} {:>12} {:>12} {:>12} {:>12}",
            "Term", "Estimate", "Std Error", "t-value", "p-value"
        )?;
        writeln!(
            f,
            "{:-<20} {:-<12} {:-<12} {:-<12} {:-<12}",
            "", "", "", "", ""
        )?;

        for coeff in &self.coefficients {
            writeln!(
                f,
                "{:<20} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                coeff.name, coeff.estimate, coeff.std_error, coeff.t_stat, coeff.p_value
            )?;
        }
        writeln!(f)?;

        // Model statistics
        let s = &self.model_statistics;
        writeln!(f, "Model Statistics:")?;
        writeln!(f, "  R-squared: {:.4}", s.r_squared)?;
        writeln!(f, "  Adjusted R-squared: {:.4}", s.adj_r_squared)?;
        writeln!(f, "  F-statistic: {:.4}", s.f_statistic)?;
        writeln!(f, "  Residual Std. Error: {:.4}", s.residual_std_error)?;
        writeln!(f, "  Residual DF: {}", s.df_residual)?;
        writeln!(f, "  Model DF: {}", s.df_model)?;

        Ok(())
    }
}
