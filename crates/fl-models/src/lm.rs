//! Linear regression
//!
//! Ordinary-least-squares estimation with per-coefficient inference, plus
//! the diagnostic suite that checks the regression assumptions against a
//! fitted model.

pub mod diagnostics;
pub mod ols;


// Re-exports
pub use diagnostics::{DiagnosticReport, Diagnostics, TestStatus, Vif, VifSeverity};
pub use ols::{LinearRegression, RegressionResult};

use crate::base::Result;
use fl_core::data::Dataset;

/// Convenience function for OLS regression
pub fn ols(data: &Dataset, response: &str, predictors: &[&str]) -> Result<LinearRegression> {
    LinearRegression::new(response, predictors)?.data(data).fit()
}
