//! FitLab numeric engine
//!
//! Ordinary-least-squares regression with inferential statistics and a
//! suite of classical regression diagnostics, built on hand-rolled matrix
//! algebra and probability-distribution approximations. The engine is
//! synchronous and pure: every fit takes an immutable dataset plus a
//! variable selection and returns a freshly allocated result.

pub mod base;
pub mod dist;
pub mod error;
pub mod linalg;
pub mod lm;

// Re-exports
pub use base::{Coefficient, ModelStatistics, ModelSummary, ResidualStatistics, Result};
pub use error::ModelError;
pub use lm::{ols, DiagnosticReport, Diagnostics, LinearRegression, RegressionResult};
