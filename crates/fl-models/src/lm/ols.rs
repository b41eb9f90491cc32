//! Ordinary Least Squares (OLS) linear regression
//!
//! The estimator solves the normal equations with the determinant-gated
//! Gauss-Jordan inverse from [`crate::linalg`] and derives per-coefficient
//! inference from the hand-rolled distribution approximations in
//! [`crate::dist`]. Fitting is a pure function of the dataset and the
//! variable selection: on failure no partial result exists.

use std::collections::HashSet;

use ndarray::Array1;

use fl_core::data::{Dataset, Matrix, Vector};
use fl_core::design::DesignMatrix;

use crate::base::{
    Coefficient, ModelError, ModelStatistics, ModelSummary, ResidualStatistics, Result,
};
use crate::dist;
use crate::linalg;

// Standard errors of exact fits would otherwise be 0 and break the
// t-statistic.
const SE_FLOOR: f64 = 1e-10;

// ==================== Linear Regression Result ====================

/// OLS linear regression result
///
/// Created atomically by one successful fit, immutable afterwards, and
/// superseded wholesale by the next fit.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    /// Coefficients, intercept first
    pub coefficients: Vector,
    /// Standard errors
    pub standard_errors: Vector,
    /// t-statistics
    pub t_statistics: Vector,
    /// Two-sided p-values
    pub p_values: Vector,
    /// Fitted values
    pub fitted_values: Vector,
    /// Residuals
    pub residuals: Vector,
    /// Hat matrix diagonal (leverage)
    pub hat_diagonal: Vector,
    /// Cook's distances
    pub cooks_distance: Vector,
    /// Design matrix
    pub x: Matrix,
    /// Response vector
    pub y: Vector,
    /// Variable names, "(Intercept)" first
    pub variable_names: Vec<String>,
    /// Original dataset row index for each design row
    pub rows: Vec<usize>,
    /// Model statistics
    pub statistics: ModelStatistics,
}

impl RegressionResult {
    /// Create coefficient structs from the parallel arrays
    pub fn to_coefficients(&self) -> Vec<Coefficient> {
        self.coefficients
            .iter()
            .zip(self.standard_errors.iter())
            .zip(self.t_statistics.iter())
            .zip(self.p_values.iter())
            .enumerate()
            .map(|(i, (((&coef, &se), &t), &p))| {
                let name = self
                    .variable_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("x{}", i));

                let coefficient = Coefficient::new(name, coef)
                    .with_std_error(se)
                    .with_t_stat(t)
                    .with_p_value(p);

                if i == 0 {
                    coefficient.as_intercept()
                } else {
                    coefficient
                }
            })
            .collect()
    }
}

// ==================== Linear Regression Model ====================

/// OLS linear regression model
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Response column name
    response: String,
    /// Predictor column names, in design order
    predictors: Vec<String>,
    /// Data
    data: Option<Dataset>,
    /// Fitted result
    result: Option<RegressionResult>,
}

impl LinearRegression {
    /// Create a new linear regression model for `response ~ predictors`.
    ///
    /// The selection must name a response, at least one predictor, and no
    /// column twice.
    pub fn new<S: AsRef<str>>(response: &str, predictors: &[S]) -> Result<Self> {
        if response.is_empty() {
            return Err(ModelError::InvalidSelection {
                message: "no response variable selected".to_string(),
            });
        }
        if predictors.is_empty() {
            return Err(ModelError::InvalidSelection {
                message: "no predictor variables selected".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in predictors {
            let name = name.as_ref();
            if name == response {
                return Err(ModelError::InvalidSelection {
                    message: format!("response '{}' repeated among predictors", response),
                });
            }
            if !seen.insert(name) {
                return Err(ModelError::InvalidSelection {
                    message: format!("predictor '{}' selected twice", name),
                });
            }
        }

        Ok(Self {
            response: response.to_string(),
            predictors: predictors.iter().map(|s| s.as_ref().to_string()).collect(),
            data: None,
            result: None,
        })
    }

    /// Set data for the model
    pub fn data(mut self, data: &Dataset) -> Self {
        self.data = Some(data.clone());
        self
    }

    /// Fit the OLS model
    pub fn fit(mut self) -> Result<Self> {
        let data = self.data.as_ref().ok_or(ModelError::NoData)?;

        let design = DesignMatrix::build(data, &self.response, &self.predictors)?;
        self.result = Some(fit_design(&design)?);

        Ok(self)
    }

    /// Response column name
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Predictor column names
    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    /// Fitted result, if any
    pub fn result(&self) -> Option<&RegressionResult> {
        self.result.as_ref()
    }

    /// Get coefficients
    pub fn coefficients(&self) -> Option<&Vector> {
        self.result.as_ref().map(|r| &r.coefficients)
    }

    /// Get fitted values
    pub fn fitted_values(&self) -> Option<&Vector> {
        self.result.as_ref().map(|r| &r.fitted_values)
    }

    /// Get residuals
    pub fn residuals(&self) -> Option<&Vector> {
        self.result.as_ref().map(|r| &r.residuals)
    }

    /// Predict responses for new data using the fitted coefficients
    pub fn predict(&self, data: &Dataset) -> Result<Vector> {
        let result = self.result.as_ref().ok_or(ModelError::NotFitted)?;

        let (x, _rows) = DesignMatrix::predictor_matrix(data, &self.predictors)?;
        Ok(x.dot(&result.coefficients))
    }

    /// Get model summary
    pub fn summary(&self) -> Result<ModelSummary> {
        let result = self.result.as_ref().ok_or(ModelError::NotFitted)?;

        let residual_statistics = ResidualStatistics {
            min: result
                .residuals
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min),
            q1: quantile(&result.residuals, 0.25),
            median: quantile(&result.residuals, 0.5),
            q3: quantile(&result.residuals, 0.75),
            max: result
                .residuals
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
            mean: result.residuals.mean().unwrap_or(0.0),
            std_dev: result.residuals.std(1.0),
        };

        Ok(ModelSummary {
            response: self.response.clone(),
            n_obs: result.y.len(),
            n_predictors: result.coefficients.len(),
            coefficients: result.to_coefficients(),
            model_statistics: result.statistics,
            residual_statistics,
        })
    }
}

// ==================== Fit Pipeline ====================

/// Fit an OLS model to a prepared design matrix.
pub(crate) fn fit_design(design: &DesignMatrix) -> Result<RegressionResult> {
    let x = &design.x;
    let y = &design.y;
    let n = x.nrows();
    let p = x.ncols();

    if n <= p {
        return Err(ModelError::InsufficientData {
            n_samples: n,
            n_predictors: p,
        });
    }
    let df = n - p;

    // Normal equations
    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);

    let det = linalg::determinant(&xtx).map_err(|_| ModelError::DegenerateDesign)?;
    if det.abs() < linalg::PIVOT_TOLERANCE {
        return Err(ModelError::DegenerateDesign);
    }
    let xtx_inv = linalg::invert(&xtx).map_err(|_| ModelError::DegenerateDesign)?;

    // Coefficients: closed form for the single-regressor design, general
    // solve otherwise.
    let coefficients = if p == 2 {
        simple_coefficients(x, y)?
    } else {
        xtx_inv.dot(&xty)
    };

    let fitted_values = x.dot(&coefficients);
    let residuals = y - &fitted_values;

    let ss_res = residuals.mapv(|r| r * r).sum();
    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot = y.iter().map(|&v| (v - y_mean).powi(2)).sum::<f64>();
    if ss_tot < linalg::PIVOT_TOLERANCE {
        return Err(ModelError::DegenerateResponse {
            variable: design.response.clone(),
        });
    }

    let nf = n as f64;
    let dff = df as f64;
    let r_squared = 1.0 - ss_res / ss_tot;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / dff;
    let mse = ss_res / dff;
    let residual_std_error = mse.sqrt();

    let standard_errors: Vector = (0..p)
        .map(|i| (mse * xtx_inv[(i, i)]).sqrt().max(SE_FLOOR))
        .collect();
    let t_statistics: Vector = coefficients
        .iter()
        .zip(standard_errors.iter())
        .map(|(&coef, &se)| coef / se)
        .collect();
    let p_values: Vector = t_statistics
        .iter()
        .map(|&t| dist::p_value_two_sided(t, df))
        .collect();

    let f_statistic = (r_squared / (p as f64 - 1.0)) / ((1.0 - r_squared) / dff);

    let hat_diagonal = hat_matrix_diagonal(x, &xtx_inv);
    let cooks_distance = cooks_distances(&residuals, &hat_diagonal, p, mse);

    let mut variable_names = Vec::with_capacity(p);
    variable_names.push("(Intercept)".to_string());
    variable_names.extend(design.predictors.iter().cloned());

    let statistics = ModelStatistics {
        r_squared,
        adj_r_squared,
        mse,
        residual_std_error,
        f_statistic,
        df_residual: df,
        df_model: p - 1,
    };

    Ok(RegressionResult {
        coefficients,
        standard_errors,
        t_statistics,
        p_values,
        fitted_values,
        residuals,
        hat_diagonal,
        cooks_distance,
        x: x.clone(),
        y: y.clone(),
        variable_names,
        rows: design.rows.clone(),
        statistics,
    })
}

/// Closed-form slope/intercept for the single-regressor design. Must agree
/// with the general normal-equations solve to floating-point tolerance.
fn simple_coefficients(x: &Matrix, y: &Vector) -> Result<Vector> {
    let xs = x.column(1);
    let x_mean = xs.mean().unwrap_or(0.0);
    let y_mean = y.mean().unwrap_or(0.0);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in xs.iter().zip(y.iter()) {
        sxx += (xi - x_mean) * (xi - x_mean);
        sxy += (xi - x_mean) * (yi - y_mean);
    }

    if sxx < linalg::PIVOT_TOLERANCE {
        return Err(ModelError::DegenerateDesign);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    Ok(Array1::from(vec![intercept, slope]))
}

/// Hat matrix diagonal: `h_ii = x_i' (X'X)^{-1} x_i`
fn hat_matrix_diagonal(x: &Matrix, xtx_inv: &Matrix) -> Vector {
    let mut hat_diag = Vector::zeros(x.nrows());

    for i in 0..x.nrows() {
        let xi = x.row(i);
        hat_diag[i] = xi.dot(xtx_inv).dot(&xi);
    }

    hat_diag
}

/// Cook's distance per observation: `e²h / (p·MSE·(1−h)²)`
fn cooks_distances(residuals: &Vector, hat_diag: &Vector, p: usize, mse: f64) -> Vector {
    let pf = p as f64;
    let mut cooks = Vector::zeros(residuals.len());

    for i in 0..residuals.len() {
        let r = residuals[i];
        let h = hat_diag[i];
        let denom = pf * mse * (1.0 - h).powi(2);
        cooks[i] = if denom > 0.0 { (r * r * h) / denom } else { 0.0 };
    }

    cooks
}

/// Interpolated quantile of a vector
fn quantile(data: &Vector, q: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f64> = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let idx = (sorted.len() as f64 - 1.0) * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = idx - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
