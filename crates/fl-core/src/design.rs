//! Design matrix construction
//!
//! Builds the regression input from a [`Dataset`]: one response vector and a
//! predictor matrix with a leading intercept column. Rows with a missing
//! value in any selected column are dropped, and the surviving original row
//! indices are kept so per-observation results can be mapped back.

use ndarray::{Array1, Array2};

use crate::data::{Dataset, Matrix, Result, Vector};

/// Regression inputs derived from a dataset and a variable selection
#[derive(Clone, Debug)]
pub struct DesignMatrix {
    /// n×p predictor matrix, intercept column first
    pub x: Matrix,
    /// Response vector, length n
    pub y: Vector,
    /// Response column name
    pub response: String,
    /// Predictor column names, in design-matrix order (after the intercept)
    pub predictors: Vec<String>,
    /// Original dataset row index for each design row
    pub rows: Vec<usize>,
}

impl DesignMatrix {
    /// Build the design matrix for `response ~ predictors` over `data`.
    ///
    /// Unknown column names fail with [`DataError::ColumnNotFound`].
    pub fn build(data: &Dataset, response: &str, predictors: &[String]) -> Result<Self> {
        let mut selected: Vec<&str> = Vec::with_capacity(predictors.len() + 1);
        selected.push(response);
        selected.extend(predictors.iter().map(|s| s.as_str()));

        let rows = complete_rows(data, &selected)?;
        let n = rows.len();
        let p = predictors.len() + 1;

        let y_col = data.require_column(response)?;
        let y = Array1::from_iter(rows.iter().map(|&i| y_col.values()[i]));

        let mut x = Array2::ones((n, p));
        for (j, name) in predictors.iter().enumerate() {
            let col = data.require_column(name)?;
            for (r, &i) in rows.iter().enumerate() {
                x[(r, j + 1)] = col.values()[i];
            }
        }

        Ok(Self {
            x,
            y,
            response: response.to_string(),
            predictors: predictors.to_vec(),
            rows,
        })
    }

    /// Build only the predictor matrix (intercept included) for new data,
    /// e.g. when predicting from a fitted model. Returns the matrix and the
    /// surviving original row indices.
    pub fn predictor_matrix(data: &Dataset, predictors: &[String]) -> Result<(Matrix, Vec<usize>)> {
        let selected: Vec<&str> = predictors.iter().map(|s| s.as_str()).collect();
        let rows = complete_rows(data, &selected)?;
        let n = rows.len();

        let mut x = Array2::ones((n, predictors.len() + 1));
        for (j, name) in predictors.iter().enumerate() {
            let col = data.require_column(name)?;
            for (r, &i) in rows.iter().enumerate() {
                x[(r, j + 1)] = col.values()[i];
            }
        }
        Ok((x, rows))
    }

    /// Number of design rows (observations surviving the completeness filter)
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of design columns (predictors plus intercept)
    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }
}

/// Indices of the rows where every selected column has a present value
fn complete_rows(data: &Dataset, selected: &[&str]) -> Result<Vec<usize>> {
    let mask = data.complete_mask(selected)?;
    Ok(mask
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(i, _)| i)
        .collect())
}
