//! Column-wise preprocessing transforms
//!
//! Three independent, composable transforms applied to the selected columns
//! before fitting. When several are enabled the order is fixed:
//! outlier removal, then standardization, then normalization.

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Result};

// Matches the scaling guard in the estimator: a spread below this is
// treated as zero and the transform becomes a no-op.
const SPREAD_TOLERANCE: f64 = 1e-10;

/// Which transforms to apply before fitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Drop rows with a value outside the 1.5·IQR fence in any selected column
    pub remove_outliers: bool,
    /// Rescale each selected column to mean 0, standard deviation 1
    pub standardize: bool,
    /// Rescale each selected column to the [0, 1] range
    pub normalize: bool,
}

/// Apply the configured transforms to `columns` of `data`, in the fixed
/// order. Unselected columns pass through (filtered to surviving rows when
/// outlier removal drops any).
pub fn apply(data: &Dataset, columns: &[&str], config: &PreprocessConfig) -> Result<Dataset> {
    let mut out = data.clone();
    if config.remove_outliers {
        out = remove_outliers(&out, columns)?;
    }
    if config.standardize {
        out = standardize(&out, columns)?;
    }
    if config.normalize {
        out = normalize(&out, columns)?;
    }
    Ok(out)
}

/// Drop every row where any selected column holds a present value outside
/// `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]` for that column. Quartiles come from a
/// sorted copy of the column's present values; missing entries never
/// trigger a drop.
pub fn remove_outliers(data: &Dataset, columns: &[&str]) -> Result<Dataset> {
    let mut mask = vec![true; data.nrows()];

    for &name in columns {
        let col = data.require_column(name)?;
        let (q1, q3) = match (col.quantile(0.25), col.quantile(0.75)) {
            (Some(q1), Some(q3)) => (q1, q3),
            _ => continue,
        };
        let iqr = q3 - q1;
        let lo = q1 - 1.5 * iqr;
        let hi = q3 + 1.5 * iqr;

        for (i, keep) in mask.iter_mut().enumerate() {
            if let Some(v) = col.get(i) {
                if v < lo || v > hi {
                    *keep = false;
                }
            }
        }
    }

    data.filter(&mask)
}

/// Rescale each selected column to `(x − mean)/sd`; no-op when sd is zero.
pub fn standardize(data: &Dataset, columns: &[&str]) -> Result<Dataset> {
    let mut out = data.clone();

    for &name in columns {
        let col = out.require_column(name)?;
        let (mean, sd) = match (col.mean(), col.std_dev()) {
            (Some(mean), Some(sd)) => (mean, sd),
            _ => continue,
        };
        if sd < SPREAD_TOLERANCE {
            continue;
        }
        let scaled = col.map_present(|v| (v - mean) / sd);
        out.replace_column(name, scaled)?;
    }

    Ok(out)
}

/// Rescale each selected column to `(x − min)/(max − min)`; no-op when the
/// column has zero range.
pub fn normalize(data: &Dataset, columns: &[&str]) -> Result<Dataset> {
    let mut out = data.clone();

    for &name in columns {
        let col = out.require_column(name)?;
        let (min, max) = match (col.min(), col.max()) {
            (Some(min), Some(max)) => (min, max),
            _ => continue,
        };
        let range = max - min;
        if range < SPREAD_TOLERANCE {
            continue;
        }
        let scaled = col.map_present(|v| (v - min) / range);
        out.replace_column(name, scaled)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetBuilder;
    use approx::assert_abs_diff_eq;

    fn dataset(values: Vec<f64>) -> Dataset {
        DatasetBuilder::new()
            .with_values("x", values)
            .unwrap()
            .build()
    }

    #[test]
    fn outlier_rows_are_dropped() {
        // 100.0 sits far outside the IQR fence of the remaining points.
        let data = dataset(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 100.0]);
        let trimmed = remove_outliers(&data, &["x"]).unwrap();

        assert_eq!(trimmed.nrows(), 7);
        assert_abs_diff_eq!(trimmed.column("x").unwrap().max().unwrap(), 7.0);
    }

    #[test]
    fn outlier_filter_ignores_missing_entries() {
        let data = dataset(vec![1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0]);
        let trimmed = remove_outliers(&data, &["x"]).unwrap();
        assert_eq!(trimmed.nrows(), 6);
    }

    #[test]
    fn standardize_centers_and_scales() {
        let data = dataset(vec![2.0, 4.0, 6.0, 8.0]);
        let out = standardize(&data, &["x"]).unwrap();
        let col = out.column("x").unwrap();

        assert_abs_diff_eq!(col.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(col.std_dev().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn standardize_is_noop_for_constant_column() {
        let data = dataset(vec![3.0, 3.0, 3.0]);
        let out = standardize(&data, &["x"]).unwrap();
        assert_abs_diff_eq!(out.column("x").unwrap().values()[1], 3.0);
    }

    #[test]
    fn normalize_maps_to_unit_range() {
        let data = dataset(vec![10.0, 20.0, 30.0]);
        let out = normalize(&data, &["x"]).unwrap();
        let col = out.column("x").unwrap();

        assert_abs_diff_eq!(col.min().unwrap(), 0.0);
        assert_abs_diff_eq!(col.max().unwrap(), 1.0);
        assert_abs_diff_eq!(col.values()[1], 0.5);
    }

    #[test]
    fn normalize_is_noop_for_zero_range() {
        let data = dataset(vec![5.0, 5.0]);
        let out = normalize(&data, &["x"]).unwrap();
        assert_abs_diff_eq!(out.column("x").unwrap().values()[0], 5.0);
    }

    #[test]
    fn transforms_compose_in_fixed_order() {
        let config = PreprocessConfig {
            remove_outliers: true,
            standardize: true,
            normalize: true,
        };
        let data = dataset(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 100.0]);
        let out = apply(&data, &["x"], &config).unwrap();
        let col = out.column("x").unwrap();

        // Outlier dropped first, then the scaled column lands on [0, 1].
        assert_eq!(out.nrows(), 7);
        assert_abs_diff_eq!(col.min().unwrap(), 0.0);
        assert_abs_diff_eq!(col.max().unwrap(), 1.0);
    }

    #[test]
    fn disabled_config_is_identity() {
        let data = dataset(vec![1.0, 2.0, 3.0]);
        let out = apply(&data, &["x"], &PreprocessConfig::default()).unwrap();
        assert_eq!(out.nrows(), 3);
        assert_abs_diff_eq!(out.column("x").unwrap().values()[2], 3.0);
    }
}
