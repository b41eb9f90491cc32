//! Numeric column storage
//!
//! A Column is a one-dimensional array of `f64` values. Missing entries are
//! encoded as NaN at construction time; every statistic is computed over the
//! present (finite) values only.

use super::*;

/// A single numeric column of a [`Dataset`].
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    values: FloatArray,
}

/// Summary statistics over the present values of a column
#[derive(Clone, Copy, Debug)]
pub struct ColumnStats {
    /// Number of present (finite) values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum
    pub max: f64,
}

impl Column {
    /// Create a column from fully observed values.
    ///
    /// Non-finite inputs are treated as missing downstream.
    pub fn from_values(data: impl Into<FloatArray>) -> Self {
        Self { values: data.into() }
    }

    /// Create a column from optional values; `None` becomes a missing entry.
    pub fn from_optional(data: Vec<Option<f64>>) -> Self {
        let values: FloatArray = data.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Self { values }
    }

    /// Length of the column, missing entries included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no entries at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value at `idx`; `None` when out of range or missing
    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied().filter(|v| v.is_finite())
    }

    /// Whether the entry at `idx` is present
    pub fn is_present(&self, idx: usize) -> bool {
        self.get(idx).is_some()
    }

    /// Raw storage, missing entries as NaN
    pub fn values(&self) -> &FloatArray {
        &self.values
    }

    /// Iterate over the present values in order
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }

    /// Keep the rows where `mask` is true
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.len()),
                actual: format!("mask length {}", mask.len()),
            });
        }

        let filtered: FloatArray = self
            .values
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(&v, _)| v)
            .collect();

        Ok(Self { values: filtered })
    }

    /// Apply `f` to every present value; missing entries stay missing
    pub fn map_present<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let values = self
            .values
            .mapv(|v| if v.is_finite() { f(v) } else { f64::NAN });
        Self { values }
    }

    /// Mean of the present values
    pub fn mean(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in self.present() {
            sum += v;
            count += 1;
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Sample standard deviation of the present values
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let mut ss = 0.0;
        let mut count = 0usize;
        for v in self.present() {
            ss += (v - mean) * (v - mean);
            count += 1;
        }
        if count < 2 {
            return Some(0.0);
        }
        Some((ss / (count as f64 - 1.0)).sqrt())
    }

    /// Minimum present value
    pub fn min(&self) -> Option<f64> {
        self.present().reduce(f64::min)
    }

    /// Maximum present value
    pub fn max(&self) -> Option<f64> {
        self.present().reduce(f64::max)
    }

    /// Interpolated quantile of the present values, `q` in [0, 1]
    pub fn quantile(&self, q: f64) -> Option<f64> {
        let mut sorted: Vec<f64> = self.present().collect();
        if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let idx = (sorted.len() as f64 - 1.0) * q;
        let lower = idx.floor() as usize;
        let upper = idx.ceil() as usize;

        if lower == upper {
            Some(sorted[lower])
        } else {
            let weight = idx - lower as f64;
            Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
        }
    }

    /// Summary statistics; `None` when the column has no present values
    pub fn stats(&self) -> Option<ColumnStats> {
        Some(ColumnStats {
            count: self.present().count(),
            mean: self.mean()?,
            std: self.std_dev()?,
            min: self.min()?,
            q1: self.quantile(0.25)?,
            median: self.quantile(0.5)?,
            q3: self.quantile(0.75)?,
            max: self.max()?,
        })
    }
}

impl From<Vec<f64>> for Column {
    fn from(data: Vec<f64>) -> Self {
        Self::from_values(data)
    }
}
