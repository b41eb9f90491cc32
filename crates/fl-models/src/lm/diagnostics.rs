//! Linear model diagnostics
//!
//! Assumption checks for a fitted regression: linearity, normality,
//! homoscedasticity, independence, multicollinearity, and influence. Every
//! diagnostic is a pure function of a [`RegressionResult`] (plus the
//! [`Dataset`] for VIF) and degrades to a neutral default instead of
//! propagating an error; one ill-conditioned sub-computation must never
//! abort the whole report.

use serde::{Deserialize, Serialize};

use fl_core::data::{Dataset, Vector};

use crate::dist;
use crate::lm::ols::{LinearRegression, RegressionResult};

// Correlation magnitudes below this are treated as zero.
const CORR_TOLERANCE: f64 = 1e-10;

// ==================== Report Types ====================

/// Pass/warn classification of one assumption test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// The assumption looks satisfied
    Good,
    /// The assumption looks violated
    Warning,
}

/// Linearity check: residuals should be uncorrelated with fitted values
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearityTest {
    /// Pearson correlation between residuals and fitted values
    pub correlation: f64,
    pub status: TestStatus,
}

/// Shapiro-Wilk normality test on the residuals
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShapiroWilk {
    /// The W statistic (0 < W ≤ 1); values close to 1 suggest normality
    pub statistic: f64,
    pub p_value: f64,
    pub status: TestStatus,
}

/// Breusch-Pagan test for heteroscedasticity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreuschPagan {
    /// The LM statistic, `n·corr²`
    pub statistic: f64,
    pub p_value: f64,
    pub status: TestStatus,
}

/// Durbin-Watson test for residual autocorrelation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurbinWatson {
    /// The DW statistic; 2 means no autocorrelation
    pub statistic: f64,
    pub status: TestStatus,
}

/// Multicollinearity severity for one predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VifSeverity {
    /// VIF below 5
    Ok,
    /// VIF in [5, 10)
    Suspect,
    /// VIF of 10 or more
    Problem,
}

/// Variance Inflation Factor for one predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vif {
    pub variable: String,
    /// `1/(1 − R²)` of the predictor regressed on the others, floored at 1
    pub vif: f64,
    /// Reciprocal of the VIF
    pub tolerance: f64,
    pub severity: VifSeverity,
}

/// Leverage and influence for one observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InfluencePoint {
    /// Original dataset row index
    pub index: usize,
    /// Hat matrix diagonal entry
    pub leverage: f64,
    pub cooks_distance: f64,
    /// Cook's distance exceeds the report threshold
    pub high_influence: bool,
}

/// Full diagnostic report for one fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub linearity: LinearityTest,
    pub normality: ShapiroWilk,
    pub homoscedasticity: BreuschPagan,
    pub independence: DurbinWatson,
    /// One entry per predictor
    pub vif: Vec<Vif>,
    /// One entry per observation that survived the completeness filter
    pub influence: Vec<InfluencePoint>,
    /// Cook's distance flag threshold used for this report, `4/n`
    pub cooks_threshold: f64,
}

// ==================== Diagnostic Analyzer ====================

/// Diagnostic analyzer
pub struct Diagnostics;

impl Diagnostics {
    /// Run all diagnostics against a fitted model
    pub fn report(result: &RegressionResult, data: &Dataset) -> DiagnosticReport {
        let predictors: Vec<String> = result.variable_names.iter().skip(1).cloned().collect();
        let (influence, cooks_threshold) = Self::influence(result);

        DiagnosticReport {
            linearity: Self::linearity(result),
            normality: Self::shapiro_wilk(&result.residuals),
            homoscedasticity: Self::breusch_pagan(result),
            independence: Self::durbin_watson(&result.residuals),
            vif: Self::vif(data, &predictors),
            influence,
            cooks_threshold,
        }
    }

    /// Pearson correlation between residuals and fitted values; the
    /// relationship is linear when the two are uncorrelated.
    pub fn linearity(result: &RegressionResult) -> LinearityTest {
        let correlation = pearson(&result.residuals, &result.fitted_values);
        let status = if correlation.abs() < 0.3 {
            TestStatus::Good
        } else {
            TestStatus::Warning
        };
        LinearityTest {
            correlation,
            status,
        }
    }

    /// Shapiro-Wilk normality test.
    ///
    /// Tabulated weight coefficients where available, a quantile-based
    /// approximation otherwise; the p-value comes from tabulated critical
    /// bands for n ≤ 11 and from a normal approximation of the sampling
    /// distribution of W above that.
    pub fn shapiro_wilk(residuals: &Vector) -> ShapiroWilk {
        let n = residuals.len();

        let mut sorted: Vec<f64> = residuals.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Too few points, or no spread: nothing to test.
        if n < 3 || sorted[n - 1] - sorted[0] < CORR_TOLERANCE {
            return ShapiroWilk {
                statistic: 1.0,
                p_value: 1.0,
                status: TestStatus::Good,
            };
        }

        let statistic = match sw_weights(n) {
            Some(weights) => sw_statistic_tabulated(&sorted, weights),
            None => sw_statistic_quantile(&sorted),
        };

        let p_value = if n <= 11 {
            sw_p_from_critical(statistic, n)
        } else {
            sw_p_normal_approx(statistic, n)
        };

        let status = if p_value > 0.05 {
            TestStatus::Good
        } else {
            TestStatus::Warning
        };

        ShapiroWilk {
            statistic,
            p_value,
            status,
        }
    }

    /// Breusch-Pagan test: squared residuals regressed against the fitted
    /// values through their correlation, `LM = n·corr²` against χ²(1).
    pub fn breusch_pagan(result: &RegressionResult) -> BreuschPagan {
        let n = result.residuals.len();
        let squared = result.residuals.mapv(|r| r * r);
        let corr = pearson(&squared, &result.fitted_values);

        let statistic = n as f64 * corr * corr;
        let p_value = 1.0 - dist::chi_square_cdf(statistic, 1);
        let status = if p_value > 0.05 {
            TestStatus::Good
        } else {
            TestStatus::Warning
        };

        BreuschPagan {
            statistic,
            p_value,
            status,
        }
    }

    /// Durbin-Watson statistic, `Σ(eᵢ−eᵢ₋₁)²/Σeᵢ²`; values near 2 mean
    /// uncorrelated residuals.
    pub fn durbin_watson(residuals: &Vector) -> DurbinWatson {
        let n = residuals.len();

        let mut sum_sq_diff = 0.0;
        for i in 1..n {
            let diff = residuals[i] - residuals[i - 1];
            sum_sq_diff += diff * diff;
        }
        let sum_sq: f64 = residuals.iter().map(|&r| r * r).sum();

        // No residual variance: report the neutral value.
        let statistic = if sum_sq < CORR_TOLERANCE {
            2.0
        } else {
            sum_sq_diff / sum_sq
        };

        let status = if (1.5..=2.5).contains(&statistic) {
            TestStatus::Good
        } else {
            TestStatus::Warning
        };

        DurbinWatson { statistic, status }
    }

    /// Variance Inflation Factors.
    ///
    /// Each predictor is regressed on the remaining predictors by a nested
    /// [`LinearRegression`] call; a degenerate sub-regression (or a single
    /// predictor) yields the neutral VIF of 1.
    pub fn vif(data: &Dataset, predictors: &[String]) -> Vec<Vif> {
        predictors
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let others: Vec<&str> = predictors
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != j)
                    .map(|(_, other)| other.as_str())
                    .collect();

                let vif = if others.is_empty() {
                    1.0
                } else {
                    nested_vif(data, name, &others)
                };

                let severity = if vif >= 10.0 {
                    VifSeverity::Problem
                } else if vif >= 5.0 {
                    VifSeverity::Suspect
                } else {
                    VifSeverity::Ok
                };

                Vif {
                    variable: name.clone(),
                    vif,
                    tolerance: 1.0 / vif,
                    severity,
                }
            })
            .collect()
    }

    /// Per-observation leverage and Cook's distance, flagged against the
    /// `4/n` threshold.
    pub fn influence(result: &RegressionResult) -> (Vec<InfluencePoint>, f64) {
        let n = result.residuals.len();
        let threshold = 4.0 / n as f64;

        let points = (0..n)
            .map(|i| InfluencePoint {
                index: result.rows.get(i).copied().unwrap_or(i),
                leverage: result.hat_diagonal[i],
                cooks_distance: result.cooks_distance[i],
                high_influence: result.cooks_distance[i] > threshold,
            })
            .collect();

        (points, threshold)
    }
}

/// VIF of one predictor against the others; degenerate fits degrade to 1.
fn nested_vif(data: &Dataset, name: &str, others: &[&str]) -> f64 {
    let fitted = match LinearRegression::new(name, others).and_then(|m| m.data(data).fit()) {
        Ok(fitted) => fitted,
        Err(_) => return 1.0,
    };

    let r_squared = match fitted.result() {
        Some(result) => result.statistics.r_squared,
        None => return 1.0,
    };

    let remainder = 1.0 - r_squared;
    if remainder < CORR_TOLERANCE {
        f64::INFINITY
    } else {
        (1.0 / remainder).max(1.0)
    }
}

/// Pearson correlation; 0 when either side has no variance.
fn pearson(a: &Vector, b: &Vector) -> f64 {
    let n = a.len();
    if n < 2 || n != b.len() {
        return 0.0;
    }

    let a_mean = a.mean().unwrap_or(0.0);
    let b_mean = b.mean().unwrap_or(0.0);

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&ai, &bi) in a.iter().zip(b.iter()) {
        let da = ai - a_mean;
        let db = bi - b_mean;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a < CORR_TOLERANCE || var_b < CORR_TOLERANCE {
        0.0
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

// ==================== Shapiro-Wilk machinery ====================

// Shapiro-Wilk weight coefficients a_1..a_{n/2}, keyed by n = 3..=12.
const SW_WEIGHTS: [&[f64]; 10] = [
    &[0.7071],
    &[0.6872, 0.1677],
    &[0.6646, 0.2413],
    &[0.6431, 0.2806, 0.0875],
    &[0.6233, 0.3031, 0.1401],
    &[0.6052, 0.3164, 0.1743, 0.0561],
    &[0.5888, 0.3244, 0.1976, 0.0947],
    &[0.5739, 0.3291, 0.2141, 0.1224, 0.0399],
    &[0.5601, 0.3315, 0.2260, 0.1429, 0.0695],
    &[0.5475, 0.3325, 0.2347, 0.1586, 0.0922, 0.0303],
];

// Critical W values per sample size (rows: n = 3..=11) at the significance
// bands in SW_ALPHAS.
const SW_ALPHAS: [f64; 4] = [0.05, 0.025, 0.005, 0.001];
const SW_CRITICAL: [[f64; 4]; 9] = [
    [0.767, 0.758, 0.751, 0.749],
    [0.748, 0.712, 0.674, 0.656],
    [0.762, 0.721, 0.669, 0.644],
    [0.788, 0.748, 0.696, 0.670],
    [0.803, 0.765, 0.714, 0.689],
    [0.818, 0.782, 0.733, 0.709],
    [0.829, 0.795, 0.748, 0.724],
    [0.842, 0.810, 0.765, 0.742],
    [0.850, 0.820, 0.776, 0.754],
];

fn sw_weights(n: usize) -> Option<&'static [f64]> {
    if (3..=12).contains(&n) {
        Some(SW_WEIGHTS[n - 3])
    } else {
        None
    }
}

// W = (Σ a_i (x_{n+1−i} − x_i))² / Σ(x − x̄)², from the tabulated weights.
fn sw_statistic_tabulated(sorted: &[f64], weights: &[f64]) -> f64 {
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let ss: f64 = sorted.iter().map(|&v| (v - mean).powi(2)).sum();

    let mut b = 0.0;
    for (i, &a) in weights.iter().enumerate() {
        b += a * (sorted[n - 1 - i] - sorted[i]);
    }

    ((b * b) / ss).min(1.0)
}

// Quantile-based fallback: Blom scores for the expected normal order
// statistics, normalized to unit length.
fn sw_statistic_quantile(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let nf = n as f64;

    let mut m: Vec<f64> = (0..n)
        .map(|i| dist::inverse_normal_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect();
    let norm = m.iter().map(|v| v * v).sum::<f64>().sqrt();
    for v in &mut m {
        *v /= norm;
    }

    let mean = sorted.iter().sum::<f64>() / nf;
    let ss: f64 = sorted.iter().map(|&v| (v - mean).powi(2)).sum();
    let b: f64 = m.iter().zip(sorted.iter()).map(|(&a, &v)| a * v).sum();

    ((b * b) / ss).min(1.0)
}

// p-value from the tabulated critical bands, interpolating between
// adjacent significance levels.
fn sw_p_from_critical(w: f64, n: usize) -> f64 {
    let crit = &SW_CRITICAL[n - 3];

    if w >= crit[0] {
        // Above the 5% point: stretch linearly up to W = 1.
        let span = 1.0 - crit[0];
        if span <= 0.0 {
            return 1.0;
        }
        (0.05 + 0.95 * (w - crit[0]) / span).min(1.0)
    } else {
        for k in 0..3 {
            if w >= crit[k + 1] {
                let frac = (w - crit[k + 1]) / (crit[k] - crit[k + 1]);
                return SW_ALPHAS[k + 1] + frac * (SW_ALPHAS[k] - SW_ALPHAS[k + 1]);
            }
        }
        // Below the 0.1% point
        (0.001 * (w / crit[3])).max(0.0)
    }
}

// Normal approximation of the sampling distribution of ln(1 − W) for
// n > 11 (Royston's coefficients).
fn sw_p_normal_approx(w: f64, n: usize) -> f64 {
    if w >= 1.0 {
        return 1.0;
    }

    let ln_n = (n as f64).ln();
    let mu = -1.5861 - 0.31082 * ln_n - 0.083751 * ln_n * ln_n + 0.0038915 * ln_n.powi(3);
    let sigma = (-0.4803 - 0.082676 * ln_n + 0.0030302 * ln_n * ln_n).exp();

    let z = ((1.0 - w).ln() - mu) / sigma;
    (1.0 - dist::normal_cdf(z)).clamp(0.0, 1.0)
}
