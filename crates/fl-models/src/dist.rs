//! Probability distribution approximations
//!
//! Closed-form approximations to the standard normal, Student t, and
//! chi-square distributions. The engine has no statistics-library
//! dependency; each function keeps to one approximation family so that
//! downstream tolerances stay meaningful. Exact agreement with a reference
//! statistics library is not a goal.

use std::f64::consts::PI;

// Beasley-Springer central-region rational coefficients
const BSM_A: [f64; 4] = [
    2.50662823884,
    -18.61500062529,
    41.39119773534,
    -25.44106049637,
];
const BSM_B: [f64; 4] = [
    -8.47351093090,
    23.08336743743,
    -21.06224101826,
    3.13082909833,
];
// Moro tail polynomial coefficients
const MORO_C: [f64; 9] = [
    0.3374754822726147,
    0.9761690190917186,
    0.1607979714918209,
    0.0276438810333863,
    0.0038405729373609,
    0.0003951896511919,
    0.0000321767881768,
    0.0000002888167364,
    0.0000003960315187,
];

/// Standard-normal quantile.
///
/// Beasley-Springer-Moro approximation: a rational polynomial on the
/// central region, Moro's log-log polynomial on the low and high tails.
/// Returns `-INFINITY` for p ≤ 0 and `INFINITY` for p ≥ 1.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let x = p - 0.5;
    if x.abs() < 0.42 {
        // Central region
        let r = x * x;
        let num = x * (((BSM_A[3] * r + BSM_A[2]) * r + BSM_A[1]) * r + BSM_A[0]);
        let den = (((BSM_B[3] * r + BSM_B[2]) * r + BSM_B[1]) * r + BSM_B[0]) * r + 1.0;
        return num / den;
    }

    // Low or high tail
    let tail = if x > 0.0 { 1.0 - p } else { p };
    let r = (-tail.ln()).ln();
    let mut z = MORO_C[8];
    for c in MORO_C[..8].iter().rev() {
        z = z * r + c;
    }
    if x > 0.0 { z } else { -z }
}

/// Standard-normal CDF.
///
/// Logistic-style closed form with a cubic term in the exponent; reused by
/// the t and chi-square approximations for large degrees of freedom.
pub fn normal_cdf(z: f64) -> f64 {
    1.0 / (1.0 + (-(0.07056 * z * z * z + 1.5976 * z)).exp())
}

/// Student-t CDF.
///
/// Degrees of freedom above 30 delegate to the normal approximation; small
/// df go through the incomplete-beta relation `I_x(df/2, 1/2)` with
/// `x = df/(df + t²)`.
pub fn t_cdf(t: f64, df: usize) -> f64 {
    if df == 0 {
        return f64::NAN;
    }
    if df > 30 {
        return normal_cdf(t);
    }

    let dff = df as f64;
    let x = dff / (dff + t * t);
    let tail = 0.5 * incomplete_beta(0.5 * dff, 0.5, x);

    if t > 0.0 {
        1.0 - tail
    } else if t < 0.0 {
        tail
    } else {
        0.5
    }
}

/// Two-sided p-value for a t-statistic: `2·(1 − t_cdf(|t|, df))`.
pub fn p_value_two_sided(t: f64, df: usize) -> f64 {
    (2.0 * (1.0 - t_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

/// Chi-square CDF.
///
/// Returns 0 for x ≤ 0 or df = 0. Degrees of freedom above 30 use the
/// `sqrt(2x) − sqrt(2·df − 1)` normal approximation; smaller df evaluate
/// the regularized lower incomplete gamma `P(df/2, x/2)`.
pub fn chi_square_cdf(x: f64, df: usize) -> f64 {
    if x <= 0.0 || df == 0 {
        return 0.0;
    }
    if df > 30 {
        let z = (2.0 * x).sqrt() - (2.0 * df as f64 - 1.0).sqrt();
        return normal_cdf(z);
    }
    gamma_p(0.5 * df as f64, 0.5 * x)
}

// ==================== Special-function helpers ====================

/// Log-gamma via the Stirling series, shifting small arguments up through
/// `Γ(x) = Γ(x+1)/x` first.
fn ln_gamma(x: f64) -> f64 {
    let mut x = x;
    let mut shift = 0.0;
    while x < 7.0 {
        shift -= x.ln();
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    let series = inv / 12.0 - inv * inv2 / 360.0 + inv * inv2 * inv2 / 1260.0;

    shift + 0.5 * ((2.0 * PI).ln() - x.ln()) + x * (x.ln() - 1.0) + series
}

/// Regularized incomplete beta `I_x(a, b)` by continued fraction.
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b)
        + a * x.ln()
        + b * (1.0 - x).ln())
    .exp();

    // The continued fraction converges fastest below the symmetry point.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

// Lentz's algorithm for the incomplete-beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-12;
    const TINY: f64 = 1e-30;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let mf = m as f64;
        let m2 = 2.0 * mf;

        let aa = mf * (b - mf) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + mf) * (qab + mf) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Regularized lower incomplete gamma `P(a, x)`: series expansion below
/// `a + 1`, continued fraction for the complement above it.
fn gamma_p(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        gamma_p_series(a, x)
    } else {
        1.0 - gamma_q_continued_fraction(a, x)
    }
}

fn gamma_p_series(a: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-12;

    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut term = sum;

    for _ in 0..MAX_ITER {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * EPS {
            break;
        }
    }

    (sum * (-x + a * x.ln() - ln_gamma(a)).exp()).clamp(0.0, 1.0)
}

fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-12;
    const TINY: f64 = 1e-30;

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    ((-x + a * x.ln() - ln_gamma(a)).exp() * h).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn inverse_normal_cdf_center_and_symmetry() {
        assert_abs_diff_eq!(inverse_normal_cdf(0.5), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            inverse_normal_cdf(0.25),
            -inverse_normal_cdf(0.75),
            epsilon = 1e-9
        );
    }

    #[test]
    fn inverse_normal_cdf_known_quantiles() {
        assert_abs_diff_eq!(inverse_normal_cdf(0.975), 1.959964, epsilon = 1e-6);
        assert_abs_diff_eq!(inverse_normal_cdf(0.025), -1.959964, epsilon = 1e-6);
        // Tail region
        assert_abs_diff_eq!(inverse_normal_cdf(0.999), 3.090232, epsilon = 1e-5);
        assert_abs_diff_eq!(inverse_normal_cdf(0.001), -3.090232, epsilon = 1e-5);
    }

    #[test]
    fn inverse_normal_cdf_open_interval_boundaries() {
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(-0.1), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
    }

    #[test]
    fn normal_cdf_spot_checks() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_cdf(1.96), 0.975, epsilon = 5e-3);
        assert_abs_diff_eq!(normal_cdf(-1.96), 0.025, epsilon = 5e-3);
        assert!(normal_cdf(10.0) > 0.9999);
        assert!(normal_cdf(-10.0) < 1e-4);
    }

    #[test]
    fn t_cdf_small_df() {
        assert_abs_diff_eq!(t_cdf(0.0, 10), 0.5, epsilon = 1e-12);
        // Exact value 0.963306 (df = 10)
        assert_abs_diff_eq!(t_cdf(2.0, 10), 0.963306, epsilon = 2e-3);
        assert_abs_diff_eq!(t_cdf(-2.0, 10) + t_cdf(2.0, 10), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn t_cdf_large_df_uses_normal_branch() {
        assert_abs_diff_eq!(t_cdf(1.0, 100), normal_cdf(1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(t_cdf(1.0, 100), 0.8413, epsilon = 5e-3);
    }

    #[test]
    fn p_value_two_sided_recovers_critical_point() {
        // t = 2.228 is the 5% two-sided critical value at df = 10.
        assert_abs_diff_eq!(p_value_two_sided(2.228, 10), 0.05, epsilon = 2e-3);
        assert_abs_diff_eq!(p_value_two_sided(-2.228, 10), 0.05, epsilon = 2e-3);
        assert_abs_diff_eq!(p_value_two_sided(0.0, 10), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn chi_square_cdf_domain_edges() {
        assert_eq!(chi_square_cdf(0.0, 5), 0.0);
        assert_eq!(chi_square_cdf(-1.0, 5), 0.0);
        assert_eq!(chi_square_cdf(1.0, 0), 0.0);
    }

    #[test]
    fn chi_square_cdf_known_quantiles() {
        // 3.841 is the 95th percentile at df = 1.
        assert_abs_diff_eq!(chi_square_cdf(3.841, 1), 0.95, epsilon = 2e-3);
        // 11.07 is the 95th percentile at df = 5.
        assert_abs_diff_eq!(chi_square_cdf(11.07, 5), 0.95, epsilon = 2e-3);
    }

    #[test]
    fn chi_square_cdf_large_df_normal_branch() {
        // At df = 40 the mean of the distribution sits near CDF 0.5.
        let mid = chi_square_cdf(40.0, 40);
        assert!(mid > 0.45 && mid < 0.60);
        assert!(chi_square_cdf(100.0, 40) > 0.99);
    }

    #[test]
    fn ln_gamma_matches_factorials() {
        // Γ(5) = 24, Γ(0.5) = sqrt(π)
        assert_abs_diff_eq!(ln_gamma(5.0), 24.0_f64.ln(), epsilon = 1e-9);
        assert_abs_diff_eq!(ln_gamma(0.5), PI.sqrt().ln(), epsilon = 1e-9);
    }
}
