//! Dense matrix routines for the regression solver
//!
//! Determinant and inversion are implemented directly with Gauss-Jordan
//! elimination and partial pivoting; the engine carries no LAPACK backend.
//! Matrix products stay on [`ndarray`]'s `dot`.

use thiserror::Error;

use fl_core::data::Matrix;

/// Pivot magnitudes below this are treated as zero: the matrix is singular.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Errors from the matrix routines
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LinAlgError {
    /// A pivot fell below [`PIVOT_TOLERANCE`]; callers must treat this as a
    /// hard stop, not a retry.
    #[error("matrix is singular or nearly singular")]
    Singular,

    /// The operation requires a square matrix
    #[error("matrix must be square, got {rows}×{cols}")]
    NotSquare {
        /// Row count of the offending matrix
        rows: usize,
        /// Column count of the offending matrix
        cols: usize,
    },
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, LinAlgError>;

/// Determinant of a square matrix.
///
/// Orders 1–3 use the closed-form expansions; larger matrices go through
/// Gaussian elimination with partial pivoting, flipping the sign once per
/// row swap. Returns exactly 0.0 as soon as a pivot falls below
/// [`PIVOT_TOLERANCE`].
pub fn determinant(m: &Matrix) -> Result<f64> {
    let n = check_square(m)?;

    match n {
        0 => Ok(1.0),
        1 => Ok(m[(0, 0)]),
        2 => Ok(m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]),
        3 => Ok(m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])),
        _ => Ok(determinant_by_elimination(m, n)),
    }
}

fn determinant_by_elimination(m: &Matrix, n: usize) -> f64 {
    let mut a = m.clone();
    let mut det = 1.0;

    for col in 0..n {
        let pivot_row = largest_pivot(&a, col, n);
        if a[(pivot_row, col)].abs() < PIVOT_TOLERANCE {
            return 0.0;
        }
        if pivot_row != col {
            swap_rows(&mut a, col, pivot_row);
            det = -det;
        }

        let pivot = a[(col, col)];
        det *= pivot;

        for r in (col + 1)..n {
            let factor = a[(r, col)] / pivot;
            for c in col..n {
                a[(r, c)] -= factor * a[(col, c)];
            }
        }
    }

    det
}

/// Inverse of a square matrix via Gauss-Jordan elimination on `[M | I]`,
/// with the same partial-pivoting rule as [`determinant`]. A pivot below
/// [`PIVOT_TOLERANCE`] is [`LinAlgError::Singular`].
pub fn invert(m: &Matrix) -> Result<Matrix> {
    let n = check_square(m)?;

    // Augmented matrix [M | I]
    let mut aug = Matrix::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[(i, j)] = m[(i, j)];
        }
        aug[(i, i + n)] = 1.0;
    }

    for col in 0..n {
        let pivot_row = largest_pivot(&aug, col, n);
        if aug[(pivot_row, col)].abs() < PIVOT_TOLERANCE {
            return Err(LinAlgError::Singular);
        }
        if pivot_row != col {
            swap_rows(&mut aug, col, pivot_row);
        }

        let pivot = aug[(col, col)];
        for j in 0..(2 * n) {
            aug[(col, j)] /= pivot;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = aug[(r, col)];
            for j in 0..(2 * n) {
                aug[(r, j)] -= factor * aug[(col, j)];
            }
        }
    }

    let mut inverse = Matrix::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inverse[(i, j)] = aug[(i, j + n)];
        }
    }
    Ok(inverse)
}

fn check_square(m: &Matrix) -> Result<usize> {
    if m.nrows() != m.ncols() {
        return Err(LinAlgError::NotSquare {
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(m.nrows())
}

// Row with the largest-magnitude entry in `col`, searching from `col` down.
fn largest_pivot(a: &Matrix, col: usize, n: usize) -> usize {
    let mut best = col;
    let mut max = a[(col, col)].abs();
    for r in (col + 1)..n {
        if a[(r, col)].abs() > max {
            best = r;
            max = a[(r, col)].abs();
        }
    }
    best
}

fn swap_rows(a: &mut Matrix, i: usize, j: usize) {
    for c in 0..a.ncols() {
        let tmp = a[(i, c)];
        a[(i, c)] = a[(j, c)];
        a[(j, c)] = tmp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn determinant_of_identity_is_one() {
        let m = array![[1.0, 0.0], [0.0, 1.0]];
        assert_abs_diff_eq!(determinant(&m).unwrap(), 1.0);
    }

    #[test]
    fn invert_identity_is_identity() {
        let m = array![[1.0, 0.0], [0.0, 1.0]];
        let inv = invert(&m).unwrap();
        assert_abs_diff_eq!(inv[(0, 0)], 1.0);
        assert_abs_diff_eq!(inv[(0, 1)], 0.0);
        assert_abs_diff_eq!(inv[(1, 0)], 0.0);
        assert_abs_diff_eq!(inv[(1, 1)], 1.0);
    }

    #[test]
    fn determinant_closed_forms() {
        assert_abs_diff_eq!(determinant(&array![[3.0]]).unwrap(), 3.0);
        assert_abs_diff_eq!(determinant(&array![[4.0, 7.0], [2.0, 6.0]]).unwrap(), 10.0);
        let m3 = array![[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 1.0]];
        // expansion along the first row: 2·(3−2) − 0 + 1·(1−3) = 0
        assert_abs_diff_eq!(determinant(&m3).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn determinant_by_elimination_matches_diagonal() {
        let m = array![
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 3.0, 0.0],
            [0.0, 0.0, 0.0, 4.0],
        ];
        assert_abs_diff_eq!(determinant(&m).unwrap(), 24.0, epsilon = 1e-12);
    }

    #[test]
    fn elimination_tracks_row_swap_sign() {
        // Permutation of the 4×4 identity with one transposition: det = −1.
        let m = array![
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        assert_abs_diff_eq!(determinant(&m).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_determinant_is_exactly_zero() {
        let m = array![
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [1.0, 1.0, 1.0, 1.0],
            [0.0, 1.0, 2.0, 3.0],
        ];
        assert_eq!(determinant(&m).unwrap(), 0.0);
    }

    #[test]
    fn invert_known_matrix() {
        let m = array![[4.0, 7.0], [2.0, 6.0]];
        let inv = invert(&m).unwrap();
        assert_abs_diff_eq!(inv[(0, 0)], 0.6, epsilon = 1e-10);
        assert_abs_diff_eq!(inv[(0, 1)], -0.7, epsilon = 1e-10);
        assert_abs_diff_eq!(inv[(1, 0)], -0.2, epsilon = 1e-10);
        assert_abs_diff_eq!(inv[(1, 1)], 0.4, epsilon = 1e-10);
    }

    #[test]
    fn invert_round_trips_to_identity() {
        let m = array![[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let inv = invert(&m).unwrap();
        let product = m.dot(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn invert_requires_pivoting() {
        // Leading zero forces a row swap before elimination can proceed.
        let m = array![[0.0, 1.0], [1.0, 0.0]];
        let inv = invert(&m).unwrap();
        assert_abs_diff_eq!(inv[(0, 1)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[(1, 0)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn invert_singular_fails() {
        let m = array![[1.0, 2.0], [2.0, 4.0]];
        assert_eq!(invert(&m).unwrap_err(), LinAlgError::Singular);
    }

    #[test]
    fn non_square_is_rejected() {
        let m = Matrix::zeros((2, 3));
        assert!(matches!(
            determinant(&m),
            Err(LinAlgError::NotSquare { rows: 2, cols: 3 })
        ));
        assert!(matches!(invert(&m), Err(LinAlgError::NotSquare { .. })));
    }
}
