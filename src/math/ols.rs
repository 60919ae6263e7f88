//! Least squares solver.
//!
//! A first-degree polynomial fit is the least-squares solution of
//!
//! ```text
//! [x_1 1]   [m]   [y_1]
//! [ ... ] · [b] ≈ [...]
//! [x_n 1]         [y_n]
//! ```
//!
//! We solve it with SVD rather than the closed-form `Sxy / Sxx` so that the
//! coefficients match a general Vandermonde polyfit and so that rank
//! deficiency is reported by the solver instead of producing `inf`.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)
//!
//! The x column is centred and both columns are scaled to unit norm before the
//! solve. Raw `[x, 1]` with large, tightly spaced x (timestamps, ids) has a
//! smallest singular value below the solver tolerance, which would silently
//! truncate the slope.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ m·x + b` and return `(m, b)`.
///
/// Slices must have equal length; callers validate that through
/// `Observations`.
pub fn polyfit_line(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.is_empty() {
        return None;
    }
    let center = x.iter().sum::<f64>() / x.len() as f64;
    let (m, c) = polyfit_line_centered(x, y, center)?;
    Some((m, c - m * center))
}

/// Fit `y ≈ m·(x - center) + c` and return `(m, c)`.
///
/// `c` is the fitted value at `center`. Returns `None` for empty or
/// mismatched input and when all x equal `center`.
pub fn polyfit_line_centered(x: &[f64], y: &[f64], center: f64) -> Option<(f64, f64)> {
    let n = x.len();
    if n == 0 || n != y.len() || !center.is_finite() {
        return None;
    }

    let shifted: Vec<f64> = x.iter().map(|&v| v - center).collect();
    let x_norm = shifted.iter().map(|v| v * v).sum::<f64>().sqrt();
    if !(x_norm > 0.0 && x_norm.is_finite()) {
        return None;
    }
    let one_norm = (n as f64).sqrt();

    // Columns are ordered highest power first: [x - center, 1], each scaled to unit norm.
    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { shifted[i] / x_norm } else { 1.0 / one_norm });
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs)?;
    Some((beta[0] / x_norm, beta[1] / one_norm))
}
