//! Ordinary least-squares line fit.
//!
//! Given observations `(x_i, y_i)` we compute:
//! - slope `m` and intercept `b` minimizing `Σ (y_i - m·x_i - b)²`
//! - fitted values and residuals `e_i = y_i - (m·x_i + b)`
//! - the residual sum of squares `Σ e_i²`
//! - `mean(x)` and `Sxx = Σ(x_i - mean(x))²`, reused by the band
//!
//! Sxx is summed from centred values, and the fit runs around `mean(x)`, so
//! large x offsets keep their precision.
//!
//! A confidence band needs `n - 2 > 0` degrees of freedom and `Sxx > 0`,
//! so both are rejected here before anything is divided by them.

use crate::domain::{LineFit, Observations, RegressionSegment};
use crate::error::AppError;
use crate::math::{mean, min_max, polyfit_line_centered, sum_of_squares};

/// Minimum number of observations for a defined confidence interval.
pub const MIN_OBSERVATIONS: usize = 3;

/// Fit a first-degree polynomial to the observations.
pub fn fit_line(obs: &Observations) -> Result<LineFit, AppError> {
    let n = obs.len();
    if n < MIN_OBSERVATIONS {
        return Err(AppError::data(format!(
            "At least {MIN_OBSERVATIONS} observations are required for a confidence band; got {n} \
             (residual variance divides by n - 2 = {}).",
            n as i64 - 2
        )));
    }

    let x = obs.x();
    let y = obs.y();

    let mean_x = mean(x);
    let sxx: f64 = x.iter().map(|v| (v - mean_x).powi(2)).sum();
    let constant_x = min_max(x).is_some_and(|(lo, hi)| lo == hi);
    if constant_x || !(sxx > 0.0) {
        return Err(AppError::data(format!(
            "x values have zero spread (Σ(x - mean(x))² = {sxx}); cannot fit a line."
        )));
    }

    let (slope, at_mean) = polyfit_line_centered(x, y, mean_x)
        .ok_or_else(|| AppError::internal("Least squares solve failed for the line fit."))?;
    let intercept = at_mean - slope * mean_x;

    let fitted: Vec<f64> = x.iter().map(|&xi| at_mean + slope * (xi - mean_x)).collect();
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();
    let sse = sum_of_squares(&residuals);

    if !(slope.is_finite() && intercept.is_finite() && sse.is_finite()) {
        return Err(AppError::internal("Non-finite coefficients from the line fit."));
    }

    log::debug!("line fit: m={slope} b={intercept} mean_x={mean_x} sxx={sxx} sse={sse}");

    Ok(LineFit {
        slope,
        intercept,
        fitted,
        residuals,
        sse,
        n,
        mean_x,
        sxx,
    })
}

/// Endpoints of the regression line for plotting.
pub fn regression_segment(obs: &Observations, fit: &LineFit) -> Result<RegressionSegment, AppError> {
    let (x_lo, x_hi) =
        min_max(obs.x()).ok_or_else(|| AppError::data("No observations to draw a regression line."))?;
    let (y_lo, y_hi) =
        min_max(&fit.fitted).ok_or_else(|| AppError::internal("No fitted values to draw a regression line."))?;

    Ok(RegressionSegment {
        x: [x_lo, x_hi],
        y: [y_lo, y_hi],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(x: &[f64], y: &[f64]) -> Observations {
        Observations::new(x.to_vec(), y.to_vec()).unwrap()
    }

    #[test]
    fn identity_line_has_unit_slope_and_zero_intercept() {
        let o = obs(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let fit = fit_line(&o).unwrap();
        assert!((fit.slope - 1.0).abs() < 1e-10, "slope {}", fit.slope);
        assert!(fit.intercept.abs() < 1e-10, "intercept {}", fit.intercept);
    }

    #[test]
    fn collinear_input_has_zero_sse() {
        let o = obs(&[0.0, 2.0, 4.0, 6.0], &[-1.0, 5.0, 11.0, 17.0]);
        let fit = fit_line(&o).unwrap();
        assert!(fit.sse < 1e-18, "sse {}", fit.sse);
        assert!(fit.residuals.iter().all(|e| e.abs() < 1e-9));
    }

    #[test]
    fn constant_y_has_zero_slope() {
        let o = obs(&[1.0, 2.0, 3.0, 4.0], &[7.0, 7.0, 7.0, 7.0]);
        let fit = fit_line(&o).unwrap();
        assert!(fit.slope.abs() < 1e-10);
        assert!((fit.intercept - 7.0).abs() < 1e-10);
    }

    #[test]
    fn two_points_are_rejected() {
        let o = obs(&[1.0, 2.0], &[1.0, 2.0]);
        let err = fit_line(&o).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert!(err.message().contains("n - 2 = 0"), "{err}");
    }

    #[test]
    fn identical_x_is_rejected() {
        let o = obs(&[4.0, 4.0, 4.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        let err = fit_line(&o).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert!(err.message().contains("zero spread"), "{err}");
    }

    #[test]
    fn sxx_and_mean_are_reported() {
        let o = obs(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0]);
        let fit = fit_line(&o).unwrap();
        assert!((fit.mean_x - 2.0).abs() < 1e-12);
        assert!((fit.sxx - 2.0).abs() < 1e-12);
        assert_eq!(fit.n, 3);
    }

    #[test]
    fn large_offset_x_keeps_slope_and_sxx() {
        // Same shape as x = [0, 1, 2, 3]: Sxx = 5, slope = 5.2 / 5.
        let o = obs(&[1e8, 1e8 + 1.0, 1e8 + 2.0, 1e8 + 3.0], &[1.0, 2.1, 2.9, 4.2]);
        let fit = fit_line(&o).unwrap();
        assert!((fit.slope - 1.04).abs() < 1e-9, "slope {}", fit.slope);
        assert!((fit.sxx - 5.0).abs() < 1e-9, "sxx {}", fit.sxx);

        let small = fit_line(&obs(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.1, 2.9, 4.2])).unwrap();
        assert!((fit.sse - small.sse).abs() < 1e-9, "sse {} vs {}", fit.sse, small.sse);
    }

    #[test]
    fn epoch_seconds_x_fit_without_zero_spread_error() {
        let t0 = 1.7e9;
        let x: Vec<f64> = (0..5).map(|k| t0 + k as f64).collect();
        let o = obs(&x, &[3.0, 5.1, 6.9, 9.0, 11.0]);
        let fit = fit_line(&o).unwrap();
        assert!((fit.sxx - 10.0).abs() < 1e-9, "sxx {}", fit.sxx);
        assert!((fit.slope - 1.99).abs() < 1e-9, "slope {}", fit.slope);
        // Residuals: -0.02, 0.09, -0.10, 0.01, 0.02.
        assert!((fit.sse - 0.019).abs() < 1e-9, "sse {}", fit.sse);
    }

    #[test]
    fn segment_pairs_min_x_with_min_fit() {
        // Negative slope: the segment still pairs min with min.
        let o = obs(&[0.0, 1.0, 2.0], &[4.0, 2.0, 0.0]);
        let fit = fit_line(&o).unwrap();
        let seg = regression_segment(&o, &fit).unwrap();
        assert_eq!(seg.x, [0.0, 2.0]);
        assert!((seg.y[0] - 0.0).abs() < 1e-9);
        assert!((seg.y[1] - 4.0).abs() < 1e-9);
    }
}
