//! Confidence band around the fitted line.
//!
//! For each grid point `x0` the half-width of the band is
//!
//! ```text
//! t · sqrt( SSE/(n-2) · (1/n + (x0 - mean(x))² / Sxx) )
//! ```
//!
//! and the bounds are `m·x0 + b ± |half_width|`. The distance term vanishes at
//! `mean(x)`, so the band is narrowest there and widens toward the ends.

use crate::domain::{BandPoint, ConfidenceBand, LineFit, TValue};
use crate::error::AppError;
use crate::math::t_critical;

/// Upper bound on grid size; beyond this the step is almost certainly wrong.
const MAX_GRID_POINTS: usize = 1_000_000;

/// Tolerance for landing on `max` despite floating-point accumulation.
const GRID_EPS: f64 = 1e-9;

/// Evenly spaced grid `min, min + step, …` not exceeding `max`.
///
/// With `step = 1` the length is `floor(max - min) + 1`.
pub fn prediction_grid(min: f64, max: f64, step: f64) -> Result<Vec<f64>, AppError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(AppError::input(format!("Grid step must be a positive number, got {step}.")));
    }
    if !(min.is_finite() && max.is_finite()) || max < min {
        return Err(AppError::input(format!("Invalid grid range [{min}, {max}].")));
    }

    let intervals = ((max - min) / step + GRID_EPS).floor();
    if intervals >= MAX_GRID_POINTS as f64 {
        return Err(AppError::input(format!(
            "Grid step {step} over [{min}, {max}] would produce more than {MAX_GRID_POINTS} points; use a larger --step."
        )));
    }

    let count = intervals as usize + 1;
    Ok((0..count).map(|i| min + i as f64 * step).collect())
}

/// Resolve the t multiplier for a fit with `n` observations.
pub fn resolve_t(t_value: TValue, n: usize) -> Result<f64, AppError> {
    match t_value {
        TValue::Fixed { value } => {
            if !(value.is_finite() && value > 0.0) {
                return Err(AppError::input(format!("t value must be a positive number, got {value}.")));
            }
            Ok(value)
        }
        TValue::StudentT { confidence } => t_critical(confidence, n as f64 - 2.0),
    }
}

/// Half-width of the confidence interval at `x0`.
pub fn half_width(fit: &LineFit, t: f64, x0: f64) -> f64 {
    let n = fit.n as f64;
    let dx = x0 - fit.mean_x;
    let var = fit.residual_variance() * (1.0 / n + dx * dx / fit.sxx);
    (t * var.sqrt()).abs()
}

/// Compute lower/upper confidence limits at every grid point.
pub fn confidence_band(fit: &LineFit, grid: &[f64], t_value: TValue) -> Result<ConfidenceBand, AppError> {
    if fit.n < super::MIN_OBSERVATIONS {
        return Err(AppError::data(format!(
            "Confidence band needs at least {} observations; got {}.",
            super::MIN_OBSERVATIONS,
            fit.n
        )));
    }
    if !(fit.sxx > 0.0) {
        return Err(AppError::data("Confidence band needs x values with non-zero spread."));
    }

    let t = resolve_t(t_value, fit.n)?;

    let mut points = Vec::with_capacity(grid.len());
    for &x0 in grid {
        let predicted = fit.predict(x0);
        let hw = half_width(fit, t, x0);
        if !(predicted.is_finite() && hw.is_finite()) {
            return Err(AppError::internal(format!("Non-finite confidence limit at x={x0}.")));
        }
        points.push(BandPoint {
            x: x0,
            predicted,
            half_width: hw,
            lower: predicted - hw,
            upper: predicted + hw,
        });
    }

    log::debug!("confidence band: t={t} ({}) over {} grid points", t_value.display_name(), points.len());

    Ok(ConfidenceBand { t, t_value, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observations;
    use crate::fit::fit_line;

    fn noisy_fit() -> LineFit {
        let x: Vec<f64> = (0..9).map(f64::from).collect();
        let y = vec![1.1, 1.8, 3.2, 3.9, 5.3, 5.8, 7.1, 8.2, 8.8];
        fit_line(&Observations::new(x, y).unwrap()).unwrap()
    }

    #[test]
    fn grid_length_is_floor_span_plus_one() {
        assert_eq!(prediction_grid(1.0, 5.0, 1.0).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let g = prediction_grid(0.5, 3.2, 1.0).unwrap();
        assert_eq!(g.len(), (3.2_f64 - 0.5).floor() as usize + 1);
        assert_eq!(g, vec![0.5, 1.5, 2.5]);

        for w in g.windows(2) {
            assert!((w[1] - w[0] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn grid_single_point_when_span_below_step() {
        assert_eq!(prediction_grid(2.0, 2.5, 1.0).unwrap(), vec![2.0]);
    }

    #[test]
    fn grid_rejects_bad_step() {
        assert!(prediction_grid(0.0, 1.0, 0.0).is_err());
        assert!(prediction_grid(0.0, 1.0, -1.0).is_err());
        assert!(prediction_grid(0.0, 1e9, 1e-3).is_err());
    }

    #[test]
    fn band_is_narrowest_at_mean() {
        let fit = noisy_fit();
        let grid = prediction_grid(0.0, 8.0, 1.0).unwrap();
        let band = confidence_band(&fit, &grid, TValue::default()).unwrap();

        let narrowest = band.narrowest().unwrap();
        assert!((narrowest.x - fit.mean_x).abs() < 1e-12);
        let first = band.points.first().unwrap();
        let last = band.points.last().unwrap();
        assert!(narrowest.half_width < first.half_width);
        assert!(narrowest.half_width < last.half_width);
    }

    #[test]
    fn half_width_at_mean_matches_formula() {
        let fit = noisy_fit();
        let hw = half_width(&fit, 2.31, fit.mean_x);
        let expected = 2.31 * (fit.sse / 7.0 / 9.0).sqrt();
        assert!((hw - expected).abs() < 1e-12);
    }

    #[test]
    fn predicted_values_use_intercept() {
        let fit = noisy_fit();
        let band = confidence_band(&fit, &[0.0, 4.0], TValue::default()).unwrap();
        assert!((band.points[0].predicted - fit.intercept).abs() < 1e-12);
        assert!((band.points[1].predicted - (4.0 * fit.slope + fit.intercept)).abs() < 1e-12);
    }

    #[test]
    fn collinear_input_gives_zero_width_band() {
        let obs = Observations::new(vec![1.0, 2.0, 3.0, 4.0], vec![3.0, 5.0, 7.0, 9.0]).unwrap();
        let fit = fit_line(&obs).unwrap();
        let band = confidence_band(&fit, &[1.0, 2.5, 4.0], TValue::default()).unwrap();
        for p in &band.points {
            assert!(p.half_width < 1e-6, "half width {}", p.half_width);
            assert!((p.upper - p.lower).abs() < 2e-6);
        }
    }

    #[test]
    fn student_t_mode_uses_n_minus_two() {
        let fit = noisy_fit();
        assert!((resolve_t(TValue::default(), fit.n).unwrap() - 2.31).abs() < 1e-12);

        let t = resolve_t(TValue::StudentT { confidence: 0.95 }, fit.n).unwrap();
        assert!((t - 2.3646).abs() < 1e-3, "t = {t}");

        let band = confidence_band(&fit, &[fit.mean_x], TValue::StudentT { confidence: 0.95 }).unwrap();
        assert!((band.t - t).abs() < 1e-12);
    }

    #[test]
    fn offset_x_gives_same_half_widths() {
        let y = vec![1.0, 2.1, 2.9, 4.2];
        let near = fit_line(&Observations::new(vec![0.0, 1.0, 2.0, 3.0], y.clone()).unwrap()).unwrap();
        let x_far: Vec<f64> = (0..4).map(|k| 1e8 + k as f64).collect();
        let far = fit_line(&Observations::new(x_far, y).unwrap()).unwrap();

        for k in 0..4 {
            let dx = k as f64;
            let a = half_width(&near, 2.31, dx);
            let b = half_width(&far, 2.31, 1e8 + dx);
            assert!((a - b).abs() < 1e-9, "x offset {dx}: {a} vs {b}");
        }
    }

    #[test]
    fn fixed_t_must_be_positive() {
        let fit = noisy_fit();
        assert!(resolve_t(TValue::Fixed { value: 0.0 }, fit.n).is_err());
        assert!(resolve_t(TValue::Fixed { value: f64::NAN }, fit.n).is_err());
    }
}
