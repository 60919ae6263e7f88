//! Line fitting and confidence bands.
//!
//! - `line`: least-squares line, residuals, plotting segment
//! - `band`: prediction grid and confidence half-widths
//!
//! `fit_and_band` chains both and is what the CLI and the TUI call.

pub mod band;
pub mod line;

pub use band::*;
pub use line::*;

use crate::domain::{ConfidenceBand, LineFit, Observations, RegressionSegment, TValue};
use crate::error::AppError;

/// Everything computed for one set of observations.
#[derive(Debug, Clone)]
pub struct FitOutput {
    pub fit: LineFit,
    pub segment: RegressionSegment,
    pub band: ConfidenceBand,
}

/// Fit a line and compute its confidence band over a grid with spacing `step`.
pub fn fit_and_band(obs: &Observations, t_value: TValue, step: f64) -> Result<FitOutput, AppError> {
    let fit = fit_line(obs)?;
    let segment = regression_segment(obs, &fit)?;

    let (x_min, x_max) = crate::math::min_max(obs.x())
        .ok_or_else(|| AppError::data("No observations to build a prediction grid from."))?;
    let grid = prediction_grid(x_min, x_max, step)?;
    let band = confidence_band(&fit, &grid, t_value)?;

    log::info!(
        "fit n={} slope={:.6} intercept={:.6} sse={:.6} t={:.4} grid={}",
        fit.n,
        fit.slope,
        fit.intercept,
        fit.sse,
        band.t,
        band.points.len()
    );

    Ok(FitOutput { fit, segment, band })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_and_band_on_nine_points() {
        let x: Vec<f64> = (1..=9).map(f64::from).collect();
        let y = vec![2.9, 3.4, 4.6, 5.1, 6.2, 6.6, 7.7, 8.3, 9.0];
        let obs = Observations::new(x, y).unwrap();

        let out = fit_and_band(&obs, TValue::default(), 1.0).unwrap();
        assert_eq!(out.band.points.len(), 9);
        assert!((out.band.t - 2.31).abs() < 1e-12);
        assert!(out.fit.slope > 0.7 && out.fit.slope < 0.8, "slope {}", out.fit.slope);

        // Band is symmetric around the fitted line.
        for p in &out.band.points {
            assert!((p.upper - p.predicted - (p.predicted - p.lower)).abs() < 1e-9);
            assert!((p.predicted - out.fit.predict(p.x)).abs() < 1e-12);
        }
    }

    #[test]
    fn fit_and_band_propagates_data_errors() {
        let obs = Observations::new(vec![3.0, 3.0, 3.0], vec![1.0, 2.0, 3.0]).unwrap();
        let err = fit_and_band(&obs, TValue::default(), 1.0).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }
}
