//! Observations, fit results, band points and run configuration.
//!
//! `Observations` validates on construction; everything downstream assumes
//! equal-length, finite x and y. Results and `BandFile` derive serde so a run
//! can be written to JSON and plotted again.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// t value for a two-tailed 95% interval with 7 degrees of freedom (n = 9).
pub const DEFAULT_T_VALUE: f64 = 2.31;

/// Confidence level the default t value is calibrated for.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Default spacing of the prediction grid.
pub const DEFAULT_GRID_STEP: f64 = 1.0;

/// A paired set of `(x, y)` observations.
///
/// Construction checks that both sequences have the same length and contain
/// only finite values. Size requirements of the confidence band (`n >= 3`,
/// non-constant x) are checked by the fit itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Observations {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, AppError> {
        if x.len() != y.len() {
            return Err(AppError::input(format!(
                "x and y must have the same length (x has {}, y has {}).",
                x.len(),
                y.len()
            )));
        }
        if let Some(i) = x.iter().zip(y.iter()).position(|(a, b)| !(a.is_finite() && b.is_finite())) {
            return Err(AppError::input(format!(
                "Observation {} is not finite (x={}, y={}).",
                i + 1,
                x[i],
                y[i]
            )));
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate over `(x, y)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// How the t multiplier of the confidence band is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TValue {
    /// A literal multiplier, used regardless of sample size.
    ///
    /// The default `2.31` matches a two-tailed 95% interval at n = 9 only.
    Fixed { value: f64 },
    /// Student-t critical value for `n - 2` degrees of freedom.
    StudentT { confidence: f64 },
}

impl Default for TValue {
    fn default() -> Self {
        TValue::Fixed {
            value: DEFAULT_T_VALUE,
        }
    }
}

impl TValue {
    /// Confidence level shown in chart labels.
    pub fn confidence(&self) -> f64 {
        match self {
            TValue::Fixed { .. } => DEFAULT_CONFIDENCE,
            TValue::StudentT { confidence } => *confidence,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            TValue::Fixed { value } => format!("fixed t={value}"),
            TValue::StudentT { confidence } => format!("student-t {:.1}%", confidence * 100.0),
        }
    }

    /// Label fragment such as `95%`.
    pub fn confidence_label(&self) -> String {
        let pct = self.confidence() * 100.0;
        if (pct - pct.round()).abs() < 1e-9 {
            format!("{pct:.0}%")
        } else {
            format!("{pct:.1}%")
        }
    }
}

/// Least-squares line plus the derived quantities the band needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// `m·x_i + b` at each observed x.
    pub fitted: Vec<f64>,
    /// `y_i - fitted_i`.
    pub residuals: Vec<f64>,
    /// Residual sum of squares.
    pub sse: f64,
    pub n: usize,
    pub mean_x: f64,
    /// `Σx_i² - n·mean(x)²`.
    pub sxx: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Residual variance `SSE / (n - 2)`.
    pub fn residual_variance(&self) -> f64 {
        self.sse / (self.n as f64 - 2.0)
    }

    /// Residual standard error `sqrt(SSE / (n - 2))`.
    pub fn residual_std_error(&self) -> f64 {
        self.residual_variance().sqrt()
    }
}

/// Two endpoints used to draw the regression line.
///
/// Pairs `min(x)` with `min(fitted)` and `max(x)` with `max(fitted)`, so a
/// negative slope is drawn rising. Kept that way for plotting parity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionSegment {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl RegressionSegment {
    pub fn points(&self) -> [(f64, f64); 2] {
        [(self.x[0], self.y[0]), (self.x[1], self.y[1])]
    }
}

/// Confidence interval at a single grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub x: f64,
    pub predicted: f64,
    pub half_width: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Confidence band over the prediction grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    /// Multiplier actually applied.
    pub t: f64,
    pub t_value: TValue,
    pub points: Vec<BandPoint>,
}

impl ConfidenceBand {
    pub fn lower_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.lower)).collect()
    }

    pub fn upper_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.upper)).collect()
    }

    /// Grid point with the narrowest interval.
    pub fn narrowest(&self) -> Option<&BandPoint> {
        self.points
            .iter()
            .min_by(|a, b| a.half_width.total_cmp(&b.half_width))
    }
}

/// Where observations come from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Csv(PathBuf),
    Inline { x: Vec<f64>, y: Vec<f64> },
    Demo { seed: u64, count: usize },
}

/// Run configuration assembled from CLI flags.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub source: InputSource,
    pub t_value: TValue,
    pub grid_step: f64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub svg: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            source: InputSource::Demo { seed: 42, count: 9 },
            t_value: TValue::default(),
            grid_step: DEFAULT_GRID_STEP,
            plot: true,
            plot_width: 72,
            plot_height: 24,
            export_csv: None,
            export_json: None,
            svg: None,
        }
    }
}

/// Portable record of a run: inputs, coefficients, and band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub observations: Observations,
    pub slope: f64,
    pub intercept: f64,
    pub sse: f64,
    pub segment: RegressionSegment,
    pub band: ConfidenceBand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observations_reject_mismatched_lengths() {
        let err = Observations::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn observations_reject_non_finite_values() {
        let err = Observations::new(vec![1.0, f64::NAN], vec![1.0, 2.0]).unwrap_err();
        assert!(err.message().contains("Observation 2"));
    }

    #[test]
    fn default_t_value_is_fixed_231() {
        assert_eq!(TValue::default(), TValue::Fixed { value: 2.31 });
        assert_eq!(TValue::default().confidence_label(), "95%");
        assert_eq!(TValue::StudentT { confidence: 0.995 }.confidence_label(), "99.5%");
    }

    #[test]
    fn t_value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&TValue::StudentT { confidence: 0.9 }).unwrap();
        assert_eq!(json, r#"{"kind":"student_t","confidence":0.9}"#);
    }
}
