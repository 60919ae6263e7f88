//! Descriptive statistics and Student-t critical values.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AppError;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// `(min, max)` of a slice, or `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}

/// Two-tailed Student-t critical value: `F⁻¹(1 - α/2; df)` with `α = 1 - confidence`.
pub fn t_critical(confidence: f64, df: f64) -> Result<f64, AppError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(AppError::input(format!(
            "Confidence level must be in (0, 1), got {confidence}."
        )));
    }
    if !(df > 0.0 && df.is_finite()) {
        return Err(AppError::data(format!(
            "Student-t needs positive degrees of freedom, got {df}."
        )));
    }

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AppError::internal(format!("Student-t distribution error: {e}")))?;
    let alpha = 1.0 - confidence;
    let t = dist.inverse_cdf(1.0 - alpha / 2.0);
    if !t.is_finite() {
        return Err(AppError::internal(format!(
            "Non-finite t value for confidence {confidence} and df {df}."
        )));
    }
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_sum_of_squares() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((mean(&v) - 2.5).abs() < 1e-12);
        assert!((sum_of_squares(&v) - 30.0).abs() < 1e-12);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn min_max_handles_empty() {
        assert_eq!(min_max(&[3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn t_critical_matches_tables() {
        // n = 9 -> df = 7; the fixed 2.31 is a rounded table value.
        let t7 = t_critical(0.95, 7.0).unwrap();
        assert!((t7 - 2.3646).abs() < 1e-3, "t(0.975, 7) = {t7}");

        let t30 = t_critical(0.95, 30.0).unwrap();
        assert!((t30 - 2.0423).abs() < 1e-3, "t(0.975, 30) = {t30}");
    }

    #[test]
    fn t_critical_rejects_bad_arguments() {
        assert!(t_critical(1.0, 5.0).is_err());
        assert!(t_critical(0.95, 0.0).is_err());
    }
}
