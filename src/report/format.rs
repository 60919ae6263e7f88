//! Plain-text run summary and band table for `linfit fit`.

use crate::domain::Observations;
use crate::fit::FitOutput;

/// Format the run summary: data, coefficients, residual stats, band extents.
pub fn format_run_summary(obs: &Observations, out: &FitOutput, source_label: &str) -> String {
    let fit = &out.fit;
    let band = &out.band;
    let mut s = String::new();

    s.push_str("=== linfit - Linear regression and confidence limits ===\n");
    s.push_str(&format!("Source: {source_label}\n"));

    let (x_lo, x_hi) = crate::math::min_max(obs.x()).unwrap_or((f64::NAN, f64::NAN));
    s.push_str(&format!("Points: n={} | x=[{x_lo:.3}, {x_hi:.3}]\n", obs.len()));

    s.push_str("\nFit:\n");
    s.push_str(&format!("  slope      {:>14.6}\n", fit.slope));
    s.push_str(&format!("  intercept  {:>14.6}\n", fit.intercept));
    s.push_str(&format!("  sse        {:>14.6}\n", fit.sse));
    s.push_str(&format!("  resid se   {:>14.6}\n", fit.residual_std_error()));
    s.push_str(&format!("  mean(x)    {:>14.6}\n", fit.mean_x));
    s.push_str(&format!("  Sxx        {:>14.6}\n", fit.sxx));

    s.push_str(&format!(
        "\nConfidence band ({}, {}): t={:.4} | grid n={}\n",
        band.t_value.confidence_label(),
        band.t_value.display_name(),
        band.t,
        band.points.len()
    ));

    if let (Some(first), Some(last)) = (band.points.first(), band.points.last()) {
        s.push_str(&format!("  at x={:<10.3} ±{:.6}\n", first.x, first.half_width));
        if let Some(narrow) = band.narrowest() {
            s.push_str(&format!("  at x={:<10.3} ±{:.6} (narrowest)\n", narrow.x, narrow.half_width));
        }
        s.push_str(&format!("  at x={:<10.3} ±{:.6}\n", last.x, last.half_width));
    }

    s
}

/// Format the band as an aligned table.
pub fn format_band_table(out: &FitOutput) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "{:>10} {:>12} {:>12} {:>12} {:>12}\n",
        "x", "predicted", "half_width", "lower", "upper"
    ));
    for p in &out.band.points {
        s.push_str(&format!(
            "{:>10.3} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            p.x, p.predicted, p.half_width, p.lower, p.upper
        ));
    }
    s
}
