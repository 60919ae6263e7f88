//! Markdown fit report for sharing or archiving a run.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::Observations;
use crate::error::AppError;
use crate::fit::FitOutput;

/// Render the report body.
pub fn render_fit_report(obs: &Observations, out: &FitOutput, generated: &str) -> String {
    let fit = &out.fit;
    let band = &out.band;
    let mut s = String::new();

    s.push_str("# linfit report\n");
    s.push_str(&format!("- generated: {generated}\n"));
    s.push_str(&format!("- n: {}\n", fit.n));
    s.push_str(&format!("- slope: {:.6}\n", fit.slope));
    s.push_str(&format!("- intercept: {:.6}\n", fit.intercept));
    s.push_str(&format!("- sse: {:.6}\n", fit.sse));
    s.push_str(&format!(
        "- t: {:.4} ({}, {})\n",
        band.t,
        band.t_value.display_name(),
        band.t_value.confidence_label()
    ));

    s.push_str("\n## Observations\n");
    s.push_str("| x | y | fitted | residual |\n");
    s.push_str("| - | - | - | - |\n");
    for (i, (x, y)) in obs.points().enumerate() {
        let fitted = fit.fitted.get(i).copied().unwrap_or(f64::NAN);
        let resid = fit.residuals.get(i).copied().unwrap_or(f64::NAN);
        s.push_str(&format!("| {x:.3} | {y:.3} | {fitted:.3} | {resid:.3} |\n"));
    }

    s.push_str("\n## Confidence band\n");
    s.push_str("| x | predicted | lower | upper |\n");
    s.push_str("| - | - | - | - |\n");
    for p in &band.points {
        s.push_str(&format!(
            "| {:.3} | {:.3} | {:.3} | {:.3} |\n",
            p.x, p.predicted, p.lower, p.upper
        ));
    }

    s
}

/// Write a timestamped report into `dir` and return its path.
pub fn write_fit_report(dir: &Path, obs: &Observations, out: &FitOutput) -> Result<PathBuf, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::internal(format!("Failed to create report dir '{}': {e}", dir.display())))?;

    let now = Local::now();
    let path = dir.join(format!("linfit_report_{}.md", now.format("%Y%m%d_%H%M%S")));
    let body = render_fit_report(obs, out, &now.to_rfc3339());

    std::fs::write(&path, body)
        .map_err(|e| AppError::internal(format!("Failed to write report '{}': {e}", path.display())))?;

    log::info!("wrote fit report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TValue;
    use crate::fit::fit_and_band;

    #[test]
    fn report_lists_observations_and_band() {
        let obs = Observations::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let out = fit_and_band(&obs, TValue::default(), 1.0).unwrap();
        let txt = render_fit_report(&obs, &out, "2025-01-01T00:00:00Z");

        assert!(txt.starts_with("# linfit report\n- generated: 2025-01-01T00:00:00Z\n"));
        assert!(txt.contains("- slope: 1.000000\n"));
        assert!(txt.contains("| 2.000 | 3.000 | 3.000 | "));
        assert!(txt.contains("- t: 2.3100 (fixed t=2.31, 95%)\n"));
    }
}
