//! Band JSON files.
//!
//! A `BandFile` holds the fitted observations, the coefficients, the
//! regression segment and every band point, so `linfit plot --band FILE`
//! can redraw a run without refitting.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{BandFile, Observations};
use crate::error::AppError;
use crate::fit::FitOutput;

pub const TOOL_NAME: &str = "linfit";

/// Assemble the serializable record of a run.
pub fn band_file(obs: &Observations, out: &FitOutput) -> BandFile {
    BandFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        observations: obs.clone(),
        slope: out.fit.slope,
        intercept: out.fit.intercept,
        sse: out.fit.sse,
        segment: out.segment,
        band: out.band.clone(),
    }
}

/// Write a band JSON file.
pub fn write_band_json(path: &Path, record: &BandFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create band JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, record)
        .map_err(|e| AppError::input(format!("Failed to write band JSON: {e}")))?;

    log::info!("wrote band JSON to {}", path.display());
    Ok(())
}

/// Read a band JSON file.
pub fn read_band_json(path: &Path) -> Result<BandFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open band JSON '{}': {e}", path.display())))?;
    let record: BandFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid band JSON: {e}")))?;

    // Observations are deserialized without going through `Observations::new`.
    Observations::new(record.observations.x().to_vec(), record.observations.y().to_vec())?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TValue;
    use crate::fit::fit_and_band;

    #[test]
    fn band_json_reloads_what_was_written() {
        let obs = Observations::new(vec![1.0, 2.0, 3.0, 4.0], vec![1.2, 1.9, 3.1, 4.2]).unwrap();
        let out = fit_and_band(&obs, TValue::StudentT { confidence: 0.9 }, 1.0).unwrap();
        let record = band_file(&obs, &out);

        let path = std::env::temp_dir().join(format!("linfit_band_{}.json", std::process::id()));
        write_band_json(&path, &record).unwrap();
        let back = read_band_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, "linfit");
        assert_eq!(back.observations, obs);
        assert_eq!(back.band.points.len(), 4);
        assert_eq!(back.band.t_value, TValue::StudentT { confidence: 0.9 });
        assert!((back.slope - out.fit.slope).abs() < 1e-12);
    }

    #[test]
    fn mismatched_observations_in_json_are_rejected() {
        let path = std::env::temp_dir().join(format!("linfit_bad_{}.json", std::process::id()));
        let json = r#"{
            "tool": "linfit",
            "generated_at": "2025-01-01T00:00:00Z",
            "observations": {"x": [1.0, 2.0, 3.0], "y": [1.0]},
            "slope": 1.0, "intercept": 0.0, "sse": 0.0,
            "segment": {"x": [1.0, 3.0], "y": [1.0, 3.0]},
            "band": {"t": 2.31, "t_value": {"kind": "fixed", "value": 2.31}, "points": []}
        }"#;
        std::fs::write(&path, json).unwrap();
        let err = read_band_json(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(err.message().contains("same length"));
    }
}
