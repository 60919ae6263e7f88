//! Band CSV: one row per grid point, columns `x,predicted,half_width,lower,upper`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ConfidenceBand;
use crate::error::AppError;

/// Write one row per grid point to a CSV file.
pub fn write_band_csv(path: &Path, band: &ConfidenceBand) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_band_rows(file, band)?;
    log::info!("wrote {} band rows to {}", band.points.len(), path.display());
    Ok(())
}

/// Write the band CSV to any writer.
pub fn write_band_rows<W: Write>(mut out: W, band: &ConfidenceBand) -> Result<(), AppError> {
    writeln!(out, "x,predicted,half_width,lower,upper")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for p in &band.points {
        writeln!(
            out,
            "{},{:.10},{:.10},{:.10},{:.10}",
            p.x, p.predicted, p.half_width, p.lower, p.upper
        )
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BandPoint, TValue};

    #[test]
    fn band_rows_have_header_and_fixed_precision() {
        let band = ConfidenceBand {
            t: 2.31,
            t_value: TValue::default(),
            points: vec![BandPoint {
                x: 1.0,
                predicted: 2.5,
                half_width: 0.25,
                lower: 2.25,
                upper: 2.75,
            }],
        };

        let mut buf = Vec::new();
        write_band_rows(&mut buf, &band).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        assert_eq!(
            txt,
            "x,predicted,half_width,lower,upper\n1,2.5000000000,0.2500000000,2.2500000000,2.7500000000\n"
        );
    }
}
