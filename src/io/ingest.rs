//! CSV ingest and inline value parsing.
//!
//! The CSV must have `x` and `y` columns (header names are matched
//! case-insensitively; other columns are ignored). Rows with a missing or
//! non-numeric value are skipped and reported rather than failing the file.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::Observations;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: observations plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Observations,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_observations(file)?;

    for err in &data.row_errors {
        log::warn!("{}: line {}: {}", path.display(), err.line, err.message);
    }
    log::info!(
        "loaded {} of {} rows from {}",
        data.observations.len(),
        data.rows_read,
        path.display()
    );

    Ok(data)
}

/// Read observations from any CSV source.
pub fn read_observations<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = *header_map
        .get("x")
        .ok_or_else(|| AppError::input("Missing required column: `x`"))?;
    let y_idx = *header_map
        .get("y")
        .ok_or_else(|| AppError::input("Missing required column: `y`"))?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match (parse_field(&record, x_idx, "x"), parse_field(&record, y_idx, "y")) {
            (Ok(xv), Ok(yv)) => {
                x.push(xv);
                y.push(yv);
            }
            (Err(message), _) | (_, Err(message)) => row_errors.push(RowError { line, message }),
        }
    }

    let observations = Observations::new(x, y)?;
    Ok(IngestedData {
        observations,
        row_errors,
        rows_read,
    })
}

/// Parse a comma- or whitespace-separated list such as `"1, 2.5 3"`.
pub fn parse_value_list(s: &str) -> Result<Vec<f64>, AppError> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AppError::input(format!("Invalid number '{tok}' in value list.")))
        })
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{raw}'")),
    }
}
