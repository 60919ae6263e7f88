//! Load observations and run the line fit with its confidence band.
//!
//! Both `linfit fit` and the interactive view go through `run_fit`.
//! `run_fit_with_input` skips loading for observations already in hand.

use crate::data::generate_sample;
use crate::domain::{FitConfig, InputSource, Observations};
use crate::error::AppError;
use crate::fit::{FitOutput, fit_and_band};
use crate::io::{RowError, load_observations};
use crate::plot::ChartScene;

/// Observations plus a human-readable description of where they came from.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub observations: Observations,
    pub source_label: String,
    pub row_errors: Vec<RowError>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub observations: Observations,
    pub source_label: String,
    pub row_errors: Vec<RowError>,
    pub fit: FitOutput,
}

impl RunOutput {
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.observations.points().collect()
    }

    /// Chart scene for Plotters-based rendering.
    pub fn scene(&self, equal_aspect: bool) -> ChartScene {
        ChartScene::new(&self.points(), &self.fit.segment, &self.fit.band, equal_aspect)
    }
}

/// Resolve the configured input source to observations.
pub fn load_input(source: &InputSource) -> Result<LoadedInput, AppError> {
    match source {
        InputSource::Csv(path) => {
            let data = load_observations(path)?;
            Ok(LoadedInput {
                observations: data.observations,
                source_label: path.display().to_string(),
                row_errors: data.row_errors,
            })
        }
        InputSource::Inline { x, y } => Ok(LoadedInput {
            observations: Observations::new(x.clone(), y.clone())?,
            source_label: "inline values".to_string(),
            row_errors: Vec::new(),
        }),
        InputSource::Demo { seed, count } => Ok(LoadedInput {
            observations: generate_sample(*seed, *count)?,
            source_label: format!("demo sample (seed {seed})"),
            row_errors: Vec::new(),
        }),
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let input = load_input(&config.source)?;
    run_fit_with_input(config, input)
}

/// Execute the pipeline with already-loaded observations.
pub fn run_fit_with_input(config: &FitConfig, input: LoadedInput) -> Result<RunOutput, AppError> {
    let fit = fit_and_band(&input.observations, config.t_value, config.grid_step)?;

    Ok(RunOutput {
        observations: input.observations,
        source_label: input.source_label,
        row_errors: input.row_errors,
        fit,
    })
}
