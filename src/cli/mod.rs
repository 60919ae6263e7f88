//! Command-line arguments for `linfit`.
//!
//! Parsing only; `app` turns these into a `FitConfig` and dispatches.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::DEMO_COUNT;
use crate::domain::DEFAULT_GRID_STEP;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "linfit",
    version,
    about = "Least-squares line fit with a confidence band"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a line, print the summary and an ASCII chart, and optionally export.
    Fit(FitArgs),
    /// Open the interactive chart window.
    ///
    /// Uses the same pipeline as `linfit fit`, rendered in a terminal UI.
    Show(FitArgs),
    /// Plot a previously exported band JSON without refitting.
    Plot(PlotArgs),
}

/// Where observations come from. Without any of these, a demo sample is used.
#[derive(Debug, Parser, Clone)]
pub struct InputArgs {
    /// CSV file with `x` and `y` columns.
    #[arg(short = 'i', long, value_name = "CSV", conflicts_with_all = ["x", "y", "demo"])]
    pub input: Option<PathBuf>,

    /// Inline x values, comma- or space-separated (e.g. "1,2,3").
    #[arg(long, value_name = "LIST", requires = "y", allow_hyphen_values = true)]
    pub x: Option<String>,

    /// Inline y values, same length as --x.
    #[arg(long, value_name = "LIST", requires = "x", allow_hyphen_values = true)]
    pub y: Option<String>,

    /// Use a synthetic noisy linear sample.
    #[arg(long, conflicts_with_all = ["x", "y"])]
    pub demo: bool,

    /// Random seed for the demo sample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of demo observations.
    #[arg(long, default_value_t = DEMO_COUNT)]
    pub count: usize,
}

/// Options for fitting and displaying.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fixed t multiplier for the band (default 2.31: two-tailed 95% at n=9).
    #[arg(short = 't', long, conflicts_with = "confidence")]
    pub t_value: Option<f64>,

    /// Compute t from the Student-t distribution at this confidence level (e.g. 0.95).
    #[arg(short = 'c', long)]
    pub confidence: Option<f64>,

    /// Spacing of the prediction grid.
    #[arg(long, default_value_t = DEFAULT_GRID_STEP)]
    pub step: f64,

    /// Disable the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Also print the band as a table.
    #[arg(long)]
    pub table: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Export the band (x, predicted, half_width, lower, upper) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export observations, coefficients and band to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Draw the chart to an SVG file (in `show`, the target of the `s` key).
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Options for plotting a saved band.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Band JSON file produced by `linfit fit --export-json`.
    #[arg(long, value_name = "JSON")]
    pub band: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Also draw the chart to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inline_values_with_negative_numbers() {
        let cli = Cli::try_parse_from(["linfit", "fit", "--x", "-1,0,1", "--y", "-2,0,2"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input.x.as_deref(), Some("-1,0,1"));
        assert_eq!(args.input.y.as_deref(), Some("-2,0,2"));
        assert_eq!(args.step, 1.0);
    }

    #[test]
    fn t_value_and_confidence_conflict() {
        assert!(Cli::try_parse_from(["linfit", "fit", "-t", "2.0", "-c", "0.9"]).is_err());
    }

    #[test]
    fn x_requires_y() {
        assert!(Cli::try_parse_from(["linfit", "fit", "--x", "1,2,3"]).is_err());
    }

    #[test]
    fn plot_requires_band() {
        assert!(Cli::try_parse_from(["linfit", "plot"]).is_err());
        assert!(Cli::try_parse_from(["linfit", "plot", "--band", "b.json"]).is_ok());
    }
}
