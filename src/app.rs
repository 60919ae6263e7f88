//! Command dispatch for the `linfit` binary.
//!
//! `fit` prints to stdout and writes requested exports. `show` hands the same
//! `FitConfig` to the terminal UI. `plot` redraws a saved band JSON file.

use clap::Parser;

use crate::cli::{Command, FitArgs, InputArgs, PlotArgs};
use crate::domain::{FitConfig, InputSource, TValue};
use crate::error::AppError;
use crate::plot::{ChartScene, SVG_SIZE};

pub mod pipeline;

/// Entry point for the `linfit` binary.
pub fn run() -> Result<(), AppError> {
    // `linfit` and `linfit --x ... --y ...` behave like `linfit show ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Show(args) => handle_show(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    for err in &run.row_errors {
        eprintln!("warning: line {}: {}", err.line, err.message);
    }

    println!(
        "{}",
        crate::report::format_run_summary(&run.observations, &run.fit, &run.source_label)
    );

    if args.table {
        println!("{}", crate::report::format_band_table(&run.fit));
    }

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.points(),
            &run.fit.segment,
            &run.fit.band,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_band_csv(path, &run.fit.band)?;
    }
    if let Some(path) = &config.export_json {
        let record = crate::io::band_file(&run.observations, &run.fit);
        crate::io::write_band_json(path, &record)?;
    }
    if let Some(path) = &config.svg {
        crate::plot::write_svg(path, &run.scene(true), SVG_SIZE)?;
    }

    Ok(())
}

fn handle_show(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    crate::plot::check_plot_size(args.width, args.height)?;
    let record = crate::io::read_band_json(&args.band)?;
    let points: Vec<(f64, f64)> = record.observations.points().collect();

    let plot = crate::plot::render_ascii_plot(&points, &record.segment, &record.band, args.width, args.height);
    println!("{plot}");

    if let Some(path) = &args.svg {
        let scene = ChartScene::new(&points, &record.segment, &record.band, true);
        crate::plot::write_svg(path, &scene, SVG_SIZE)?;
    }
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let t_value = match (args.t_value, args.confidence) {
        (_, Some(confidence)) => TValue::StudentT { confidence },
        (Some(value), None) => TValue::Fixed { value },
        (None, None) => TValue::default(),
    };

    crate::plot::check_plot_size(args.width, args.height)?;

    Ok(FitConfig {
        source: input_source_from_args(&args.input)?,
        t_value,
        grid_step: args.step,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
        svg: args.svg.clone(),
    })
}

fn input_source_from_args(args: &InputArgs) -> Result<InputSource, AppError> {
    if let Some(path) = &args.input {
        return Ok(InputSource::Csv(path.clone()));
    }
    if let (Some(x), Some(y)) = (&args.x, &args.y) {
        return Ok(InputSource::Inline {
            x: crate::io::parse_value_list(x)?,
            y: crate::io::parse_value_list(y)?,
        });
    }
    Ok(InputSource::Demo {
        seed: args.seed,
        count: args.count,
    })
}

/// Rewrite argv so `linfit` defaults to `linfit show`.
///
/// Rules:
/// - `linfit`                      -> `linfit show`
/// - `linfit --x 1,2,3 --y ...`    -> `linfit show --x 1,2,3 --y ...`
/// - `linfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("show".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "show" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "show flags".
    if arg1.starts_with('-') {
        argv.insert(1, "show".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_show() {
        assert_eq!(rewrite_args(argv(&["linfit"])), argv(&["linfit", "show"]));
        assert_eq!(
            rewrite_args(argv(&["linfit", "--demo", "--seed", "3"])),
            argv(&["linfit", "show", "--demo", "--seed", "3"])
        );
        assert_eq!(rewrite_args(argv(&["linfit", "--help"])), argv(&["linfit", "--help"]));
        assert_eq!(rewrite_args(argv(&["linfit", "fit"])), argv(&["linfit", "fit"]));
    }

    #[test]
    fn config_prefers_student_t_when_confidence_given() {
        let cli = crate::cli::Cli::try_parse_from(["linfit", "fit", "-c", "0.9", "--x", "1 2 3", "--y", "2 4 7"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args).unwrap();
        assert_eq!(config.t_value, TValue::StudentT { confidence: 0.9 });
        assert_eq!(
            config.source,
            InputSource::Inline {
                x: vec![1.0, 2.0, 3.0],
                y: vec![2.0, 4.0, 7.0]
            }
        );
    }

    #[test]
    fn config_defaults_to_fixed_t_and_demo() {
        let cli = crate::cli::Cli::try_parse_from(["linfit", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args).unwrap();
        assert_eq!(config.t_value, TValue::Fixed { value: 2.31 });
        assert_eq!(config.source, InputSource::Demo { seed: 42, count: 9 });
        assert!(config.plot);
    }

    #[test]
    fn oversized_plot_is_an_input_error() {
        let cli = crate::cli::Cli::try_parse_from(["linfit", "fit", "--width", "100000000"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let err = fit_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);

        let cli = crate::cli::Cli::try_parse_from(["linfit", "plot", "--band", "b.json", "--height", "100000000"]).unwrap();
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        let err = handle_plot(args).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("too large"), "{err}");
    }
}
