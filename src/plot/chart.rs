//! Plotters chart of the fit: observations, regression line, confidence limits
//! and the shaded band between them.
//!
//! `ChartScene` is a render-only description: all series and bounds are
//! computed up front so drawing stays focused on drawing and the data prep
//! can be tested without a backend. `draw_chart` is generic over the Plotters
//! backend, so the same code paints into the terminal buffer and into SVG.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{ConfidenceBand, RegressionSegment};

pub const CHART_TITLE: &str = "Linear regression and confidence limits";
pub const X_LABEL: &str = "X values";
pub const Y_LABEL: &str = "Y values";

/// Series and bounds to draw.
#[derive(Debug, Clone)]
pub struct ChartScene {
    pub points: Vec<(f64, f64)>,
    pub segment: [(f64, f64); 2],
    pub lower: Vec<(f64, f64)>,
    pub upper: Vec<(f64, f64)>,
    /// Upper limit left to right, then lower limit right to left.
    pub band_polygon: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// e.g. `95%`, used in the legend.
    pub confidence_label: String,
}

impl ChartScene {
    /// Build a scene. With `equal_aspect`, the shorter axis span is widened so
    /// one unit has the same length on both axes of a square canvas.
    pub fn new(
        points: &[(f64, f64)],
        segment: &RegressionSegment,
        band: &ConfidenceBand,
        equal_aspect: bool,
    ) -> Self {
        let lower = band.lower_series();
        let upper = band.upper_series();

        let mut band_polygon = upper.clone();
        band_polygon.extend(lower.iter().rev().copied());

        let xs = points
            .iter()
            .map(|p| p.0)
            .chain(segment.x)
            .chain(band.points.iter().map(|p| p.x));
        let ys = points
            .iter()
            .map(|p| p.1)
            .chain(segment.y)
            .chain(band.points.iter().flat_map(|p| [p.lower, p.upper]));

        let mut x_bounds = padded_bounds(xs, 0.05);
        let mut y_bounds = padded_bounds(ys, 0.05);
        if equal_aspect {
            (x_bounds, y_bounds) = equalize_spans(x_bounds, y_bounds);
        }

        Self {
            points: points.to_vec(),
            segment: segment.points(),
            lower,
            upper,
            band_polygon,
            x_bounds,
            y_bounds,
            confidence_label: band.t_value.confidence_label(),
        }
    }
}

/// Colors, fonts and layout for one output target.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub points: RGBColor,
    pub line: RGBColor,
    pub band: RGBColor,
    pub band_alpha: f64,
    pub marker_size: u32,
    pub line_width: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub font: &'static str,
    pub label_size: u32,
    /// Smaller than `label_size`.
    pub legend_size: u32,
    pub caption: bool,
    pub legend: bool,
    pub fill_background: bool,
}

impl ChartTheme {
    /// Print-style theme for SVG files.
    pub fn light() -> Self {
        Self {
            background: WHITE,
            foreground: BLACK,
            points: BLACK,
            // xkcd "scarlet" and "grey blue".
            line: RGBColor(190, 1, 25),
            band: RGBColor(107, 139, 164),
            band_alpha: 0.3,
            marker_size: 4,
            line_width: 2,
            margin: 20,
            x_label_area: 50,
            y_label_area: 60,
            font: "sans-serif",
            label_size: 16,
            legend_size: 12,
            caption: true,
            legend: true,
            fill_background: true,
        }
    }

    /// High-contrast theme for low-resolution terminal rendering.
    ///
    /// Caption and legend are drawn by the surrounding widgets instead.
    pub fn terminal() -> Self {
        Self {
            background: BLACK,
            foreground: WHITE,
            points: WHITE,
            line: RGBColor(255, 0, 0),
            band: RGBColor(0, 255, 255),
            band_alpha: 0.3,
            marker_size: 1,
            line_width: 1,
            margin: 1,
            x_label_area: 3,
            y_label_area: 6,
            font: "sans-serif",
            label_size: 10,
            legend_size: 8,
            caption: false,
            legend: false,
            fill_background: false,
        }
    }
}

/// Draw the scene onto any Plotters drawing area.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &ChartScene,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if theme.fill_background {
        root.fill(&theme.background)?;
    }

    let [x0, x1] = scene.x_bounds;
    let [y0, y1] = scene.y_bounds;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(theme.margin)
        .set_label_area_size(LabelAreaPosition::Left, theme.y_label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, theme.x_label_area);
    if theme.caption {
        builder.caption(
            CHART_TITLE,
            (theme.font, theme.label_size + 4).into_font().color(&theme.foreground),
        );
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&|v| format!("{v:.1}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style((theme.font, theme.label_size).into_font().color(&theme.foreground))
        .axis_style(theme.foreground)
        .draw()?;

    // Shaded band first so lines and markers sit on top of it.
    let band_fill = theme.band.mix(theme.band_alpha).filled();
    if scene.band_polygon.len() >= 3 {
        chart.draw_series(std::iter::once(Polygon::new(scene.band_polygon.clone(), band_fill)))?;
    }

    let band_style = ShapeStyle::from(theme.band).stroke_width(theme.line_width);
    chart
        .draw_series(LineSeries::new(scene.lower.iter().copied(), band_style))?
        .label(format!("Lower confidence limit ({})", scene.confidence_label))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], band_style));
    chart
        .draw_series(LineSeries::new(scene.upper.iter().copied(), band_style))?
        .label(format!("Upper confidence limit ({})", scene.confidence_label))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], band_style));

    let line_style = ShapeStyle::from(theme.line).stroke_width(theme.line_width);
    chart
        .draw_series(LineSeries::new(scene.segment.iter().copied(), line_style))?
        .label("Regression line")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], line_style));

    let point_style = ShapeStyle::from(theme.points).stroke_width(1);
    let marker = theme.marker_size;
    chart
        .draw_series(scene.points.iter().map(|&p| Cross::new(p, marker, point_style)))?
        .label("Sample observations")
        .legend(move |(x, y)| Cross::new((x + 8, y), marker, point_style));

    if theme.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((theme.font, theme.legend_size).into_font().color(&theme.foreground))
            .background_style(theme.background.mix(0.8))
            .border_style(theme.foreground)
            .draw()?;
    }

    Ok(())
}

fn padded_bounds(values: impl Iterator<Item = f64>, frac: f64) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return [0.0, 1.0];
    }
    if hi <= lo {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = ((hi - lo) * frac).max(1e-12);
    [lo - pad, hi + pad]
}

/// Widen the narrower range around its center so both spans match.
fn equalize_spans(x: [f64; 2], y: [f64; 2]) -> ([f64; 2], [f64; 2]) {
    let span = (x[1] - x[0]).max(y[1] - y[0]);
    let widen = |r: [f64; 2]| {
        let mid = 0.5 * (r[0] + r[1]);
        [mid - 0.5 * span, mid + 0.5 * span]
    };
    (widen(x), widen(y))
}
