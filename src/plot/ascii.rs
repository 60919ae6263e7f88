//! Character-grid chart of the fit.
//!
//! Grid size is clamped to `MIN_PLOT_*..=MAX_PLOT_*`; callers taking sizes
//! from the command line validate them with `check_plot_size` first.
//!
//! Plot elements, in drawing order (later ones win):
//! - confidence band: `:` inside, `.` on the lower/upper limits
//! - regression line: `-`
//! - observations: `x`

use crate::domain::{BandPoint, ConfidenceBand, RegressionSegment};
use crate::error::AppError;

pub const MIN_PLOT_WIDTH: usize = 10;
pub const MIN_PLOT_HEIGHT: usize = 5;
pub const MAX_PLOT_WIDTH: usize = 1000;
pub const MAX_PLOT_HEIGHT: usize = 500;

/// Reject plot sizes above `MAX_PLOT_WIDTH` x `MAX_PLOT_HEIGHT`.
pub fn check_plot_size(width: usize, height: usize) -> Result<(), AppError> {
    if width > MAX_PLOT_WIDTH || height > MAX_PLOT_HEIGHT {
        return Err(AppError::input(format!(
            "Plot size {width}x{height} is too large; the maximum is {MAX_PLOT_WIDTH}x{MAX_PLOT_HEIGHT}."
        )));
    }
    Ok(())
}

/// Render the observations, regression line and confidence band.
pub fn render_ascii_plot(
    points: &[(f64, f64)],
    segment: &RegressionSegment,
    band: &ConfidenceBand,
    width: usize,
    height: usize,
) -> String {
    let width = width.clamp(MIN_PLOT_WIDTH, MAX_PLOT_WIDTH);
    let height = height.clamp(MIN_PLOT_HEIGHT, MAX_PLOT_HEIGHT);

    let (x_min, x_max) = x_range(points, band).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(points, segment, band).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_band(&mut grid, &band.points, x_min, x_max, y_min, y_max);

    let [(sx0, sy0), (sx1, sy1)] = segment.points();
    draw_line(
        &mut grid,
        map_x(sx0, x_min, x_max, width),
        map_y(sy0, y_min, y_max, height),
        map_x(sx1, x_min, x_max, width),
        map_y(sy1, y_min, y_max, height),
        '-',
    );

    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'x';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!(
        "x observations | - regression line | . {} confidence limits | : band\n",
        band.t_value.confidence_label()
    ));

    out
}

fn x_range(points: &[(f64, f64)], band: &ConfidenceBand) -> Option<(f64, f64)> {
    let xs = points
        .iter()
        .map(|&(x, _)| x)
        .chain(band.points.iter().map(|p| p.x));
    finite_range(xs)
}

fn y_range(points: &[(f64, f64)], segment: &RegressionSegment, band: &ConfidenceBand) -> Option<(f64, f64)> {
    let ys = points
        .iter()
        .map(|&(_, y)| y)
        .chain(segment.y)
        .chain(band.points.iter().flat_map(|p| [p.lower, p.upper]));
    finite_range(ys)
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() && hi > lo {
        Some((lo, hi))
    } else if lo.is_finite() && hi.is_finite() {
        Some((lo - 0.5, hi + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Column-x inverse of `map_x`.
fn column_x(col: usize, x_min: f64, x_max: f64, width: usize) -> f64 {
    x_min + col as f64 / (width as f64 - 1.0) * (x_max - x_min)
}

/// Linearly interpolated `(lower, upper)` at `x`, or `None` outside the grid.
fn band_at(points: &[BandPoint], x: f64) -> Option<(f64, f64)> {
    let first = points.first()?;
    let last = points.last()?;
    if x < first.x || x > last.x {
        return None;
    }
    if points.len() == 1 {
        return Some((first.lower, first.upper));
    }

    let i = points
        .windows(2)
        .position(|w| x >= w[0].x && x <= w[1].x)?;
    let (a, b) = (&points[i], &points[i + 1]);
    let span = b.x - a.x;
    let u = if span > 0.0 { (x - a.x) / span } else { 0.0 };
    Some((
        a.lower + u * (b.lower - a.lower),
        a.upper + u * (b.upper - a.upper),
    ))
}

fn draw_band(grid: &mut [Vec<char>], band: &[BandPoint], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut mark = |col: usize, lower: f64, upper: f64| {
        let top = map_y(upper, y_min, y_max, height);
        let bottom = map_y(lower, y_min, y_max, height);
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[col] = ':';
        }
        grid[top][col] = '.';
        grid[bottom][col] = '.';
    };

    // A single grid point would fall between columns; pin it to its column.
    if let [only] = band {
        mark(map_x(only.x, x_min, x_max, width), only.lower, only.upper);
        return;
    }

    for col in 0..width {
        if let Some((lower, upper)) = band_at(band, column_x(col, x_min, x_max, width)) {
            mark(col, lower, upper);
        }
    }
}

/// Integer line drawing (Bresenham-ish). Observations drawn later stay on top.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observations, TValue};
    use crate::fit::fit_and_band;

    #[test]
    fn plot_golden_snapshot_small() {
        let obs = Observations::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();
        let out = fit_and_band(&obs, TValue::default(), 1.0).unwrap();
        let points: Vec<(f64, f64)> = obs.points().collect();

        let txt = render_ascii_plot(&points, &out.segment, &out.band, 10, 5);
        let expected = concat!(
            "Plot: x=[0.000, 2.000] | y=[-0.10, 2.10]\n",
            "        -x\n",
            "      --. \n",
            "    -x    \n",
            " .--      \n",
            "x-        \n",
            "x observations | - regression line | . 95% confidence limits | : band\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn wide_band_is_filled_between_limits() {
        let obs = Observations::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![0.0, 3.0, 0.5, 3.5, 1.0],
        )
        .unwrap();
        let out = fit_and_band(&obs, TValue::default(), 1.0).unwrap();
        let points: Vec<(f64, f64)> = obs.points().collect();

        let txt = render_ascii_plot(&points, &out.segment, &out.band, 40, 20);
        let lines: Vec<&str> = txt.lines().collect();
        let body = &lines[1..lines.len() - 1];
        assert_eq!(body.len(), 20);
        assert!(body.iter().any(|l| l.contains(':')), "band interior missing:\n{txt}");
        assert!(body.iter().any(|l| l.contains('.')));
        let markers: usize = body.iter().map(|l| l.matches('x').count()).sum();
        assert_eq!(markers, 5, "{txt}");
    }

    #[test]
    fn band_interpolates_between_grid_points() {
        let pts = [
            BandPoint { x: 0.0, predicted: 0.0, half_width: 1.0, lower: -1.0, upper: 1.0 },
            BandPoint { x: 2.0, predicted: 2.0, half_width: 1.0, lower: 1.0, upper: 3.0 },
        ];
        let (lo, hi) = band_at(&pts, 1.0).unwrap();
        assert!((lo - 0.0).abs() < 1e-12 && (hi - 2.0).abs() < 1e-12);
        assert!(band_at(&pts, 2.5).is_none());
    }
}
