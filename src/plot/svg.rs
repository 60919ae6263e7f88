//! SVG output of the fit chart.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::chart::{ChartScene, ChartTheme, draw_chart};

/// Side length of the square SVG canvas, in pixels.
pub const SVG_SIZE: u32 = 800;

/// Draw the chart into an SVG file.
pub fn write_svg(path: &Path, scene: &ChartScene, size: u32) -> Result<(), AppError> {
    let root = SVGBackend::new(path, (size, size)).into_drawing_area();
    draw_chart(&root, scene, &ChartTheme::light())
        .map_err(|e| AppError::internal(format!("Failed to draw SVG chart: {e}")))?;
    root.present()
        .map_err(|e| AppError::input(format!("Failed to write SVG '{}': {e}", path.display())))?;

    log::info!("wrote chart to {}", path.display());
    Ok(())
}

/// Draw the chart into an in-memory SVG document.
pub fn render_svg_string(scene: &ChartScene, size: u32) -> Result<String, AppError> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (size, size)).into_drawing_area();
        draw_chart(&root, scene, &ChartTheme::light())
            .map_err(|e| AppError::internal(format!("Failed to draw SVG chart: {e}")))?;
        root.present()
            .map_err(|e| AppError::internal(format!("Failed to finish SVG chart: {e}")))?;
    }
    Ok(buf)
}
