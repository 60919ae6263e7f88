//! Plotters-powered fit chart widget for Ratatui.
//!
//! The widget only paints a precomputed `ChartScene`; series and bounds come
//! from `plot::chart`. Rendering goes through `plotters-ratatui-backend`,
//! which draws Plotters primitives via Ratatui's `Canvas` widget.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{ChartScene, ChartTheme, draw_chart};

pub struct FitPlottersChart<'a> {
    pub scene: &'a ChartScene,
    pub theme: &'a ChartTheme,
}

impl<'a> Widget for FitPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.scene.x_bounds;
        let [y0, y1] = self.scene.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let scene = self.scene;
        let theme = self.theme;
        let widget = widget_fn(move |root| draw_chart(&root, scene, theme));

        widget.render(area, buf);
    }
}
