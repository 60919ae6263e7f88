//! Ratatui-based interactive chart window.
//!
//! Shows the observations, regression line and shaded confidence band, with a
//! small settings panel for the t multiplier, the grid step, and (for demo
//! data) the sample seed. The window stays open until `q` or `Esc`.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_fit};
use crate::domain::{DEFAULT_CONFIDENCE, DEFAULT_T_VALUE, FitConfig, InputSource, TValue};
use crate::error::AppError;
use crate::plot::{ChartTheme, SVG_SIZE, X_LABEL, Y_LABEL};

mod plotters_chart;

use plotters_chart::FitPlottersChart;

/// Directory for reports written with `d`.
const REPORT_DIR: &str = "reports";

/// Grid steps offered by the settings panel.
const GRID_STEPS: [f64; 6] = [0.1, 0.25, 0.5, 1.0, 2.0, 5.0];

/// Start the interactive view.
pub fn run(config: FitConfig) -> Result<(), AppError> {
    // Fit before touching the terminal so input errors print normally.
    let run = run_fit(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    TMode,
    Step,
    Seed,
}

impl Field {
    const ALL: [Field; 3] = [Field::TMode, Field::Step, Field::Seed];
}

struct App {
    config: FitConfig,
    run: RunOutput,
    theme: ChartTheme,
    selected_field: usize,
    status: String,
}

impl App {
    fn new(config: FitConfig, run: RunOutput) -> Self {
        let status = format!("Loaded {}.", run.source_label);
        Self {
            config,
            run,
            theme: ChartTheme::terminal(),
            selected_field: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the window should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('t') => {
                self.config.t_value = toggle_t_mode(self.config.t_value);
                self.refit();
            }
            KeyCode::Char('r') => self.resample(1),
            KeyCode::Char('s') => self.save_svg(),
            KeyCode::Char('d') => {
                match crate::report::write_fit_report(&PathBuf::from(REPORT_DIR), &self.run.observations, &self.run.fit) {
                    Ok(path) => self.status = format!("Wrote report: {}", path.display()),
                    Err(err) => self.status = format!("Report write failed: {err}"),
                }
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match Field::ALL[self.selected_field] {
            Field::TMode => {
                self.config.t_value = toggle_t_mode(self.config.t_value);
                self.refit();
            }
            Field::Step => {
                self.config.grid_step = next_grid_step(self.config.grid_step, delta);
                self.refit();
            }
            Field::Seed => self.resample(delta),
        }
    }

    fn resample(&mut self, delta: i32) {
        let InputSource::Demo { seed, .. } = &mut self.config.source else {
            self.status = "Resampling is only available for demo data.".to_string();
            return;
        };
        *seed = if delta >= 0 {
            seed.wrapping_add(1)
        } else {
            seed.wrapping_sub(1)
        };
        self.refit();
    }

    /// Re-run the fit; on failure keep the previous result and report it.
    fn refit(&mut self) {
        match run_fit(&self.config) {
            Ok(run) => {
                self.status = format!(
                    "t={:.4} ({}) | step={}",
                    run.fit.band.t,
                    self.config.t_value.display_name(),
                    self.config.grid_step
                );
                self.run = run;
            }
            Err(err) => {
                log::warn!("refit failed: {err}");
                self.status = format!("Refit failed: {err}");
            }
        }
    }

    fn save_svg(&mut self) {
        let path = self
            .config
            .svg
            .clone()
            .unwrap_or_else(|| PathBuf::from("linfit.svg"));
        let scene = self.run.scene(true);
        match crate::plot::write_svg(&path, &scene, SVG_SIZE) {
            Ok(()) => self.status = format!("Saved chart: {}", path.display()),
            Err(err) => self.status = format!("SVG write failed: {err}"),
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fit = &self.run.fit.fit;
        let band = &self.run.fit.band;

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("linfit", Style::default().fg(Color::Cyan)),
            Span::raw(" - Linear regression and confidence limits"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "{} | n={} | slope={:.4} | intercept={:.4} | sse={:.4} | t={:.4}",
                self.run.source_label, fit.n, fit.slope, fit.intercept, fit.sse, band.t,
            ),
            Style::default().fg(Color::Gray),
        )));

        let conf = band.t_value.confidence_label();
        lines.push(Line::from(vec![
            Span::styled("x", Style::default().fg(Color::White)),
            Span::raw(" Sample observations  "),
            Span::styled("─", Style::default().fg(Color::Red)),
            Span::raw(" Regression line  "),
            Span::styled("─", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" Lower/Upper confidence limit ({conf})")),
        ]));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Fit").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        // Terminal cells are not square, so equal axis scaling would only distort.
        let scene = self.run.scene(false);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = FitPlottersChart {
            scene: &scene,
            theme: &self.theme,
        };
        frame.render_widget(widget, chart_rect);

        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, scene.x_bounds, scene.y_bounds);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let seed = match &self.config.source {
            InputSource::Demo { seed, .. } => seed.to_string(),
            _ => "-".to_string(),
        };

        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|field| match field {
                Field::TMode => ListItem::new(format!("t: {}", self.config.t_value.display_name())),
                Field::Step => ListItem::new(format!("Step: {}", self.config.grid_step)),
                Field::Seed => ListItem::new(format!("Seed: {seed}")),
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  t t-mode  r resample  s svg  d report  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Switch between the fixed multiplier and the Student-t critical value.
fn toggle_t_mode(cur: TValue) -> TValue {
    match cur {
        TValue::Fixed { .. } => TValue::StudentT {
            confidence: DEFAULT_CONFIDENCE,
        },
        TValue::StudentT { .. } => TValue::Fixed {
            value: DEFAULT_T_VALUE,
        },
    }
}

/// Move to the neighboring preset step, or snap to the closest preset.
fn next_grid_step(cur: f64, delta: i32) -> f64 {
    let idx = GRID_STEPS
        .iter()
        .position(|&s| (s - cur).abs() < 1e-12)
        .map(|i| i as i64 + i64::from(delta.signum()))
        .unwrap_or_else(|| {
            GRID_STEPS
                .iter()
                .enumerate()
                .min_by(|a, b| (a.1 - cur).abs().total_cmp(&(b.1 - cur).abs()))
                .map(|(i, _)| i as i64)
                .unwrap_or(0)
        });
    GRID_STEPS[idx.clamp(0, GRID_STEPS.len() as i64 - 1) as usize]
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.1}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.1}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(X_LABEL)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(Y_LABEL).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1).max(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
