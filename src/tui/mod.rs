//! Ratatui-based terminal UI.
//!
//! The TUI renders the historical category series and their stitched
//! forecasts as one chart, with keys to adjust the horizon (and reseed the
//! sample) without restarting the program.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};

use crate::app::pipeline::{run_trend_with_observations, RunOutput};
use crate::data::generate_observations;
use crate::domain::{DataSource, Observation, TrendConfig};
use crate::error::AppError;
use crate::io::store::{load_observations, RowError};
use crate::report::fmt_count;

mod plotters_chart;

use plotters_chart::{series_rgb, ChartSeries, TrendPlottersChart};

const MAX_HORIZON: usize = 50;

/// Start the TUI.
pub fn run(config: TrendConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

fn load_source(config: &TrendConfig) -> Result<(Vec<Observation>, Vec<RowError>), AppError> {
    match &config.source {
        DataSource::Dir(dir) => {
            let store = load_observations(dir)?;
            Ok((store.observations, store.row_errors))
        }
        DataSource::Sample => Ok((
            generate_observations(config.sample_seed, config.sample_years)?,
            Vec::new(),
        )),
    }
}

struct App {
    config: TrendConfig,
    observations: Vec<Observation>,
    row_errors: Vec<RowError>,
    run: RunOutput,
    status: String,
}

impl App {
    fn new(config: TrendConfig) -> Result<Self, AppError> {
        let (observations, row_errors) = load_source(&config)?;
        let run =
            run_trend_with_observations(&config, observations.clone(), row_errors.clone())?;
        let status = format!(
            "{} series forecast, {} skipped.",
            run.trends.len(),
            run.skipped.len()
        );
        Ok(Self {
            config,
            observations,
            row_errors,
            run,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                if self.config.horizon < MAX_HORIZON {
                    self.config.horizon += 1;
                    self.refit();
                }
            }
            KeyCode::Char('-') | KeyCode::Left => {
                if self.config.horizon > 1 {
                    self.config.horizon -= 1;
                    self.refit();
                }
            }
            KeyCode::Char('r') => {
                if matches!(self.config.source, DataSource::Sample) {
                    self.config.sample_seed = self.config.sample_seed.wrapping_add(1);
                    match generate_observations(self.config.sample_seed, self.config.sample_years) {
                        Ok(observations) => {
                            self.observations = observations;
                            self.refit();
                            self.status = format!("Resampled (seed={}).", self.config.sample_seed);
                        }
                        Err(err) => self.status = format!("Resample failed: {err}"),
                    }
                } else {
                    self.status = "Resampling only applies to --sample runs.".to_string();
                }
            }
            _ => {}
        }
        false
    }

    fn refit(&mut self) {
        match run_trend_with_observations(
            &self.config,
            self.observations.clone(),
            self.row_errors.clone(),
        ) {
            Ok(run) => {
                self.status = format!(
                    "horizon={} | {} series forecast, {} skipped.",
                    self.config.horizon,
                    run.trends.len(),
                    run.skipped.len()
                );
                self.run = run;
            }
            Err(err) => {
                // Keep the previous run on screen; the failure is transient
                // state (e.g., a resample), not a reason to tear down the UI.
                self.status = format!("Refit failed: {err}");
            }
        }
    }

    fn draw(&self, f: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(f.area());

        let source = match &self.config.source {
            DataSource::Dir(dir) => format!("data dir '{}'", dir.display()),
            DataSource::Sample => format!("sample (seed={})", self.config.sample_seed),
        };
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "poptrend - Population Trend Forecast",
                Style::default().fg(Color::Cyan),
            )),
            Line::from(format!(
                "Source: {source} | observations: {} | horizon: {} year(s)",
                self.observations.len(),
                self.config.horizon
            )),
            Line::from(self.status.clone()),
        ]);
        f.render_widget(header, chunks[0]);

        self.draw_chart(f, chunks[1]);

        let mut legend: Vec<Span> = vec![Span::raw("Legend: ")];
        for trend in &self.run.trends {
            let (r, g, b) = series_rgb(trend.kind());
            legend.push(Span::styled(
                format!("■ {}  ", trend.kind().display_name()),
                Style::default().fg(Color::Rgb(r, g, b)),
            ));
        }
        legend.push(Span::styled(
            "■ forecast",
            Style::default().fg(Color::Gray),
        ));
        let footer = Paragraph::new(vec![
            Line::from(legend),
            Line::from("q quit | +/- horizon | r resample"),
        ]);
        f.render_widget(footer, chunks[2]);
    }

    fn draw_chart(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let mut series = Vec::with_capacity(self.run.trends.len());
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for trend in &self.run.trends {
            let history: Vec<(f64, f64)> = trend
                .history
                .points
                .iter()
                .map(|p| (p.period as f64, p.count as f64))
                .collect();
            let forecast: Vec<(f64, f64)> = trend
                .stitched
                .points
                .iter()
                .map(|p| (p.period as f64, p.count))
                .collect();

            for &(x, y) in history.iter().chain(forecast.iter()) {
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }

            series.push(ChartSeries {
                color: series_rgb(trend.kind()),
                history,
                forecast,
            });
        }

        // A little vertical padding keeps lines off the axis frame.
        let pad = ((y_max - y_min).abs() * 0.05).max(1.0);

        let chart = TrendPlottersChart {
            series: &series,
            x_bounds: [x_min, x_max],
            y_bounds: [y_min - pad, y_max + pad],
            x_label: "Year",
            y_label: "Population",
            fmt_x: |v| format!("{}", v.round() as i32),
            fmt_y: fmt_count,
        };
        f.render_widget(chart, area);
    }
}
