//! Plotters-powered trend chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::SeriesKind;

/// Terminal color for one series, shared by the chart and the legend.
pub fn series_rgb(kind: SeriesKind) -> (u8, u8, u8) {
    match kind {
        SeriesKind::Eu => (0, 128, 255),
        SeriesKind::NonEu => (255, 64, 64),
        SeriesKind::Local => (255, 255, 0),
        SeriesKind::Unknown => (160, 160, 160),
        SeriesKind::Combined => (0, 255, 0),
    }
}

/// Forecast segments are drawn in a neutral gray so every series' projected
/// part reads the same way.
const FORECAST_RGB: (u8, u8, u8) = (200, 200, 200);

/// One line on the chart: the historical polyline plus its stitched
/// continuation (anchor included, so the two segments meet).
pub struct ChartSeries {
    pub color: (u8, u8, u8),
    pub history: Vec<(f64, f64)>,
    pub forecast: Vec<(f64, f64)>,
}

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
pub struct TrendPlottersChart<'a> {
    pub series: &'a [ChartSeries],
    /// X bounds (period, calendar year).
    pub x_bounds: [f64; 2],
    /// Y bounds (population count).
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for TrendPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough here.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let forecast_color = RGBColor(FORECAST_RGB.0, FORECAST_RGB.1, FORECAST_RGB.2);

            for series in self.series {
                let (r, g, b) = series.color;
                let color = RGBColor(r, g, b);

                // 1) Historical line.
                chart.draw_series(LineSeries::new(series.history.iter().copied(), &color))?;

                // 2) Stitched forecast continuation.
                chart.draw_series(LineSeries::new(
                    series.forecast.iter().copied(),
                    &forecast_color,
                ))?;

                // 3) Forecast point markers.
                //
                // We intentionally avoid `Circle` markers here. The underlying
                // `plotters-ratatui-backend` currently maps circle radii incorrectly
                // (pixel radius -> normalized canvas units), producing huge circles.
                //
                // A colored `Pixel` gives a clean “dot” marker that looks good in
                // terminals and reliably overrides the gray forecast line.
                chart.draw_series(
                    series
                        .forecast
                        .iter()
                        .skip(1)
                        .map(|&(x, y)| Pixel::new((x, y), color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
