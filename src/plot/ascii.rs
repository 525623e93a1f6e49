//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - historical lines: one letter per series (`E`, `N`, `L`, `T`)
//! - forecast continuation: `.` line, starting at each series' anchor

use crate::domain::{SeriesKind, SeriesTrend};
use crate::report::fmt_count;

/// Render the historical + forecast chart for a set of series.
pub fn render_trend_plot(trends: &[SeriesTrend], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = period_range(trends) else {
        return "Plot: no data\n".to_string();
    };
    let Some((y_min, y_max)) = count_range(trends) else {
        return "Plot: no data\n".to_string();
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Historical lines first, then forecast dots (so history wins where the
    // two meet at the anchor), then point markers on top.
    for trend in trends {
        let glyph = series_glyph(trend.kind());
        let points: Vec<(f64, f64)> = trend
            .history
            .points
            .iter()
            .map(|p| (p.period as f64, p.count as f64))
            .collect();
        draw_polyline(&mut grid, &points, x_min, x_max, y_min, y_max, glyph);
    }

    for trend in trends {
        let points: Vec<(f64, f64)> = trend
            .stitched
            .points
            .iter()
            .map(|p| (p.period as f64, p.count))
            .collect();
        draw_polyline(&mut grid, &points, x_min, x_max, y_min, y_max, '.');
    }

    for trend in trends {
        let glyph = series_glyph(trend.kind());
        for point in &trend.history.points {
            let x = map_x(point.period as f64, x_min, x_max, width);
            let y = map_y(point.count as f64, y_min, y_max, height);
            grid[y][x] = glyph;
        }
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: years=[{}, {}] | count=[{}, {}]\n",
        x_min as i32,
        x_max as i32,
        fmt_count(y_min),
        fmt_count(y_max)
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str("Legend:");
    for trend in trends {
        out.push_str(&format!(
            " {}={}",
            series_glyph(trend.kind()),
            trend.kind().display_name()
        ));
    }
    out.push_str(" .=forecast\n");

    out
}

fn series_glyph(kind: SeriesKind) -> char {
    match kind {
        SeriesKind::Local => 'L',
        SeriesKind::Eu => 'E',
        SeriesKind::NonEu => 'N',
        SeriesKind::Unknown => 'U',
        SeriesKind::Combined => 'T',
    }
}

fn period_range(trends: &[SeriesTrend]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for trend in trends {
        for point in &trend.history.points {
            min_x = min_x.min(point.period as f64);
        }
        for point in &trend.stitched.points {
            max_x = max_x.max(point.period as f64);
        }
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn count_range(trends: &[SeriesTrend]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for trend in trends {
        for point in &trend.history.points {
            min_y = min_y.min(point.count as f64);
            max_y = max_y.max(point.count as f64);
        }
        for point in &trend.stitched.points {
            min_y = min_y.min(point.count);
            max_y = max_y.max(point.count);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
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

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if points.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((px, py)) = prev {
            draw_line(grid, px, py, cx, cy, ch);
        } else if grid[cy][cx] == ' ' {
            grid[cy][cx] = ch;
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish). Only writes to empty cells, so
/// earlier series keep their glyphs where lines cross.
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
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
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
    use crate::domain::{ForecastPoint, Series, SeriesPoint, StitchedSeries, TrendLine};

    #[test]
    fn plot_golden_snapshot_small() {
        let history = Series::new(
            SeriesKind::Combined,
            vec![
                SeriesPoint { period: 2019, count: 0 },
                SeriesPoint { period: 2020, count: 10 },
            ],
        );
        let forecast = vec![ForecastPoint { period: 2021, count: 20.0 }];
        let stitched = StitchedSeries {
            kind: SeriesKind::Combined,
            points: vec![
                ForecastPoint { period: 2020, count: 10.0 },
                ForecastPoint { period: 2021, count: 20.0 },
            ],
        };
        let trend = SeriesTrend {
            history,
            line: TrendLine { slope: 10.0, intercept: -20_190.0 },
            forecast,
            stitched,
        };

        let txt = render_trend_plot(&[trend], 11, 5);
        let expected = concat!(
            "Plot: years=[2019, 2021] | count=[-1, 21]\n",
            "         ..\n",
            "       ..  \n",
            "    TT.    \n",
            "  TT       \n",
            "TT         \n",
            "Legend: T=Total .=forecast\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_input_renders_placeholder() {
        assert_eq!(render_trend_plot(&[], 40, 10), "Plot: no data\n");
    }
}
