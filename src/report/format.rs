//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the partitioning/forecasting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{DataSource, TrendConfig};

/// How many row-level errors to show before truncating.
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Format the full run summary (dataset stats + per-series trend table).
pub fn format_run_summary(run: &RunOutput, config: &TrendConfig) -> String {
    let mut out = String::new();

    out.push_str("=== poptrend - Population Trend Forecast ===\n");
    match &config.source {
        DataSource::Dir(dir) => {
            out.push_str(&format!("Source: data dir '{}'\n", dir.display()));
        }
        DataSource::Sample => {
            out.push_str(&format!(
                "Source: synthetic sample (seed={}, years={})\n",
                config.sample_seed, config.sample_years
            ));
        }
    }

    let years = year_range(run);
    match years {
        Some((min, max)) => out.push_str(&format!(
            "Observations: n={} | years=[{min}, {max}]\n",
            run.observations.len()
        )),
        None => out.push_str(&format!("Observations: n={}\n", run.observations.len())),
    }
    out.push_str(&format!("Horizon: {} year(s)\n", config.horizon));

    out.push_str("\nPer-series trends:\n");
    for trend in &run.trends {
        let name = trend.kind().display_name();
        let last = trend.history.last();
        let final_point = trend.forecast.last();
        match (last, final_point) {
            (Some(last), Some(final_point)) => out.push_str(&format!(
                "  {name:<8} n={:<3} last={} ({}) slope={:+.1}/yr {} -> {:.1}\n",
                trend.history.points.len(),
                last.count,
                last.period,
                trend.line.slope,
                final_point.period,
                final_point.count
            )),
            // A trend always has history and >= 1 forecast point; this arm
            // only keeps the formatter total.
            _ => out.push_str(&format!("  {name:<8} (empty)\n")),
        }
    }
    for (kind, reason) in &run.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", kind.display_name()));
    }

    if !run.row_errors.is_empty() {
        out.push_str(&format!("\nRow errors ({} total):\n", run.row_errors.len()));
        for err in run.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
            out.push_str(&format!("  - {}:{}: {}\n", err.file, err.line, err.message));
        }
        if run.row_errors.len() > MAX_ROW_ERRORS_SHOWN {
            out.push_str(&format!(
                "  ... and {} more\n",
                run.row_errors.len() - MAX_ROW_ERRORS_SHOWN
            ));
        }
    }

    out
}

fn year_range(run: &RunOutput) -> Option<(i32, i32)> {
    let min = run.observations.iter().map(|obs| obs.period()).min()?;
    let max = run.observations.iter().map(|obs| obs.period()).max()?;
    Some((min, max))
}

/// Compact count formatting for chart axes: thousands as `Nk`.
///
/// Matches the presentation convention for population axes; exact values
/// stay available in the table and exports.
pub fn fmt_count(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}k", value / 1000.0)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_trend_with_observations;
    use crate::domain::{Category, Observation};
    use chrono::NaiveDate;

    #[test]
    fn count_formatting_switches_to_thousands() {
        assert_eq!(fmt_count(0.0), "0");
        assert_eq!(fmt_count(950.0), "950");
        assert_eq!(fmt_count(1500.0), "2k");
        assert_eq!(fmt_count(1_637_000.0), "1637k");
        assert_eq!(fmt_count(-12_000.0), "-12k");
    }

    #[test]
    fn summary_names_series_and_skips() {
        let observations = vec![
            Observation {
                date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
                count: 100,
                category: Category::Eu,
            },
            Observation {
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                count: 110,
                category: Category::Eu,
            },
        ];
        let config = TrendConfig {
            source: DataSource::Sample,
            horizon: 2,
            sample_seed: 42,
            sample_years: 10,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_trends: None,
        };
        let run = run_trend_with_observations(&config, observations, Vec::new()).unwrap();

        let summary = format_run_summary(&run, &config);
        assert!(summary.contains("years=[2019, 2020]"));
        assert!(summary.contains("EU"));
        assert!(summary.contains("Total"));
        assert!(summary.contains("(skipped Local)"));
        assert!(summary.contains("(skipped Non-EU)"));
    }
}
