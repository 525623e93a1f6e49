//! Shared "trend pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load observations -> partition -> forecast (x4) -> stitch (x4)
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use rayon::prelude::*;

use crate::data::generate_observations;
use crate::domain::{DataSource, Observation, Series, SeriesKind, SeriesTrend, TrendConfig};
use crate::error::{AppError, TrendError};
use crate::forecast::forecast_series;
use crate::io::store::{load_observations, RowError};
use crate::series::{partition, stitch, PartitionedSeries};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub partitioned: PartitionedSeries,
    /// Successfully forecast series, in legend order.
    pub trends: Vec<SeriesTrend>,
    /// Series that could not be forecast, with the reason.
    pub skipped: Vec<(SeriesKind, TrendError)>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_trend(config: &TrendConfig) -> Result<RunOutput, AppError> {
    let (observations, row_errors) = match &config.source {
        DataSource::Dir(dir) => {
            let store = load_observations(dir)?;
            (store.observations, store.row_errors)
        }
        DataSource::Sample => (
            generate_observations(config.sample_seed, config.sample_years)?,
            Vec::new(),
        ),
    };

    run_trend_with_observations(config, observations, row_errors)
}

/// Execute the pipeline with pre-loaded observations.
///
/// This is useful for the TUI where we want to re-forecast (e.g., after a
/// horizon change) without re-reading the store.
pub fn run_trend_with_observations(
    config: &TrendConfig,
    observations: Vec<Observation>,
    row_errors: Vec<RowError>,
) -> Result<RunOutput, AppError> {
    // A bad horizon is a caller error; fail before any per-series work.
    if config.horizon < 1 {
        return Err(TrendError::InvalidHorizon {
            horizon: config.horizon,
        }
        .into());
    }

    let partitioned = partition(&observations)?;

    // The four forecasts are independent pure functions over their own
    // series, so they can run concurrently without shared state.
    let outcomes: Vec<(SeriesKind, Result<SeriesTrend, TrendError>)> = partitioned
        .rendered()
        .into_par_iter()
        .map(|series| (series.kind, trend_for(series, config.horizon)))
        .collect();

    let mut trends = Vec::new();
    let mut skipped = Vec::new();
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(trend) => trends.push(trend),
            Err(err) => skipped.push((kind, err)),
        }
    }

    Ok(RunOutput {
        observations,
        row_errors,
        partitioned,
        trends,
        skipped,
    })
}

fn trend_for(series: &Series, horizon: usize) -> Result<SeriesTrend, TrendError> {
    let forecast = forecast_series(series, horizon)?;
    let stitched = stitch(series, &forecast.points)?;
    Ok(SeriesTrend {
        history: series.clone(),
        line: forecast.line,
        forecast: forecast.points,
        stitched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::NaiveDate;

    fn obs(year: i32, category: Category, count: u64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            count,
            category,
        }
    }

    fn config(horizon: usize) -> TrendConfig {
        TrendConfig {
            source: DataSource::Sample,
            horizon,
            sample_seed: 42,
            sample_years: 10,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_trends: None,
        }
    }

    #[test]
    fn end_to_end_linear_example() {
        let observations = vec![
            obs(2018, Category::Eu, 100),
            obs(2019, Category::Eu, 110),
            obs(2020, Category::Eu, 120),
        ];

        let run = run_trend_with_observations(&config(3), observations, Vec::new()).unwrap();

        // Local and Non-EU are empty and skipped; EU and Total survive.
        assert_eq!(run.trends.len(), 2);
        assert_eq!(run.skipped.len(), 2);
        assert!(run
            .skipped
            .iter()
            .all(|(_, err)| matches!(err, TrendError::InsufficientData { .. })));

        let eu = run
            .trends
            .iter()
            .find(|t| t.kind() == SeriesKind::Eu)
            .unwrap();
        let forecast: Vec<(i32, f64)> = eu.forecast.iter().map(|p| (p.period, p.count)).collect();
        assert_eq!(forecast.len(), 3);
        for (got, want) in forecast.iter().zip([(2021, 130.0), (2022, 140.0), (2023, 150.0)]) {
            assert_eq!(got.0, want.0);
            assert!((got.1 - want.1).abs() < 1e-6);
        }

        // Stitched = anchor + H forecast points.
        assert_eq!(eu.stitched.points.len(), 4);
        assert_eq!(eu.stitched.points[0].period, 2020);
        assert_eq!(eu.stitched.points[0].count, 120.0);
    }

    #[test]
    fn partial_series_fail_independently() {
        let observations = vec![
            obs(2019, Category::Eu, 100),
            obs(2020, Category::Eu, 110),
            // Only one Local period: skipped, but it still feeds the total.
            obs(2020, Category::Local, 500),
        ];

        let run = run_trend_with_observations(&config(2), observations, Vec::new()).unwrap();

        let kinds: Vec<SeriesKind> = run.trends.iter().map(|t| t.kind()).collect();
        assert!(kinds.contains(&SeriesKind::Eu));
        assert!(kinds.contains(&SeriesKind::Combined));
        assert!(run
            .skipped
            .iter()
            .any(|(kind, _)| *kind == SeriesKind::Local));

        let total = run
            .trends
            .iter()
            .find(|t| t.kind() == SeriesKind::Combined)
            .unwrap();
        assert_eq!(
            total
                .history
                .points
                .iter()
                .map(|p| (p.period, p.count))
                .collect::<Vec<_>>(),
            vec![(2019, 100), (2020, 610)]
        );
    }

    #[test]
    fn zero_horizon_fails_the_whole_run() {
        let observations = vec![obs(2019, Category::Eu, 100), obs(2020, Category::Eu, 110)];
        let err = run_trend_with_observations(&config(0), observations, Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn duplicate_period_fails_the_whole_run() {
        let observations = vec![obs(2020, Category::Eu, 100), obs(2020, Category::Eu, 110)];
        let err = run_trend_with_observations(&config(3), observations, Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn sample_source_runs_end_to_end() {
        let run = run_trend(&config(3)).unwrap();
        assert_eq!(run.trends.len(), 4);
        assert!(run.skipped.is_empty());
        for trend in &run.trends {
            assert_eq!(trend.forecast.len(), 3);
            assert_eq!(trend.stitched.points.len(), 4);
        }
    }
}
