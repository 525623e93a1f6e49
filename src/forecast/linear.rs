//! Linear trend fit and extrapolation for one series.
//!
//! The model is deliberately minimal: ordinary least squares with the period
//! (calendar year, as a numeric ordinal) as the single explanatory variable
//! and the total count as the response. No regularization, no seasonality,
//! no confidence intervals.
//!
//! Predictions are raw evaluations of the fitted line: not rounded, not
//! clamped. A declining trend may predict negative counts; that is the
//! model's honest answer, not a bug to correct here.

use std::collections::BTreeMap;

use crate::domain::{ForecastPoint, Series, TrendLine};
use crate::error::TrendError;
use crate::math::fit_line;

/// Fit output for a single series: the line plus exactly H forecast points.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesForecast {
    pub line: TrendLine,
    pub points: Vec<ForecastPoint>,
}

/// Fit a trend over `series` and extrapolate `horizon` future periods.
///
/// Forecast periods are consecutive, starting immediately after the last
/// observed period. Deterministic: identical input always yields identical
/// output.
pub fn forecast_series(series: &Series, horizon: usize) -> Result<SeriesForecast, TrendError> {
    if horizon < 1 {
        return Err(TrendError::InvalidHorizon { horizon });
    }

    // One total per distinct period. Partitioner output already has unique
    // periods, so this is a no-op there; a caller-built series with
    // duplicates gets them summed.
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for point in &series.points {
        *totals.entry(point.period).or_insert(0.0) += point.count as f64;
    }

    if totals.len() < 2 {
        return Err(TrendError::InsufficientData {
            series: series.kind,
            distinct_periods: totals.len(),
        });
    }

    let pairs: Vec<(i32, f64)> = totals.iter().map(|(&p, &c)| (p, c)).collect();

    // With >= 2 distinct finite periods the 2-column system has full rank;
    // a solver refusal means the regression is undetermined after all.
    let line = fit_line(&pairs).ok_or(TrendError::InsufficientData {
        series: series.kind,
        distinct_periods: totals.len(),
    })?;

    let last_period = pairs[pairs.len() - 1].0;
    let points = (1..=horizon as i32)
        .map(|step| {
            let period = last_period + step;
            ForecastPoint {
                period,
                count: line.predict(period),
            }
        })
        .collect();

    Ok(SeriesForecast { line, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeriesKind, SeriesPoint};

    fn series(kind: SeriesKind, points: &[(i32, u64)]) -> Series {
        Series::new(
            kind,
            points
                .iter()
                .map(|&(period, count)| SeriesPoint { period, count })
                .collect(),
        )
    }

    #[test]
    fn recovers_exact_linear_trend() {
        let history = series(SeriesKind::Eu, &[(2018, 100), (2019, 110), (2020, 120)]);

        let forecast = forecast_series(&history, 3).unwrap();

        let periods: Vec<i32> = forecast.points.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![2021, 2022, 2023]);
        let expected = [130.0, 140.0, 150.0];
        for (point, want) in forecast.points.iter().zip(expected) {
            assert!(
                (point.count - want).abs() < 1e-6,
                "period {}: got {}, want {want}",
                point.period,
                point.count
            );
        }
    }

    #[test]
    fn horizon_one_is_valid() {
        let history = series(SeriesKind::Local, &[(2019, 10), (2020, 20)]);
        let forecast = forecast_series(&history, 1).unwrap();
        assert_eq!(forecast.points.len(), 1);
        assert_eq!(forecast.points[0].period, 2021);
    }

    #[test]
    fn declining_trend_may_predict_negative_counts() {
        let history = series(SeriesKind::NonEu, &[(2018, 30), (2019, 20), (2020, 10)]);

        let forecast = forecast_series(&history, 2).unwrap();

        assert!((forecast.points[0].count - 0.0).abs() < 1e-6);
        assert!(forecast.points[1].count < 0.0);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let history = series(SeriesKind::Combined, &[(2015, 123), (2017, 456), (2020, 789)]);

        let a = forecast_series(&history, 5).unwrap();
        let b = forecast_series(&history, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_periods_are_summed_before_fitting() {
        // Not partitioner output: duplicates are legal here and get summed.
        let history = series(SeriesKind::Eu, &[(2019, 60), (2019, 40), (2020, 110)]);

        let forecast = forecast_series(&history, 1).unwrap();

        // Totals (2019,100),(2020,110) => slope 10.
        assert!((forecast.line.slope - 10.0).abs() < 1e-9);
        assert!((forecast.points[0].count - 120.0).abs() < 1e-6);
    }

    #[test]
    fn single_distinct_period_is_insufficient() {
        let history = series(SeriesKind::Unknown, &[(2020, 100)]);

        let err = forecast_series(&history, 3).unwrap_err();
        assert_eq!(
            err,
            TrendError::InsufficientData {
                series: SeriesKind::Unknown,
                distinct_periods: 1
            }
        );
    }

    #[test]
    fn zero_horizon_is_rejected_even_with_good_data() {
        let history = series(SeriesKind::Eu, &[(2019, 10), (2020, 20)]);

        let err = forecast_series(&history, 0).unwrap_err();
        assert_eq!(err, TrendError::InvalidHorizon { horizon: 0 });
    }
}
