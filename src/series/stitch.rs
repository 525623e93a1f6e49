//! Join a historical series with its forecast for continuous rendering.
//!
//! The stitched series starts at the last historical point (the anchor) so
//! the rendered forecast line shares an endpoint with the historical line:
//! no visual gap, no overlapping periods. This component performs no numeric
//! computation.

use crate::domain::{ForecastPoint, Series, StitchedSeries};
use crate::error::TrendError;

/// Prepend the last historical point to the forecast points.
pub fn stitch(history: &Series, forecast: &[ForecastPoint]) -> Result<StitchedSeries, TrendError> {
    let anchor = history.last().ok_or(TrendError::EmptySeries {
        series: history.kind,
    })?;

    let mut points = Vec::with_capacity(forecast.len() + 1);
    points.push(ForecastPoint {
        period: anchor.period,
        count: anchor.count as f64,
    });
    points.extend_from_slice(forecast);

    Ok(StitchedSeries {
        kind: history.kind,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeriesKind, SeriesPoint};

    #[test]
    fn stitched_series_anchors_on_last_historical_point() {
        let history = Series::new(
            SeriesKind::Eu,
            vec![
                SeriesPoint { period: 2019, count: 90 },
                SeriesPoint { period: 2020, count: 120 },
            ],
        );
        let forecast = vec![
            ForecastPoint { period: 2021, count: 130.0 },
            ForecastPoint { period: 2022, count: 140.0 },
            ForecastPoint { period: 2023, count: 150.0 },
        ];

        let stitched = stitch(&history, &forecast).unwrap();

        // H forecast points plus the single anchor.
        assert_eq!(stitched.points.len(), forecast.len() + 1);
        assert_eq!(stitched.points[0].period, 2020);
        assert_eq!(stitched.points[0].count, 120.0);
        assert_eq!(&stitched.points[1..], &forecast[..]);
        assert!(
            stitched
                .points
                .windows(2)
                .all(|w| w[0].period < w[1].period)
        );
    }

    #[test]
    fn stitching_empty_history_fails() {
        let history = Series::new(SeriesKind::Local, vec![]);
        let err = stitch(&history, &[]).unwrap_err();
        assert_eq!(
            err,
            TrendError::EmptySeries {
                series: SeriesKind::Local
            }
        );
    }
}
