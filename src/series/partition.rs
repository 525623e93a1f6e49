//! Partition raw observations into per-category and combined series.
//!
//! Each category series is an independent, pure derivation from the same
//! observation set: there is no shared mutable table state, no
//! cross-category interpolation, and no forward/backward filling. The
//! combined series is the per-period sum over all four categories; a period
//! present in only some categories keeps the partial sum.

use std::collections::BTreeMap;

use crate::domain::{Category, Observation, Series, SeriesKind, SeriesPoint};
use crate::error::TrendError;

/// The five derived series for one observation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedSeries {
    pub local: Series,
    pub eu: Series,
    pub non_eu: Series,
    pub unknown: Series,
    pub combined: Series,
}

impl PartitionedSeries {
    pub fn get(&self, kind: SeriesKind) -> &Series {
        match kind {
            SeriesKind::Local => &self.local,
            SeriesKind::Eu => &self.eu,
            SeriesKind::NonEu => &self.non_eu,
            SeriesKind::Unknown => &self.unknown,
            SeriesKind::Combined => &self.combined,
        }
    }

    /// The series rendered and forecast downstream, in legend order.
    ///
    /// Unknown contributes to the combined total but is not itself
    /// forecast or charted.
    pub fn rendered(&self) -> [&Series; 4] {
        [&self.eu, &self.non_eu, &self.local, &self.combined]
    }
}

/// Split observations into four category series plus the combined series.
///
/// A period appearing more than once within a single category is rejected as
/// a data-integrity error. Summing silently would mask upstream duplicate
/// ingestion (e.g., the same yearly export loaded twice).
pub fn partition(observations: &[Observation]) -> Result<PartitionedSeries, TrendError> {
    let mut per_category: [BTreeMap<i32, u64>; 4] = Default::default();
    let mut combined: BTreeMap<i32, u64> = BTreeMap::new();

    for obs in observations {
        let period = obs.period();
        let slot = &mut per_category[category_index(obs.category)];
        if slot.insert(period, obs.count).is_some() {
            return Err(TrendError::duplicate_period(
                obs.category.series_kind(),
                period,
            ));
        }
        *combined.entry(period).or_insert(0) += obs.count;
    }

    let [local, eu, non_eu, unknown] = per_category;
    Ok(PartitionedSeries {
        local: to_series(SeriesKind::Local, local),
        eu: to_series(SeriesKind::Eu, eu),
        non_eu: to_series(SeriesKind::NonEu, non_eu),
        unknown: to_series(SeriesKind::Unknown, unknown),
        combined: to_series(SeriesKind::Combined, combined),
    })
}

fn category_index(category: Category) -> usize {
    match category {
        Category::Local => 0,
        Category::Eu => 1,
        Category::NonEu => 2,
        Category::Unknown => 3,
    }
}

fn to_series(kind: SeriesKind, totals: BTreeMap<i32, u64>) -> Series {
    // BTreeMap iteration is already ascending by period.
    let points = totals
        .into_iter()
        .map(|(period, count)| SeriesPoint { period, count })
        .collect();
    Series::new(kind, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(year: i32, category: Category, count: u64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            count,
            category,
        }
    }

    #[test]
    fn combined_sums_partial_periods() {
        let observations = vec![
            obs(2020, Category::Local, 50),
            obs(2020, Category::Eu, 30),
            obs(2021, Category::Local, 60),
        ];

        let split = partition(&observations).unwrap();
        assert_eq!(
            split.combined.points,
            vec![
                SeriesPoint { period: 2020, count: 80 },
                SeriesPoint { period: 2021, count: 60 },
            ]
        );
        assert_eq!(split.eu.points, vec![SeriesPoint { period: 2020, count: 30 }]);
        assert!(split.non_eu.is_empty());
        assert!(split.unknown.is_empty());
    }

    #[test]
    fn series_are_sorted_ascending_with_unique_periods() {
        // Deliberately unordered input.
        let observations = vec![
            obs(2022, Category::NonEu, 7),
            obs(2019, Category::NonEu, 3),
            obs(2021, Category::NonEu, 5),
        ];

        let split = partition(&observations).unwrap();
        let periods: Vec<i32> = split.non_eu.points.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![2019, 2021, 2022]);
        assert!(periods.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn duplicate_period_within_category_is_rejected() {
        let observations = vec![
            obs(2020, Category::Eu, 30),
            obs(2020, Category::Eu, 31),
        ];

        let err = partition(&observations).unwrap_err();
        assert_eq!(err, TrendError::duplicate_period(SeriesKind::Eu, 2020));
    }

    #[test]
    fn same_period_across_categories_is_fine() {
        let observations = vec![
            obs(2020, Category::Eu, 30),
            obs(2020, Category::NonEu, 40),
            obs(2020, Category::Local, 50),
            obs(2020, Category::Unknown, 1),
        ];

        let split = partition(&observations).unwrap();
        assert_eq!(
            split.combined.points,
            vec![SeriesPoint { period: 2020, count: 121 }]
        );
    }

    #[test]
    fn unknown_category_feeds_combined_total() {
        let observations = vec![
            obs(2020, Category::Local, 100),
            obs(2020, Category::Unknown, 5),
        ];

        let split = partition(&observations).unwrap();
        assert_eq!(split.combined.points[0].count, 105);
        assert_eq!(split.unknown.points[0].count, 5);
    }
}
