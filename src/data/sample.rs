//! Synthetic observation generation.
//!
//! Lets the tool run end-to-end without any data files: each category gets a
//! linear base trend with Gaussian noise, loosely shaped like a large
//! city's register (a big slowly-shrinking local population, growing EU and
//! non-EU groups, a tiny unknown remainder).
//!
//! Generation is fully seeded, so a given `(seed, years)` pair always
//! produces the same observation set.

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Category, Observation};
use crate::error::AppError;

/// First synthetic period.
const BASE_YEAR: i32 = 2015;

struct CategoryProfile {
    category: Category,
    /// Level in the first year.
    base: f64,
    /// Linear change per year.
    drift: f64,
    /// Noise standard deviation around the trend.
    noise: f64,
}

const PROFILES: [CategoryProfile; 4] = [
    CategoryProfile {
        category: Category::Local,
        base: 1_115_000.0,
        drift: -2_500.0,
        noise: 4_000.0,
    },
    CategoryProfile {
        category: Category::Eu,
        base: 85_000.0,
        drift: 2_600.0,
        noise: 1_500.0,
    },
    CategoryProfile {
        category: Category::NonEu,
        base: 260_000.0,
        drift: 9_000.0,
        noise: 3_500.0,
    },
    CategoryProfile {
        category: Category::Unknown,
        base: 1_800.0,
        drift: 40.0,
        noise: 120.0,
    },
];

/// Generate one observation per category per year, starting at `BASE_YEAR`.
pub fn generate_observations(seed: u64, years: usize) -> Result<Vec<Observation>, AppError> {
    if years < 2 {
        return Err(AppError::new(
            2,
            "Sample generation needs at least 2 years (one is not enough to fit a trend).",
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut observations = Vec::with_capacity(years * PROFILES.len());
    for step in 0..years {
        let year = BASE_YEAR + step as i32;
        let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Err(AppError::new(2, format!("Sample year {year} out of range.")));
        };
        for profile in &PROFILES {
            let z: f64 = normal.sample(&mut rng);
            let level = profile.base + profile.drift * step as f64 + profile.noise * z;
            observations.push(Observation {
                date,
                count: level.max(0.0).round() as u64,
                category: profile.category,
            });
        }
    }

    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_identical_observations() {
        let a = generate_observations(42, 8).unwrap();
        let b = generate_observations(42, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_observations(1, 8).unwrap();
        let b = generate_observations(2, 8).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn covers_every_category_every_year() {
        let years = 5;
        let observations = generate_observations(7, years).unwrap();
        assert_eq!(observations.len(), years * Category::ALL.len());

        for category in Category::ALL {
            let n = observations
                .iter()
                .filter(|obs| obs.category == category)
                .count();
            assert_eq!(n, years);
        }
    }

    #[test]
    fn rejects_degenerate_year_count() {
        assert!(generate_observations(42, 1).is_err());
    }
}
