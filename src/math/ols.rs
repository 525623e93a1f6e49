//! Ordinary least squares for the per-series trend line.
//!
//! Each series is modeled as a straight line in the period (calendar year):
//!
//! ```text
//! minimize Σ (count_i - (slope * period_i + intercept))^2
//! ```
//!
//! Implementation choices:
//! - We solve the 2-column least-squares problem via SVD, which handles tall
//!   design matrices robustly. (Nalgebra's `QR::solve` is intended for square
//!   systems and will panic for non-square matrices.)
//! - Periods are centered on their mean before solving. Raw calendar years
//!   (~2000) against an intercept column produce a poorly scaled matrix;
//!   centering keeps the columns near-orthogonal, and the uncentered
//!   intercept is recovered exactly afterwards.

use nalgebra::{DMatrix, DVector};

use crate::domain::TrendLine;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `count = slope * period + intercept` over `(period, count)` pairs.
///
/// Returns `None` when the regression is undetermined (fewer than 2 rows,
/// all periods identical, or a degenerate solve).
pub fn fit_line(points: &[(i32, f64)]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len();
    let mean: f64 = points.iter().map(|&(p, _)| p as f64).sum::<f64>() / n as f64;
    if points.iter().all(|&(p, _)| p == points[0].0) {
        return None;
    }

    let mut design = DMatrix::zeros(n, 2);
    let mut response = DVector::zeros(n);
    for (i, &(period, count)) in points.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = period as f64 - mean;
        response[i] = count;
    }

    let beta = solve_least_squares(&design, &response)?;

    // Undo the centering: y = b0 + b1*(x - mean) = (b0 - b1*mean) + b1*x.
    let slope = beta[1];
    let intercept = beta[0] - slope * mean;
    Some(TrendLine { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_exact_line_on_calendar_years() {
        // count = 10*year - 20080, i.e. 100, 110, 120 over 2018..2020.
        let points = vec![(2018, 100.0), (2019, 110.0), (2020, 120.0)];
        let line = fit_line(&points).unwrap();
        assert!((line.slope - 10.0).abs() < 1e-9);
        assert!((line.predict(2021) - 130.0).abs() < 1e-6);
    }

    #[test]
    fn fit_line_rejects_single_distinct_period() {
        assert!(fit_line(&[(2020, 100.0)]).is_none());
        assert!(fit_line(&[(2020, 100.0), (2020, 200.0)]).is_none());
    }
}
