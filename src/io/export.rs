//! Export per-point pipeline results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per (series, period), with a `segment` column telling
//! historical and forecast rows apart.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::SeriesTrend;
use crate::error::AppError;

/// Write all historical and forecast points to a CSV file.
pub fn write_results_csv(path: &Path, trends: &[SeriesTrend]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "series,period,count,segment")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for trend in trends {
        let name = trend.kind().display_name();
        for point in &trend.history.points {
            writeln!(file, "{name},{},{},historical", point.period, point.count)
                .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
        }
        for point in &trend.forecast {
            writeln!(file, "{name},{},{:.4},forecast", point.period, point.count)
                .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}
