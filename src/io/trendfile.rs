//! Read/write trend JSON files.
//!
//! Trend JSON is the "portable" representation of a finished run:
//! - fitted line per series (slope + intercept)
//! - the historical points and the stitched forecast grid
//! - the horizon used
//!
//! The schema is defined by `domain::TrendFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{SeriesTrend, TrendFile};
use crate::error::AppError;

/// Write a trend JSON file.
pub fn write_trend_file(path: &Path, horizon: usize, trends: &[SeriesTrend]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create trend JSON '{}': {e}", path.display())))?;

    let contents = TrendFile {
        tool: "poptrend".to_string(),
        horizon,
        series: trends.to_vec(),
    };

    serde_json::to_writer_pretty(file, &contents)
        .map_err(|e| AppError::new(2, format!("Failed to write trend JSON: {e}")))?;

    Ok(())
}

/// Read a trend JSON file.
pub fn read_trend_file(path: &Path) -> Result<TrendFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open trend JSON '{}': {e}", path.display())))?;
    let contents: TrendFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid trend JSON: {e}")))?;
    Ok(contents)
}
