//! Observation store reading.
//!
//! The record store is a directory of cleaned CSV files, one per yearly
//! register export, with columns `Data_Referencia,Valor,NACIONALITAT_G`.
//! This module turns them into `Observation`s that are safe to partition.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip malformed rows, but report what happened)
//! - **Closed categories**: an out-of-domain label is a data-integrity
//!   error for the whole load, never a silent skip
//! - **Deterministic behavior**: files are read in name order

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Category, Observation};
use crate::error::{AppError, TrendError};

const COL_DATE: &str = "data_referencia";
const COL_COUNT: &str = "valor";
const COL_CATEGORY: &str = "nacionalitat_g";

/// A row-level error encountered while reading the store.
#[derive(Debug, Clone)]
pub struct RowError {
    pub file: String,
    pub line: usize,
    pub message: String,
}

/// Store output: observations + row errors + read counters.
#[derive(Debug, Clone)]
pub struct StoreData {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub files_read: usize,
    pub rows_read: usize,
}

/// Load all cleaned CSV files in `dir` into observations.
pub fn load_observations(dir: &Path) -> Result<StoreData, AppError> {
    let mut paths = Vec::new();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to read data dir '{}': {e}", dir.display())))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| AppError::new(2, format!("Failed to read data dir entry: {e}")))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(AppError::new(
            2,
            format!("No CSV files found in '{}'.", dir.display()),
        ));
    }

    let mut data = StoreData {
        observations: Vec::new(),
        row_errors: Vec::new(),
        files_read: 0,
        rows_read: 0,
    };

    for path in &paths {
        let label = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<csv>")
            .to_string();
        let file = File::open(path)
            .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;
        read_observations(file, &label, &mut data)?;
        data.files_read += 1;
    }

    if data.observations.is_empty() {
        return Err(AppError::new(
            3,
            "No valid observations remain after validation.",
        ));
    }

    Ok(data)
}

fn read_observations<R: Read>(reader: R, file_label: &str, data: &mut StoreData) -> Result<(), AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers in '{file_label}': {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for col in [COL_DATE, COL_COUNT, COL_CATEGORY] {
        if !header_map.contains_key(col) {
            return Err(AppError::new(
                2,
                format!("Missing required column `{col}` in '{file_label}'."),
            ));
        }
    }

    for (idx, result) in csv_reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        data.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                data.row_errors.push(RowError {
                    file: file_label.to_string(),
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(obs) => data.observations.push(obs),
            Err(RowIssue::Malformed(message)) => data.row_errors.push(RowError {
                file: file_label.to_string(),
                line,
                message,
            }),
            // A label outside the closed category set is a data error for the
            // whole load, not a row to skip.
            Err(RowIssue::BadLabel(label)) => {
                return Err(AppError::new(
                    3,
                    format!("{file_label}:{line}: {}", TrendError::unknown_label(&label)),
                ));
            }
        }
    }

    Ok(())
}

enum RowIssue {
    Malformed(String),
    BadLabel(String),
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, RowIssue> {
    let date_raw = field(record, header_map, COL_DATE)?;
    let count_raw = field(record, header_map, COL_COUNT)?;
    let category_raw = field(record, header_map, COL_CATEGORY)?;

    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
        .map_err(|e| RowIssue::Malformed(format!("Invalid date '{date_raw}': {e}")))?;
    let count = parse_count(count_raw)
        .ok_or_else(|| RowIssue::Malformed(format!("Invalid count '{count_raw}'")))?;
    let category =
        Category::from_label(category_raw).ok_or_else(|| RowIssue::BadLabel(category_raw.to_string()))?;

    Ok(Observation {
        date,
        count,
        category,
    })
}

fn field<'r>(
    record: &'r StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'r str, RowIssue> {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RowIssue::Malformed(format!("Missing value for `{name}`")))
}

/// Counts are non-negative integers, but aggregation tools sometimes write
/// them with a trailing `.0`; accept those too.
fn parse_count(raw: &str) -> Option<u64> {
    if let Ok(count) = raw.parse::<u64>() {
        return Some(count);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Data_Referencia"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(bytes: &[u8]) -> Result<StoreData, AppError> {
        let mut data = StoreData {
            observations: Vec::new(),
            row_errors: Vec::new(),
            files_read: 0,
            rows_read: 0,
        };
        read_observations(bytes, "test.csv", &mut data)?;
        Ok(data)
    }

    #[test]
    fn reads_cleaned_rows() {
        let csv = b"Data_Referencia,Valor,NACIONALITAT_G\n2020-01-01,50,Local\n2020-01-01,30,EU\n";
        let data = read(csv).unwrap();

        assert_eq!(data.observations.len(), 2);
        assert_eq!(data.rows_read, 2);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.observations[0].count, 50);
        assert_eq!(data.observations[0].category, Category::Local);
        assert_eq!(data.observations[1].category, Category::Eu);
    }

    #[test]
    fn tolerates_bom_and_float_counts() {
        let csv = "\u{feff}Data_Referencia,Valor,NACIONALITAT_G\n2021-01-01,1234.0,Non-EU\n";
        let data = read(csv.as_bytes()).unwrap();

        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.observations[0].count, 1234);
        assert_eq!(data.observations[0].category, Category::NonEu);
    }

    #[test]
    fn malformed_rows_become_row_errors() {
        let csv = b"Data_Referencia,Valor,NACIONALITAT_G\nnot-a-date,50,Local\n2020-01-01,-3,EU\n2020-01-01,7,Unknown\n";
        let data = read(csv).unwrap();

        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 2);
    }

    #[test]
    fn out_of_domain_label_fails_the_load() {
        let csv = b"Data_Referencia,Valor,NACIONALITAT_G\n2020-01-01,50,Martian\n";
        let err = read(csv).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Martian"));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = b"Data_Referencia,Valor\n2020-01-01,50\n";
        let err = read(csv).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
