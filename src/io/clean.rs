//! Clean raw municipal register exports into observation CSVs.
//!
//! Raw exports carry one row per district/neighbourhood/sex/age bucket with
//! the nationality group as a numeric code and `..` for suppressed values.
//! Cleaning reduces each file to one row per nationality:
//!
//! - rows with a missing/suppressed date, code, or value are dropped
//! - the `NACIONALITAT_G` code (1-4) is mapped to its label
//! - `Valor` is summed per nationality, keeping the file's reference date
//!
//! Output schema matches what the store reader expects:
//! `Data_Referencia,Valor,NACIONALITAT_G`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::Category;
use crate::error::AppError;

const COL_DATE: &str = "data_referencia";
const COL_CODE: &str = "nacionalitat_g";
const COL_VALUE: &str = "valor";

/// The dimension lookup file shipped with the exports; not population data.
const SKIP_FILE: &str = "pad_dimensions.csv";

const MISSING: &str = "..";

/// Per-file cleaning outcome.
#[derive(Debug, Clone)]
pub struct CleanedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Outcome for a whole directory run.
#[derive(Debug, Clone)]
pub struct CleanSummary {
    pub files: Vec<CleanedFile>,
    pub skipped: Vec<PathBuf>,
}

/// Clean every raw CSV in `input_dir` into `output_dir`.
///
/// Output files are named `cleaned_<input name>`. Files are processed in
/// name order for deterministic summaries.
pub fn clean_dir(input_dir: &Path, output_dir: &Path) -> Result<CleanSummary, AppError> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output dir '{}': {e}", output_dir.display()),
        )
    })?;

    let mut paths = Vec::new();
    let entries = std::fs::read_dir(input_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to read input dir '{}': {e}", input_dir.display()),
        )
    })?;
    for entry in entries {
        let entry =
            entry.map_err(|e| AppError::new(2, format!("Failed to read input dir entry: {e}")))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(AppError::new(
            2,
            format!("No CSV files found in '{}'.", input_dir.display()),
        ));
    }

    let mut summary = CleanSummary {
        files: Vec::new(),
        skipped: Vec::new(),
    };

    for path in paths {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("export.csv")
            .to_string();
        if name == SKIP_FILE {
            summary.skipped.push(path);
            continue;
        }

        let output = output_dir.join(format!("cleaned_{name}"));
        let cleaned = clean_file(&path, &output)?;
        summary.files.push(cleaned);
    }

    Ok(summary)
}

/// Clean a single raw export file.
pub fn clean_file(input: &Path, output: &Path) -> Result<CleanedFile, AppError> {
    let file = File::open(input)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", input.display())))?;

    let outcome = aggregate_raw(file)
        .map_err(|e| AppError::new(3, format!("{}: {e}", input.display())))?;

    let mut out = File::create(output)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", output.display())))?;
    writeln!(out, "Data_Referencia,Valor,NACIONALITAT_G")
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", output.display())))?;
    for category in Category::ALL {
        if let Some((date, total)) = outcome.totals.get(&category) {
            writeln!(out, "{date},{total},{}", category.label())
                .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", output.display())))?;
        }
    }

    Ok(CleanedFile {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        rows_read: outcome.rows_read,
        rows_dropped: outcome.rows_dropped,
    })
}

struct RawOutcome {
    /// Per category: the file's reference date (first seen) and summed count.
    totals: HashMap<Category, (String, u64)>,
    rows_read: usize,
    rows_dropped: usize,
}

fn aggregate_raw<R: Read>(reader: R) -> Result<RawOutcome, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {e}"))?
        .clone();
    let header_map = build_header_map(&headers);

    for col in [COL_DATE, COL_CODE, COL_VALUE] {
        if !header_map.contains_key(col) {
            return Err(format!("Missing required column `{col}`"));
        }
    }

    let mut outcome = RawOutcome {
        totals: HashMap::new(),
        rows_read: 0,
        rows_dropped: 0,
    };

    for result in csv_reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                outcome.rows_read += 1;
                outcome.rows_dropped += 1;
                continue;
            }
        };
        outcome.rows_read += 1;

        let Some((date, category, value)) = parse_raw_row(&record, &header_map) else {
            outcome.rows_dropped += 1;
            continue;
        };

        let entry = outcome
            .totals
            .entry(category)
            .or_insert_with(|| (date.to_string(), 0));
        entry.1 += value;
    }

    Ok(outcome)
}

fn parse_raw_row<'r>(
    record: &'r StringRecord,
    header_map: &HashMap<String, usize>,
) -> Option<(&'r str, Category, u64)> {
    let date = raw_field(record, header_map, COL_DATE)?;
    let code = raw_field(record, header_map, COL_CODE)?;
    let value = raw_field(record, header_map, COL_VALUE)?;

    let category = code.parse::<u8>().ok().and_then(Category::from_code)?;
    let value = value.parse::<u64>().ok()?;
    Some((date, category, value))
}

/// A field counts as present only if it is non-empty and not the `..`
/// suppression marker.
fn raw_field<'r>(
    record: &'r StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'r str> {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .filter(|value| !value.is_empty() && *value != MISSING)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = name.trim().trim_start_matches('\u{feff}');
            (name.to_ascii_lowercase(), idx)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
Data_Referencia,Codi_Districte,Nom_Districte,SEXE,EDAT_Q,NACIONALITAT_G,Valor
2023-01-01,1,Ciutat Vella,1,25,1,100
2023-01-01,1,Ciutat Vella,2,25,1,120
2023-01-01,2,Eixample,1,30,2,40
2023-01-01,2,Eixample,2,30,3,55
2023-01-01,3,Sants,1,40,2,..
2023-01-01,3,Sants,2,40,9,10
";

    #[test]
    fn sums_values_per_nationality() {
        let outcome = aggregate_raw(RAW.as_bytes()).unwrap();

        assert_eq!(outcome.rows_read, 6);
        // One suppressed value, one out-of-range code.
        assert_eq!(outcome.rows_dropped, 2);
        assert_eq!(outcome.totals[&Category::Local], ("2023-01-01".to_string(), 220));
        assert_eq!(outcome.totals[&Category::Eu], ("2023-01-01".to_string(), 40));
        assert_eq!(outcome.totals[&Category::NonEu], ("2023-01-01".to_string(), 55));
        assert!(!outcome.totals.contains_key(&Category::Unknown));
    }

    #[test]
    fn suppressed_dates_drop_the_row() {
        let raw = "Data_Referencia,NACIONALITAT_G,Valor\n..,1,100\n2023-01-01,1,50\n";
        let outcome = aggregate_raw(raw.as_bytes()).unwrap();

        assert_eq!(outcome.rows_dropped, 1);
        assert_eq!(outcome.totals[&Category::Local].1, 50);
    }

    #[test]
    fn missing_column_fails() {
        let raw = "Data_Referencia,Valor\n2023-01-01,100\n";
        assert!(aggregate_raw(raw.as_bytes()).is_err());
    }
}
