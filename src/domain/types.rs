//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during partitioning and forecasting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Closed nationality classification carried by every stored observation.
///
/// The set is fixed by the municipal register exports: the raw files encode
/// it as `NACIONALITAT_G` codes 1-4, cleaned files as the labels below. Any
/// other label/code is a data error, never a fifth bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Local,
    Eu,
    NonEu,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Local,
        Category::Eu,
        Category::NonEu,
        Category::Unknown,
    ];

    /// Label used in cleaned CSV files (and chart legends).
    pub fn label(self) -> &'static str {
        match self {
            Category::Local => "Local",
            Category::Eu => "EU",
            Category::NonEu => "Non-EU",
            Category::Unknown => "Unknown",
        }
    }

    /// Parse a cleaned-file label. Matching is exact: the category set is
    /// closed, so an unrecognized label is the caller's data error.
    pub fn from_label(label: &str) -> Option<Category> {
        match label {
            "Local" => Some(Category::Local),
            "EU" => Some(Category::Eu),
            "Non-EU" => Some(Category::NonEu),
            "Unknown" => Some(Category::Unknown),
            _ => None,
        }
    }

    /// Numeric `NACIONALITAT_G` code used in raw register exports.
    pub fn from_code(code: u8) -> Option<Category> {
        match code {
            1 => Some(Category::Local),
            2 => Some(Category::Eu),
            3 => Some(Category::NonEu),
            4 => Some(Category::Unknown),
            _ => None,
        }
    }

    pub fn series_kind(self) -> SeriesKind {
        match self {
            Category::Local => SeriesKind::Local,
            Category::Eu => SeriesKind::Eu,
            Category::NonEu => SeriesKind::NonEu,
            Category::Unknown => SeriesKind::Unknown,
        }
    }
}

/// Identity of a derived time series: one per category, plus the combined
/// total across all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKind {
    Local,
    Eu,
    NonEu,
    Unknown,
    Combined,
}

impl SeriesKind {
    /// Human-readable label for terminal output and chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            SeriesKind::Local => "Local",
            SeriesKind::Eu => "EU",
            SeriesKind::NonEu => "Non-EU",
            SeriesKind::Unknown => "Unknown",
            SeriesKind::Combined => "Total",
        }
    }
}

/// A single stored population record: one count for one category on one
/// reference date. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub count: u64,
    pub category: Category,
}

impl Observation {
    /// The temporal bucket used as series key and regression variable.
    pub fn period(&self) -> i32 {
        self.date.year()
    }
}

/// One aggregated historical entry: total count for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: i32,
    pub count: u64,
}

/// An ordered historical series for one `SeriesKind`.
///
/// Invariant: `points` is sorted strictly ascending by period with no
/// duplicate periods (the partitioner rejects duplicates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub kind: SeriesKind,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(kind: SeriesKind, points: Vec<SeriesPoint>) -> Self {
        Self { kind, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The last historical point (the stitch anchor), if any.
    pub fn last(&self) -> Option<SeriesPoint> {
        self.points.last().copied()
    }
}

/// A predicted entry for one future period.
///
/// The count is a continuous trend estimate: fractional values are expected
/// and a declining trend may legitimately go negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: i32,
    pub count: f64,
}

/// The last historical point followed by the forecast points, in period
/// order, so a rendered forecast line connects to the historical line with
/// no gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchedSeries {
    pub kind: SeriesKind,
    pub points: Vec<ForecastPoint>,
}

/// Fitted OLS trend: `count ≈ slope * period + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn predict(&self, period: i32) -> f64 {
        self.slope * period as f64 + self.intercept
    }
}

/// Everything computed for one rendered series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTrend {
    pub history: Series,
    pub line: TrendLine,
    pub forecast: Vec<ForecastPoint>,
    pub stitched: StitchedSeries,
}

impl SeriesTrend {
    pub fn kind(&self) -> SeriesKind {
        self.history.kind
    }
}

/// Where the pipeline reads its observations from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Directory of cleaned observation CSV files.
    Dir(PathBuf),
    /// Seeded synthetic observations (no files needed).
    Sample,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). All knobs are explicit;
/// nothing is read from ambient global state.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    pub source: DataSource,
    /// Number of future periods (years) to forecast.
    pub horizon: usize,

    pub sample_seed: u64,
    /// Number of historical years to synthesize in sample mode.
    pub sample_years: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_trends: Option<PathBuf>,
}

/// A saved trend file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFile {
    pub tool: String,
    pub horizon: usize,
    pub series: Vec<SeriesTrend>,
}
