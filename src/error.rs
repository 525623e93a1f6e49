use crate::domain::SeriesKind;

/// Typed failures produced by the core partition/forecast/stitch pipeline.
///
/// Each variant carries enough context (series, offending period/value) for
/// the caller to diagnose the input. None of these are retried or silently
/// corrected: the pipeline operates on deterministic in-memory data, so a
/// repeated attempt with the same input fails identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrendError {
    /// The source records are internally inconsistent: a period appears more
    /// than once within a single series, or a record carries a category
    /// label outside the closed set.
    DataIntegrity {
        series: Option<SeriesKind>,
        period: Option<i32>,
        detail: String,
    },
    /// Fewer than 2 distinct periods: the regression is undetermined.
    InsufficientData {
        series: SeriesKind,
        distinct_periods: usize,
    },
    /// The forecast horizon must cover at least 1 future period.
    InvalidHorizon { horizon: usize },
    /// Stitching needs at least one historical point to anchor the forecast.
    EmptySeries { series: SeriesKind },
}

impl TrendError {
    pub fn duplicate_period(series: SeriesKind, period: i32) -> Self {
        TrendError::DataIntegrity {
            series: Some(series),
            period: Some(period),
            detail: "duplicate period".to_string(),
        }
    }

    pub fn unknown_label(label: &str) -> Self {
        TrendError::DataIntegrity {
            series: None,
            period: None,
            detail: format!("unknown category label '{label}'"),
        }
    }

    /// Process exit code for the CLI boundary.
    ///
    /// 2 = caller/config error, 3 = data error (matches `AppError` usage).
    pub fn exit_code(&self) -> u8 {
        match self {
            TrendError::InvalidHorizon { .. } => 2,
            _ => 3,
        }
    }
}

impl std::fmt::Display for TrendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendError::DataIntegrity {
                series,
                period,
                detail,
            } => {
                write!(f, "Data integrity error")?;
                if let Some(kind) = series {
                    write!(f, " in series '{}'", kind.display_name())?;
                }
                if let Some(period) = period {
                    write!(f, " at period {period}")?;
                }
                write!(f, ": {detail}.")
            }
            TrendError::InsufficientData {
                series,
                distinct_periods,
            } => write!(
                f,
                "Series '{}' has {distinct_periods} distinct period(s); at least 2 are needed to fit a trend.",
                series.display_name()
            ),
            TrendError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be >= 1 (got {horizon}).")
            }
            TrendError::EmptySeries { series } => write!(
                f,
                "Series '{}' has no historical points to anchor a forecast.",
                series.display_name()
            ),
        }
    }
}

impl std::error::Error for TrendError {}

impl From<TrendError> for AppError {
    fn from(err: TrendError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

/// CLI-boundary error: a message plus the process exit code to report.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
