//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed nationality classification (`Category`) and series identity (`SeriesKind`)
//! - stored population records (`Observation`)
//! - derived series types (`Series`, `ForecastPoint`, `StitchedSeries`)
//! - fit outputs (`TrendLine`, `SeriesTrend`)
//! - run configuration (`TrendConfig`)

pub mod types;

pub use types::*;
