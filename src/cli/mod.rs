//! Command-line parsing for the population trend forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the partitioning/forecasting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "poptrend", version, about = "Municipal population trend forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Partition observations, fit per-series trends, print the summary and chart.
    Trend(TrendArgs),
    /// Clean raw register exports into observation CSVs.
    Clean(CleanArgs),
    /// Download a raw register export from the open-data portal.
    Fetch(FetchArgs),
    /// Plot a previously exported trend JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `poptrend trend`, but renders
    /// the chart in a terminal UI using Ratatui.
    Tui(TrendArgs),
}

/// Common options for forecasting.
#[derive(Debug, Parser, Clone)]
pub struct TrendArgs {
    /// Directory of cleaned observation CSV files.
    #[arg(short = 'd', long)]
    pub data: Option<PathBuf>,

    /// Generate a seeded synthetic observation set instead of reading files.
    #[arg(long)]
    pub sample: bool,

    /// Number of future periods (years) to forecast.
    #[arg(long, default_value_t = 3)]
    pub horizon: usize,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of historical years to synthesize in sample mode.
    #[arg(long, default_value_t = 10)]
    pub sample_years: usize,

    /// Render an ASCII chart in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-point results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export fitted trends (lines + stitched grids) to JSON.
    #[arg(long = "export-trends")]
    pub export_trends: Option<PathBuf>,
}

/// Options for cleaning raw exports.
#[derive(Debug, Parser)]
pub struct CleanArgs {
    /// Directory containing raw register export CSVs.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Directory for cleaned observation CSVs.
    #[arg(short = 'o', long)]
    pub output: PathBuf,
}

/// Options for downloading a raw export.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Resource URL of the CSV export.
    #[arg(long)]
    pub url: String,

    /// Directory to save the downloaded file into.
    #[arg(short = 'o', long, default_value = "data")]
    pub output: PathBuf,
}

/// Options for plotting a saved trend file.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Trend JSON file produced by `poptrend trend --export-trends`.
    #[arg(long, value_name = "JSON")]
    pub trends: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
