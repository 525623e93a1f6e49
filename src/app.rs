//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or synthesizes observations
//! - runs partitioning + forecasting + stitching
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;

use crate::cli::{CleanArgs, Command, FetchArgs, PlotArgs, TrendArgs};
use crate::domain::{DataSource, TrendConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `poptrend` binary.
pub fn run() -> Result<(), AppError> {
    // We want `poptrend` and `poptrend --sample` to behave like
    // `poptrend tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Trend(args) => handle_trend(args),
        Command::Clean(args) => handle_clean(args),
        Command::Fetch(args) => handle_fetch(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_trend(args: TrendArgs) -> Result<(), AppError> {
    let config = trend_config_from_args(&args)?;
    let run = pipeline::run_trend(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));

    if config.plot {
        let plot =
            crate::plot::render_trend_plot(&run.trends, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.trends)?;
    }
    if let Some(path) = &config.export_trends {
        crate::io::trendfile::write_trend_file(path, config.horizon, &run.trends)?;
    }

    Ok(())
}

fn handle_clean(args: CleanArgs) -> Result<(), AppError> {
    let summary = crate::io::clean::clean_dir(&args.input, &args.output)?;

    println!(
        "Cleaned {} file(s) into '{}':",
        summary.files.len(),
        args.output.display()
    );
    for file in &summary.files {
        println!(
            "- {} (rows: {}, dropped: {})",
            file.output.display(),
            file.rows_read,
            file.rows_dropped
        );
    }
    for path in &summary.skipped {
        println!("Skipped '{}'", path.display());
    }

    Ok(())
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let client = crate::data::DatasetClient::new()?;
    let path = client.download(&args.url, &args.output)?;
    println!("Downloaded '{}'", path.display());
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::trendfile::read_trend_file(&args.trends)?;
    let plot = crate::plot::render_trend_plot(&file.series, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: TrendArgs) -> Result<(), AppError> {
    let config = trend_config_from_args(&args)?;
    crate::tui::run(config)
}

pub fn trend_config_from_args(args: &TrendArgs) -> Result<TrendConfig, AppError> {
    let source = match (&args.data, args.sample) {
        (Some(_), true) => {
            return Err(AppError::new(2, "Pass either --data or --sample, not both."));
        }
        (Some(dir), false) => DataSource::Dir(dir.clone()),
        (None, true) => DataSource::Sample,
        (None, false) => {
            return Err(AppError::new(
                2,
                "No data source: pass --data <DIR> with cleaned CSVs, or --sample for synthetic data.",
            ));
        }
    };

    Ok(TrendConfig {
        source,
        horizon: args.horizon,
        sample_seed: args.seed,
        sample_years: args.sample_years,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_trends: args.export_trends.clone(),
    })
}

/// Rewrite argv so `poptrend` defaults to `poptrend tui`.
///
/// Rules:
/// - `poptrend`                      -> `poptrend tui`
/// - `poptrend --sample ...`         -> `poptrend tui --sample ...`
/// - `poptrend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "trend" | "clean" | "fetch" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
