//! Per-series trend forecasting.
//!
//! Responsibilities:
//!
//! - aggregate a series to one total per distinct period
//! - fit a simple OLS line (period vs. total count)
//! - extrapolate the requested number of future periods

pub mod linear;

pub use linear::*;
