//! Mathematical utilities: least-squares fitting of the per-series trend line.

pub mod ols;

pub use ols::*;
