//! Input/output helpers.
//!
//! - observation store reading + validation (`store`)
//! - raw register-export cleaning (`clean`)
//! - per-point results export (CSV) (`export`)
//! - trend JSON read/write (`trendfile`)

pub mod clean;
pub mod export;
pub mod store;
pub mod trendfile;

pub use clean::*;
pub use export::*;
pub use store::*;
pub use trendfile::*;
